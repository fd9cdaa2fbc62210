//! Server-sent events stream of application events.

use crate::server::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::warn;
use wpfx_core::AppEventNotice;

/// SSE event name carrying an [`AppEventNotice`].
pub const APP_EVENT: &str = "app-event";

/// Stream every application event recorded after the client connects.
///
/// A client that falls behind skips the notices it missed; it can recover the
/// full history with `get_app_events`.
pub async fn handle_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.api.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|item| match item {
        Ok(notice) => notice_to_event(&notice).map(Ok),
        Err(err) => {
            warn!("app event subscriber lagged: {err}");
            None
        }
    });

    Sse::new(stream).keep_alive(default_keep_alive())
}

fn notice_to_event(notice: &AppEventNotice) -> Option<Event> {
    Event::default()
        .event(APP_EVENT)
        .json_data(notice)
        .map_err(|err| {
            warn!("failed to serialize app event: {err}");
            err
        })
        .ok()
}

fn default_keep_alive() -> KeepAlive {
    KeepAlive::new()
        .interval(Duration::from_secs(15))
        .text("keep-alive")
}

//! Lifecycle and output events for launched applications.

use crate::application::SelectedApp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Something that happened to a launched application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppEvent {
    /// One non-empty line from the application's stdout or stderr.
    Output { data: String },
    /// The application was spawned.
    Launch { app: SelectedApp },
    /// The application exited.
    Closed { app: SelectedApp },
}

/// An event pushed to subscribers, keyed by the application's absolute path.
#[derive(Debug, Clone, Serialize)]
pub struct AppEventNotice {
    pub path: PathBuf,
    pub event: AppEvent,
    pub at: DateTime<Utc>,
}

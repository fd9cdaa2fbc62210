//! Running application handlers.

use super::{require_param, require_str_param};
use crate::server::AppState;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;
use wpfx_core::{CloseOutcome, LaunchOptions};

/// Launch an application. Options may be nested under `options` or passed flat.
pub async fn launch_app(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let opts: LaunchOptions = if params.get("options").is_some() {
        require_param(params, "options", "options")?
    } else {
        serde_json::from_value(params.clone()).map_err(|e| wpfx_core::WpfxError::InvalidParams {
            message: format!("Invalid launch options: {}", e),
        })?
    };

    let path = opts.app.path.absolute.display().to_string();
    state.api.launch_app(opts).await?;
    info!("Launched {}", path);
    Ok(json!({ "success": true, "path": path }))
}

pub async fn close_app(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let path = PathBuf::from(require_str_param(params, "path", "path")?);
    let outcome = state.api.close_app(&path).await;
    Ok(json!({
        "outcome": outcome,
        "found": outcome != CloseOutcome::NotFound,
        "success": outcome == CloseOutcome::Terminated,
    }))
}

pub async fn get_app_events(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let path = PathBuf::from(require_str_param(params, "path", "path")?);
    let events = state.api.get_app_events(&path);
    Ok(serde_json::to_value(events)?)
}

pub async fn list_running_apps(state: &AppState, _params: &Value) -> wpfx_core::Result<Value> {
    Ok(serde_json::to_value(state.api.list_running_apps())?)
}

pub async fn evict_app_events(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let path = PathBuf::from(require_str_param(params, "path", "path")?);
    Ok(json!({ "evicted": state.api.evict_app_events(&path) }))
}

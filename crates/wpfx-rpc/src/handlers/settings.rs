//! Settings handlers.

use super::require_param;
use crate::server::AppState;
use serde_json::Value;
use wpfx_core::Settings;

pub async fn get_settings(state: &AppState, _params: &Value) -> wpfx_core::Result<Value> {
    Ok(serde_json::to_value(state.api.settings().await)?)
}

pub async fn update_settings(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let settings: Settings = require_param(params, "settings", "settings")?;
    let saved = state.api.update_settings(settings).await?;
    Ok(serde_json::to_value(saved)?)
}

//! Path helper handlers.

use super::require_str_param;
use crate::server::AppState;
use serde_json::Value;

pub async fn normalize_path(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let path = require_str_param(params, "path", "path")?;
    let normalized = state.api.normalize_path(&path);
    Ok(Value::String(normalized.to_string_lossy().into_owned()))
}

pub async fn file_exists(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let path = require_str_param(params, "path", "path")?;
    Ok(Value::Bool(state.api.file_exists(&path)))
}

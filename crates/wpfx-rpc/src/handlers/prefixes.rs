//! Prefix and application discovery handlers.

use super::{require_param, require_str_param};
use crate::server::AppState;
use serde_json::Value;
use wpfx_core::Prefix;

pub async fn scan_prefixes(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let root = require_str_param(params, "root", "root")?;
    let prefixes = state.api.scan_prefixes(&root).await?;
    Ok(serde_json::to_value(prefixes)?)
}

pub async fn scan_default_prefixes(
    state: &AppState,
    _params: &Value,
) -> wpfx_core::Result<Value> {
    let prefixes = state.api.scan_default_prefixes().await?;
    Ok(serde_json::to_value(prefixes)?)
}

pub async fn scan_prefix_apps(state: &AppState, params: &Value) -> wpfx_core::Result<Value> {
    let prefix: Prefix = require_param(params, "prefix", "prefix")?;
    let found = state.api.scan_prefix_apps(&prefix).await?;
    Ok(serde_json::to_value(found)?)
}

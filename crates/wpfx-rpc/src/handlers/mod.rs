//! JSON-RPC request handlers, split by domain.

mod apps;
mod paths;
mod prefixes;
mod settings;

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

// ============================================================================
// JSON-RPC types
// ============================================================================

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

// ============================================================================
// Parameter extraction helpers
// ============================================================================

/// Extract an optional string parameter, supporting both snake_case and camelCase.
pub(crate) fn get_str_param<'a>(params: &'a Value, snake: &str, camel: &str) -> Option<&'a str> {
    params
        .get(snake)
        .or_else(|| params.get(camel))
        .and_then(|v| v.as_str())
}

/// Extract a required string parameter or return an error.
pub(crate) fn require_str_param(
    params: &Value,
    snake: &str,
    camel: &str,
) -> wpfx_core::Result<String> {
    get_str_param(params, snake, camel)
        .map(String::from)
        .ok_or_else(|| wpfx_core::WpfxError::InvalidParams {
            message: format!("Missing required parameter: {}", snake),
        })
}

/// Deserialize a required object parameter, supporting both snake_case and camelCase.
pub(crate) fn require_param<T: DeserializeOwned>(
    params: &Value,
    snake: &str,
    camel: &str,
) -> wpfx_core::Result<T> {
    let value = params
        .get(snake)
        .or_else(|| params.get(camel))
        .ok_or_else(|| wpfx_core::WpfxError::InvalidParams {
            message: format!("Missing required parameter: {}", snake),
        })?;

    serde_json::from_value(value.clone()).map_err(|e| wpfx_core::WpfxError::InvalidParams {
        message: format!("Invalid parameter {}: {}", snake, e),
    })
}

// ============================================================================
// HTTP endpoints
// ============================================================================

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    // Handle built-in methods
    if method == "health_check" {
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::success(id, json!({"status": "ok"}))),
        );
    }

    // Dispatch to API methods
    let result = dispatch_method(&state, method, &params).await;

    match result {
        Ok(value) => (StatusCode::OK, Json(JsonRpcResponse::success(id, value))),
        Err(e) => {
            error!("RPC error for {}: {}", method, e);
            let code = e.to_rpc_error_code();
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, code, e.to_string())),
            )
        }
    }
}

// ============================================================================
// Method dispatcher
// ============================================================================

/// Dispatch a method call to the appropriate domain handler.
async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: &Value,
) -> wpfx_core::Result<Value> {
    match method {
        // Discovery
        "scan_prefixes" => prefixes::scan_prefixes(state, params).await,
        "scan_default_prefixes" => prefixes::scan_default_prefixes(state, params).await,
        "scan_prefix_apps" => prefixes::scan_prefix_apps(state, params).await,

        // Process Lifecycle
        "launch_app" => apps::launch_app(state, params).await,
        "close_app" => apps::close_app(state, params).await,
        "get_app_events" => apps::get_app_events(state, params).await,
        "list_running_apps" => apps::list_running_apps(state, params).await,
        "evict_app_events" => apps::evict_app_events(state, params).await,

        // Paths
        "normalize_path" => paths::normalize_path(state, params).await,
        "file_exists" => paths::file_exists(state, params).await,

        // Settings
        "get_settings" => settings::get_settings(state, params).await,
        "update_settings" => settings::update_settings(state, params).await,

        _ => {
            warn!("Method not found: {}", method);
            Err(wpfx_core::WpfxError::Other(format!(
                "Method not found: {}",
                method
            )))
        }
    }
}

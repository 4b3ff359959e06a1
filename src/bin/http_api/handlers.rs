use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use calendly_mcp::config::SERVER_NAME;
use calendly_mcp::error::Error;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::AppState;

/// Service info
pub async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.calendly.operations().len(),
    }))
}

/// Handler for health checks
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Catalogue as name, description and input schema
pub async fn list_tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    let tools: Vec<Value> = state
        .calendly
        .operations()
        .iter()
        .map(|op| {
            json!({
                "name": op.name,
                "group": op.group,
                "description": op.description,
                "inputSchema": op.input_schema(),
            })
        })
        .collect();

    Json(json!({ "tools": tools }))
}

/// Run one tool with a JSON arguments object; an empty body means no arguments
pub async fn call_tool_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        json!({})
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(e) => {
                return error_response(Error::InvalidArguments(format!(
                    "Request body is not valid JSON: {}",
                    e
                )))
            }
        }
    };

    info!("HTTP call to {}", name);
    match state.calendly.call(&name, arguments).await {
        Ok(response) => (StatusCode::OK, Json(response.to_value())).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(error: Error) -> Response {
    let status = status_for(&error);
    warn!("Tool call failed with {}: {}", status, error);
    (status, Json(error.to_payload())).into_response()
}

/// HTTP status for a failed call
pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidArguments(_) => StatusCode::BAD_REQUEST,
        Error::UnknownOperation(_) => StatusCode::NOT_FOUND,
        Error::Remote { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(|code| code.is_client_error() || code.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        Error::Transport(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

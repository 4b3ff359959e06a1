//! MCP stdio server
//!
//! Reads newline-delimited JSON-RPC 2.0 messages, answers protocol requests
//! inline and runs every `tools/call` as its own task so slow Calendly calls
//! do not hold up the rest of the session. All responses funnel through one
//! writer task; they come back in completion order, matched by id.

use super::types::{
    error_codes, CancelledParams, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ServerCapabilities, ServerInfo, ToolDef, ToolsCallParams, ToolsCallResult,
    ToolsCapability, ToolsListResult, PROTOCOL_VERSION,
};
use crate::components::calendly::catalogue::{self, OperationSpec};
use crate::components::calendly::Arguments;
use crate::components::CalendlyHandle;
use crate::config::SERVER_NAME;
use crate::error::{protocol_error, AppResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Why the serve loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The client closed its end of the stream
    InputClosed,
    /// A shutdown was requested from outside
    Shutdown,
}

type InFlight = Arc<Mutex<HashMap<String, CancellationToken>>>;

/// MCP server exposing the Calendly catalogue as tools
#[derive(Clone)]
pub struct McpServer {
    calendly: CalendlyHandle,
    in_flight: InFlight,
}

impl McpServer {
    pub fn new(calendly: CalendlyHandle) -> Self {
        Self {
            calendly,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Serve one session until the input closes or `shutdown` fires.
    ///
    /// On input EOF, in-flight calls are allowed to finish and their
    /// responses are flushed. On shutdown they are cancelled.
    pub async fn serve<R, W>(&self, reader: R, writer: W, shutdown: CancellationToken) -> AppResult<Exit>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        info!("MCP server started");

        let (response_tx, response_rx) = mpsc::channel(64);
        let writer_task = tokio::spawn(write_responses(writer, response_rx));

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut tasks = JoinSet::new();

        let exit = loop {
            buf.clear();
            let read = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown requested, cancelling in-flight calls");
                    self.cancel_all().await;
                    break Exit::Shutdown;
                }
                read = reader.read_until(b'\n', &mut buf) => read?,
            };

            if read == 0 {
                info!("Input closed, waiting for in-flight calls");
                break Exit::InputClosed;
            }

            // Undecodable bytes are answered like any other unparseable line
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Discarding line that is not valid UTF-8: {}", e);
                    let error = JsonRpcError::new(error_codes::PARSE_ERROR, format!("Invalid UTF-8: {}", e));
                    send(&response_tx, JsonRpcResponse::failure(Value::Null, error)).await;
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            while let Some(joined) = tasks.try_join_next() {
                log_join_failure(joined);
            }

            self.handle_line(line.trim_end(), &response_tx, &mut tasks).await;
        };

        while let Some(joined) = tasks.join_next().await {
            log_join_failure(joined);
        }

        drop(response_tx);
        writer_task
            .await
            .map_err(|e| protocol_error(&format!("Response writer failed: {}", e)))??;

        info!("MCP server stopped");
        Ok(exit)
    }

    async fn handle_line(
        &self,
        line: &str,
        responses: &mpsc::Sender<JsonRpcResponse>,
        tasks: &mut JoinSet<()>,
    ) {
        debug!("MCP message: {}", line);

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse JSON-RPC message: {}", e);
                let error = JsonRpcError::new(error_codes::PARSE_ERROR, format!("Invalid JSON: {}", e));
                send(responses, JsonRpcResponse::failure(Value::Null, error)).await;
                return;
            }
        };

        let id_hint = value.get("id").cloned().unwrap_or(Value::Null);
        let request = match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) if request.jsonrpc == "2.0" => request,
            Ok(_) => {
                let error = JsonRpcError::new(error_codes::INVALID_REQUEST, "jsonrpc must be \"2.0\"");
                send(responses, JsonRpcResponse::failure(id_hint, error)).await;
                return;
            }
            Err(e) => {
                let error = JsonRpcError::new(error_codes::INVALID_REQUEST, format!("Invalid request: {}", e));
                send(responses, JsonRpcResponse::failure(id_hint, error)).await;
                return;
            }
        };

        let Some(id) = request.id else {
            self.handle_notification(&request.method, request.params).await;
            return;
        };

        if request.method == "tools/call" {
            self.spawn_tool_call(id, request.params, responses, tasks).await;
            return;
        }

        let response = match self.handle_request(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => {
                warn!("MCP request '{}' failed: {}", request.method, error.message);
                JsonRpcResponse::failure(id, error)
            }
        };
        send(responses, response).await;
    }

    /// Requests answered without touching the network
    fn handle_request(&self, method: &str, _params: Option<Value>) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => to_result(&InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability { list_changed: false }),
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            }),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&ToolsListResult {
                tools: self.calendly.operations().iter().map(tool_def).collect(),
            }),
            _ => Err(JsonRpcError::new(
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            )),
        }
    }

    async fn handle_notification(&self, method: &str, params: Option<Value>) {
        match method {
            "notifications/initialized" => debug!("Client finished initialization"),
            "notifications/cancelled" => {
                let Some(params) = params.and_then(|p| serde_json::from_value::<CancelledParams>(p).ok())
                else {
                    warn!("Ignoring malformed cancellation notice");
                    return;
                };

                let key = request_key(&params.request_id);
                match self.in_flight.lock().await.get(&key) {
                    Some(token) => {
                        info!(
                            "Cancelling request {} ({})",
                            key,
                            params.reason.as_deref().unwrap_or("no reason given")
                        );
                        token.cancel();
                    }
                    None => debug!("Cancellation for unknown or finished request {}", key),
                }
            }
            other => debug!("Ignoring notification {}", other),
        }
    }

    async fn spawn_tool_call(
        &self,
        id: Value,
        params: Option<Value>,
        responses: &mpsc::Sender<JsonRpcResponse>,
        tasks: &mut JoinSet<()>,
    ) {
        let params = match params.map(serde_json::from_value::<ToolsCallParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                let error = JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Invalid tools/call params: {}", e));
                send(responses, JsonRpcResponse::failure(id, error)).await;
                return;
            }
            None => {
                let error = JsonRpcError::new(error_codes::INVALID_PARAMS, "tools/call requires params");
                send(responses, JsonRpcResponse::failure(id, error)).await;
                return;
            }
        };

        let Some(operation) = catalogue::find(&params.name) else {
            warn!("Unknown tool requested: {}", params.name);
            let error = JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Unknown tool: {}", params.name));
            send(responses, JsonRpcResponse::failure(id, error)).await;
            return;
        };

        let key = request_key(&id);
        let token = CancellationToken::new();
        let duplicate = {
            let mut in_flight = self.in_flight.lock().await;
            if in_flight.contains_key(&key) {
                true
            } else {
                in_flight.insert(key.clone(), token.clone());
                false
            }
        };

        if duplicate {
            warn!("Rejecting tools/call reusing in-flight id {}", key);
            let error = JsonRpcError::new(
                error_codes::INVALID_REQUEST,
                format!("Request id {} is already in flight", key),
            );
            send(responses, JsonRpcResponse::failure(id, error)).await;
            return;
        }

        let calendly = self.calendly.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let responses = responses.clone();

        tasks.spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => None,
                result = run_tool(&calendly, operation, params.arguments) => Some(result),
            };

            in_flight.lock().await.remove(&key);

            match outcome {
                Some(result) => {
                    let response = match to_result(&result) {
                        Ok(value) => JsonRpcResponse::success(id, value),
                        Err(error) => JsonRpcResponse::failure(id, error),
                    };
                    send(&responses, response).await;
                }
                None => info!("Request {} cancelled before completion", key),
            }
        });
    }

    async fn cancel_all(&self) {
        for token in self.in_flight.lock().await.values() {
            token.cancel();
        }
    }
}

/// Run one tool and render the outcome as MCP content
async fn run_tool(calendly: &CalendlyHandle, operation: &OperationSpec, arguments: Value) -> ToolsCallResult {
    let result = match Arguments::from_value(arguments) {
        Ok(arguments) => calendly.run(operation, &arguments).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => ToolsCallResult::text(response.to_text(), false),
        Err(e) => {
            warn!("Tool {} failed: {}", operation.name, e);
            let payload = e.to_payload();
            let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
            ToolsCallResult::text(text, true)
        }
    }
}

fn tool_def(operation: &OperationSpec) -> ToolDef {
    ToolDef {
        name: operation.name.to_string(),
        description: operation.description.to_string(),
        input_schema: operation.input_schema(),
    }
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::new(error_codes::INTERNAL_ERROR, e.to_string()))
}

/// Map key for a JSON-RPC id; `1` and `"1"` stay distinct
fn request_key(id: &Value) -> String {
    id.to_string()
}

async fn send(responses: &mpsc::Sender<JsonRpcResponse>, response: JsonRpcResponse) {
    if responses.send(response).await.is_err() {
        error!("Response channel closed, dropping response");
    }
}

fn log_join_failure(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!("Tool task failed: {}", e);
    }
}

/// Write responses as newline-delimited JSON
async fn write_responses<W>(writer: W, mut responses: mpsc::Receiver<JsonRpcResponse>) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = BufWriter::new(writer);

    while let Some(response) = responses.recv().await {
        let json = serde_json::to_string(&response)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    writer.shutdown().await?;
    Ok(())
}

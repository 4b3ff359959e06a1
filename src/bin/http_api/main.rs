mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use calendly_mcp::components::CalendlyHandle;
use calendly_mcp::startup;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::handlers::{call_tool_handler, health_handler, index_handler, list_tools_handler};

/// Default listen address for the HTTP connector
const DEFAULT_ADDR: &str = "127.0.0.1:8000";

#[derive(Clone)]
pub struct AppState {
    /// Shared Calendly client
    pub calendly: CalendlyHandle,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/tools", get(list_tools_handler))
        .route("/tools/{name}", post(call_tool_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    info!("Starting Calendly HTTP connector");

    let config = startup::load_config()?;
    let calendly = CalendlyHandle::new(&config)?;

    let addr: SocketAddr = std::env::var("HTTP_API_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .map_err(|e| miette::miette!("Invalid HTTP_API_ADDR: {}", e))?;

    let app = router(AppState { calendly });

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| miette::miette!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let token = tokio_util::sync::CancellationToken::new();
            calendly_mcp::shutdown::handle_signals(token).await;
        })
        .await
        .map_err(|e| miette::miette!("HTTP server failed: {}", e))?;

    info!("HTTP connector stopped");
    Ok(())
}

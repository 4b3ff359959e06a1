use crate::components::CalendlyHandle;
use crate::config::Config;
use crate::error::Error;
use crate::mcp::{Exit, McpServer};
use crate::shutdown;
use std::env;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set
const DEFAULT_LOG_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Initialize logging with environment-based configuration.
///
/// Logs go to stderr; stdout belongs to the MCP channel.
pub fn init_logging() -> miette::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| env::var("LOG_LEVEL").map(EnvFilter::new))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if json_logs() {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

fn json_logs() -> bool {
    env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(config)),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Serve MCP over stdio until the client disconnects or a signal arrives
pub async fn start_server(config: Arc<Config>) -> miette::Result<Exit> {
    let calendly = CalendlyHandle::new(&config)?;
    let server = McpServer::new(calendly);

    let shutdown_token = CancellationToken::new();
    tokio::spawn(shutdown::handle_signals(shutdown_token.clone()));

    let exit = server
        .serve(tokio::io::stdin(), tokio::io::stdout(), shutdown_token.clone())
        .await?;

    // Release the signal task if we stopped for another reason
    shutdown_token.cancel();

    info!("Server exited: {:?}", exit);
    Ok(exit)
}

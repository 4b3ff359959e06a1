use calendly_mcp::mcp::Exit;
use calendly_mcp::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting {} {}", calendly_mcp::config::SERVER_NAME, env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = startup::load_config()?;

    // Serve until stdin closes or a signal arrives
    let exit = startup::start_server(config).await?;

    // A blocked stdin read would otherwise keep the runtime alive
    if exit == Exit::Shutdown {
        std::process::exit(0);
    }

    Ok(())
}

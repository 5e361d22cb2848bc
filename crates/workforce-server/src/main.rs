//! # Workforce HR API Server

use anyhow::Context;
use tracing::info;
use workforce_config::ConfigLoader;
use workforce_server::shutdown::shutdown_signal;
use workforce_server::{telemetry, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loader = ConfigLoader::from_default_location().context("loading configuration")?;
    let config = loader.get().await;

    telemetry::init_logging(&config.observability)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.app.environment,
        "Starting Workforce HR API"
    );

    let metrics = telemetry::install_metrics(&config.observability)?;
    let app = Application::build(&config, metrics).await.context("building application")?;
    app.serve(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

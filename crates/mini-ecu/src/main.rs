//! Mini ECU - Main Entry Point

use anyhow::Context;
use mini_ecu::{config_path, init_logging, run, EcuConfig, CONFIG_ENV};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = config_path(std::env::args().skip(1), std::env::var_os(CONFIG_ENV));
    let config = EcuConfig::load(path.as_deref()).context("failed to load configuration")?;
    init_logging(&config.log).context("failed to initialize logging")?;

    info!("=== Mini ECU v{} ===", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &path {
        info!("Configuration file: {}", path.display());
    }

    tokio::select! {
        result = run(config) => result.context("ECU stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    Ok(())
}

//! Gateway entry point

use anyhow::Result;
use clap::Parser;
use gamma_core::config::ConfigLoader;
use gamma_core::logging::init_logging;
use gamma_gateway::{run_server, AppState};
use gamma_providers::GroqClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "gamma-gateway")]
#[command(about = "Chat gateway forwarding conversations to the completions API")]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;

    let _guard = init_logging(&config.logging);
    info!(
        model = %config.provider.model,
        origins = ?config.gateway.allowed_origins,
        "Starting gamma gateway"
    );

    let provider = Arc::new(GroqClient::new(&config.provider));
    let state = AppState::new(&config, provider);

    let port = cli.port.unwrap_or(config.gateway.port);
    run_server(state, &config.gateway.host, port).await
}

// churnd - churn prediction service
// Bootstrap: load config, load the model artifact once, serve the router.

use anyhow::Context;
use churnd::config_loader::load_config;
use churnd::runtime_core::ChurnRuntimeCore;
use churnd::web::build_predict_router;
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "churnd", about = "Churn prediction API server")]
struct Cli {
    /// Path to the TOML config file (default: churnd.toml)
    #[arg(long)]
    config: Option<String>,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // The one startup I/O: the per-request path never touches disk
    let core = ChurnRuntimeCore::from_path(Path::new(&config.model_dir), config.threshold)
        .with_context(|| format!("loading model artifact from {}", config.model_dir))?;
    let core = Arc::new(core);

    let app = build_predict_router(Arc::clone(&core));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, "churnd listening");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

//! Provia server binary.

use clap::Parser;
use provia_core::ProviaConfig;

mod auth;
mod dashboard;
mod error;
mod handlers;
mod routes;
mod state;

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "provia", about = "Identity provisioning orchestrator")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, env = "PROVIA_CONFIG", default_value = "provia.toml")]
    config: String,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match std::fs::metadata(&args.config) {
        Ok(_) => ProviaConfig::load(&args.config)?,
        Err(_) => {
            tracing::warn!(path = %args.config, "config file not found, using defaults");
            ProviaConfig::default()
        }
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let bind = config.server.bind.clone();
    let state = AppState::from_config(config)?;
    let app = routes::create_router(state);

    tracing::info!("provia listening on {}", bind);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

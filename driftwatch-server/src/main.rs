//! driftwatch service binary.

use std::net::SocketAddr;

use driftwatch_core::DriftwatchConfig;
use driftwatch_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DriftwatchConfig::from_env();
    init_tracing(&config);

    let port = config.effective_port();
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "driftwatch listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise the LOG_LEVEL knob picks the filter.
fn init_tracing(config: &DriftwatchConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(config.effective_log_level().to_lowercase())
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

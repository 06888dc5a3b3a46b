use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scanbridge::config::Config;
use scanbridge::exec::SystemExecutor;
use scanbridge::scan::ScanRunner;
use scanbridge::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("SCANBRIDGE_CONFIG") {
        Ok(path) => Config::load(path)?,
        Err(_) => Config::load_or_default()?,
    };

    let runner = ScanRunner::new(config.scan.clone(), Arc::new(SystemExecutor));
    if !runner.is_available().await {
        tracing::warn!("nmap not found on PATH; scan requests will fail until it is installed");
    }

    let state = Arc::new(AppState { runner });
    let app = server::router(state);

    let port: u16 = std::env::var("SCANBRIDGE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Scan API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

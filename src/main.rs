use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use atrium::api::ApiClient;
use atrium::config::{Cli, Config};
use atrium::routes;
use atrium::session::{FileStorage, SessionStore};
use atrium::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli)?;
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Session lives in a JSON file so a restart keeps the login
    let session_path = config.session_path();
    if let Some(parent) = session_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let session = SessionStore::new(Arc::new(FileStorage::new(&session_path)));
    tracing::info!("Session file: {}", session_path.display());

    let api = ApiClient::new(&config.api, session)?;
    tracing::info!("CMS API: {}", api.base_url());

    let state = AppState::new(config.clone(), api);
    let app = routes::router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_addr().parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

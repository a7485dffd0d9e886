use std::net::SocketAddr;
use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{AppState, SessionSettings};

/// Connect, migrate and assemble the router for a validated config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let db = models::db::connect_and_migrate(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    let state = AppState::new(db, SessionSettings::from_config(&cfg.session));
    Ok(routes::build_router(state))
}

/// Load host/port from the validated config
fn load_bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(cfg.server.bind_addr().parse()?)
}

/// Public entry: build the app and serve until `shutdown` resolves
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    // Bind and serve
    let addr = load_bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

/// Load and validate configuration, mapping failures to [`StartupError`].
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

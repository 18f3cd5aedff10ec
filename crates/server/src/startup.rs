use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::todos::TodoStore;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Load the todo store described by `cfg.storage`, honouring its corrupt-file policy.
pub async fn open_store(cfg: &AppConfig) -> Result<Arc<TodoStore>, StartupError> {
    let store = TodoStore::open(cfg.storage.data_file.clone(), cfg.storage.on_corrupt).await?;
    Ok(store)
}

pub fn build_app(store: Arc<TodoStore>) -> Router {
    routes::build_router(AppState::new(store), build_cors())
}

/// Public entry: open the store, build the app and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store = open_store(&cfg).await?;
    let app = build_app(store);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        data_file = %cfg.storage.data_file.display(),
        "todo server listening"
    );
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("todo server stopped");
    Ok(())
}

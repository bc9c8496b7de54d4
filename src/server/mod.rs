//! HTTP server bootstrap. Grounded on the teacher's `server::run_server_async`
//! / `server::run_server` split: an async fn that does the real startup work,
//! and a synchronous wrapper that builds a tokio runtime for the `serve` CLI
//! command so every other sub-command stays synchronous.

pub mod api;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::AiSettings;
use crate::llm::NotConfiguredLlmClient;
use crate::repository::FileRepository;

pub const DEFAULT_DATA_DIR: &str = "data/users";

pub async fn run_server_async(bind_addr: &str, data_dir: &str) -> std::io::Result<()> {
    let addr: SocketAddr = bind_addr.parse().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    println!("stratadvisor: loading catalog…");
    let catalog = Catalog::load(crate::catalog::DEFAULT_HERO_CATALOG_PATH, crate::catalog::DEFAULT_LINEUP_TEMPLATES_PATH)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Failed to load catalog: {e}")))?;

    let repository: Arc<dyn crate::repository::Repository> = Arc::new(FileRepository::new(data_dir));
    let llm: Arc<dyn crate::llm::LlmClient> = Arc::new(NotConfiguredLlmClient);
    let ai_settings = Arc::new(AiSettings::from_env());

    let state = routes::AppState { catalog, repository, llm, ai_settings };
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("stratadvisor server listening on http://{bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Synchronous entry point: creates a tokio runtime and drives the async
/// server. Called from `cli::handle_serve`.
pub fn run_server(bind_addr: &str, data_dir: &str) -> std::io::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
        .block_on(run_server_async(bind_addr, data_dir))
}

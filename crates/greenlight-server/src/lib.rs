//! Greenlight Server
//!
//! The control-plane boundary for the Greenlight approval platform. Wires
//! the approval engine to an in-memory instance store and a logging
//! notifier, exposes the three control operations over HTTP, and runs
//! crash recovery at startup so instances interrupted before their suspend
//! point are resumed before traffic arrives.

pub mod api;
pub mod config;
pub mod error;
pub mod notifier;
pub mod server;

use std::sync::Arc;
use tracing::info;

use greenlight_core::{ActivityExecutor, ApprovalEngine};
use greenlight_state_inmemory::InMemoryInstanceStore;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use notifier::LoggingNotifier;
pub use server::ApprovalServer;

/// Build a fully wired approval server over the given store and notifier
pub fn build_server(
    store: Arc<dyn greenlight_core::InstanceStore>,
    notifier: Arc<dyn greenlight_core::Notifier>,
) -> Arc<ApprovalServer> {
    let engine = Arc::new(ApprovalEngine::new(store, ActivityExecutor::new(notifier)));
    Arc::new(ApprovalServer::new(engine))
}

/// Run the server until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    let store: Arc<dyn greenlight_core::InstanceStore> = Arc::new(InMemoryInstanceStore::new());
    let notifier = Arc::new(LoggingNotifier::new());

    let engine = Arc::new(ApprovalEngine::new(
        store,
        ActivityExecutor::new(notifier),
    ));

    // Resume any instance a previous run left before its suspend point
    let resumed = engine.recover_in_flight().await?;
    if resumed > 0 {
        info!(count = resumed, "recovered in-flight approval instances");
    }

    let server = Arc::new(ApprovalServer::new(engine));
    let app = api::build_router(server);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Greenlight server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

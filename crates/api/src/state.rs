use std::sync::Arc;

use refactorer_db::store::RefactoringStore;
use refactorer_intelligence::CodeIntelligence;

use crate::config::ServerConfig;
use crate::engine::LifecycleController;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Record store (PostgreSQL or in-memory).
    pub store: Arc<dyn RefactoringStore>,
    /// Code intelligence backend, also used directly by advisory endpoints.
    pub backend: Arc<dyn CodeIntelligence>,
    /// Lifecycle controller owning the background worker pool.
    pub lifecycle: Arc<LifecycleController>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the controller to `store` and `backend` and start its workers.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        store: Arc<dyn RefactoringStore>,
        backend: Arc<dyn CodeIntelligence>,
        config: ServerConfig,
    ) -> Self {
        let lifecycle = Arc::new(LifecycleController::start(
            Arc::clone(&store),
            Arc::clone(&backend),
            config.lifecycle_workers,
        ));
        Self {
            store,
            backend,
            lifecycle,
            config: Arc::new(config),
        }
    }
}

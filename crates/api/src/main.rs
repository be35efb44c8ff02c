use std::sync::Arc;
use std::time::Duration;

use refactorer_db::store::{MemoryStore, PgStore, RefactoringStore};
use refactorer_intelligence::{CodeIntelligence, MockBackend, OpenAiBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use refactorer_api::config::{BackendConfig, LogFormat, ServerConfig};
use refactorer_api::router::build_app_router;
use refactorer_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "refactorer_api=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = config.backend.name(),
        workers = config.lifecycle_workers,
        "Loaded server configuration"
    );

    // --- Store ---
    let store: Arc<dyn RefactoringStore> = match &config.database_url {
        Some(database_url) => {
            let pool = refactorer_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            refactorer_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            refactorer_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Code intelligence backend ---
    let backend: Arc<dyn CodeIntelligence> = match &config.backend {
        BackendConfig::Mock { latency } => {
            Arc::new(MockBackend::new().with_latency(*latency))
        }
        BackendConfig::OpenAi(openai) => Arc::new(
            OpenAiBackend::new(openai.clone()).expect("Failed to build code intelligence client"),
        ),
    };
    tracing::info!(backend = backend.name(), "Code intelligence backend ready");

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let bind_addr = config.bind_addr();
    let state = AppState::new(store, backend, config);
    let lifecycle = Arc::clone(&state.lifecycle);

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(addr = %bind_addr, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining background units");

    if lifecycle.shutdown(shutdown_timeout).await {
        tracing::info!("Graceful shutdown complete");
    } else {
        tracing::warn!(
            timeout_secs = shutdown_timeout.as_secs(),
            "Background units still running at shutdown deadline; affected records stay processing"
        );
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

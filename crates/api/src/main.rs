use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use noteroom_api::config::{ServerConfig, StoreBackend};
use noteroom_api::router::build_app_router;
use noteroom_api::state::AppState;
use noteroom_api::ws;
use noteroom_db::{MemoryNoteStore, NoteStore, PgNoteStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();
    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = ?config.store_backend,
        channel = %config.room_channel,
        policy = ?config.failure_policy,
        "Loaded server configuration"
    );

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let heartbeat_every = Duration::from_secs(config.heartbeat_interval_secs);
    let cleanup_budget = Duration::from_secs(config.shutdown_timeout_secs);

    let store = open_store(config.store_backend).await;
    let state = AppState::new(store, config);
    let ws_manager = Arc::clone(&state.ws_manager);
    let heartbeat = ws::start_heartbeat(Arc::clone(&ws_manager), heartbeat_every);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Note board listening");

    axum::serve(listener, build_app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!(
        connections = ws_manager.connection_count().await,
        "Server stopped, closing WebSocket connections"
    );
    if tokio::time::timeout(cleanup_budget, ws_manager.shutdown_all())
        .await
        .is_err()
    {
        tracing::warn!("Timed out closing WebSocket connections");
    }
    heartbeat.abort();

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "noteroom_api=debug,noteroom_db=debug,tower_http=debug".into());
    let json = config.log_json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Build the configured store. Postgres is checked and migrated first.
async fn open_store(backend: StoreBackend) -> Arc<dyn NoteStore> {
    match backend {
        StoreBackend::Postgres => {
            let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
            let pool = noteroom_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            noteroom_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            noteroom_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database ready, migrations applied");
            Arc::new(PgNoteStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory note store; notes are lost on restart");
            Arc::new(MemoryNoteStore::new())
        }
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

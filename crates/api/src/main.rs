use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reel_api::bootstrap;
use reel_api::config::ServerConfig;
use reel_api::router::build_app_router;
use reel_api::state::AppState;
use reel_db::Store;

const DEFAULT_LOG_FILTER: &str = "reel_api=debug,reel_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        default_limit = config.pagination.default_limit,
        max_limit = config.pagination.max_limit,
        overflow = ?config.pagination.overflow,
        "Loaded server configuration"
    );

    let store = open_store(&config).await;

    if let Some(admin) = &config.admin {
        bootstrap::ensure_admin(&store, admin)
            .await
            .expect("Failed to bootstrap admin account");
    }

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let app = build_app_router(AppState {
        store,
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Catalog API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shut down cleanly");
}

/// Human-readable logs filtered by `RUST_LOG`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect to `DATABASE_URL`, verify it answers, and migrate the schema.
async fn open_store(config: &ServerConfig) -> Store {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = reel_db::create_pool(&database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    reel_db::health_check(&pool)
        .await
        .expect("Database is not answering");
    reel_db::run_migrations(&pool)
        .await
        .expect("Failed to apply migrations");
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready"
    );

    Store::postgres(pool)
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl-C");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Draining connections before shutdown");
}

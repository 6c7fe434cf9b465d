use std::net::SocketAddr;
use std::sync::Arc;

use petfy_api::config::ServerConfig;
use petfy_api::router::build_app_router;
use petfy_api::state::AppState;
use petfy_api::storage::LocalBlobStore;
use petfy_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Subdirectory of `UPLOAD_DIR` holding walker identity documents.
const DOCUMENTS_DIR: &str = "walker-documents";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        "Loaded server configuration"
    );

    let pool = connect_database().await;

    let state = AppState {
        pool,
        blob_store: Arc::new(LocalBlobStore::new(config.upload_dir.join(DOCUMENTS_DIR))),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Petfy API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shut down cleanly");
}

/// Structured logs filtered by `RUST_LOG`, defaulting to debug for this
/// crate and the HTTP layer.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "petfy_api=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect to `DATABASE_URL`, check it answers, and bring the schema up to
/// date. Any failure aborts startup.
async fn connect_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = petfy_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    petfy_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    petfy_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready, migrations applied");
    pool
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
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

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Draining in-flight requests before shutdown");
}

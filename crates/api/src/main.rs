use std::net::SocketAddr;
use std::sync::Arc;

use coursehub_store::memory::{MemoryDocumentStore, MemoryIdentityStore, MemoryObjectStorage};
use coursehub_store::ports::ObjectStorage;
use coursehub_store::postgres::{self, PgDocumentStore, PgIdentityStore};
use coursehub_store::s3::S3ObjectStorage;
use mockable::{Clock, DefaultClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursehub_api::config::ServerConfig;
use coursehub_api::router::build_app_router;
use coursehub_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "coursehub_api=debug,coursehub_store=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Object storage ---
    let objects: Arc<dyn ObjectStorage> = match config.storage.s3.clone() {
        Some(settings) => {
            tracing::info!(bucket = %settings.bucket, "Using S3 object storage");
            Arc::new(S3ObjectStorage::connect(settings).await)
        }
        None => {
            tracing::warn!("S3_BUCKET not set, media is kept in memory");
            Arc::new(MemoryObjectStorage::new())
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    // --- Database ---
    let state = match config.storage.database_url.clone() {
        Some(database_url) => {
            let pool = postgres::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            postgres::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            postgres::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            AppState::with_stores(
                config.clone(),
                Arc::new(PgDocumentStore::new(pool.clone())),
                Arc::new(PgIdentityStore::new(pool.clone())),
                objects,
                clock,
                Some(pool),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, courses and accounts are kept in memory");
            AppState::with_stores(
                config.clone(),
                Arc::new(MemoryDocumentStore::new()),
                Arc::new(MemoryIdentityStore::new()),
                objects,
                clock,
                None,
            )
        }
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
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

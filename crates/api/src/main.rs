use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use commons_db::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commons_api::config::ServerConfig;
use commons_api::router::build_app_router;
use commons_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commons_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let db = match &config.database_url {
        Some(url) => connect_postgres(url).await?,
        None => {
            tracing::warn!("DATABASE_URL not set, serving from the in-memory store");
            Database::memory()
        }
    };

    // --- App state ---
    let state = AppState {
        db,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config)?;

    // --- Start server ---
    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address {:?}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

async fn connect_postgres(url: &str) -> anyhow::Result<Database> {
    let pool = commons_db::create_pool(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    commons_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    commons_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Database::Postgres(pool))
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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

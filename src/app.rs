use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::config::Config;
use crate::database;
use crate::repository::PgUserRepository;
use crate::routes::create_routes;
use crate::state::AppState;

/// Opens the pool, serves until SIGINT/SIGTERM, then closes the pool once
/// in-flight requests have drained.
pub async fn run(config: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    if config.using_default_database_url {
        if config.environment.is_production() {
            tracing::warn!("DATABASE_URL is not set; using the built-in default DSN in production");
        } else {
            tracing::info!("DATABASE_URL is not set; using the built-in default DSN");
        }
    }

    let pool = database::connect(&config).await?;
    tracing::info!("Successfully connected to database");

    if config.run_migrations {
        database::run_migrations(&pool).await?;
        tracing::info!("Migrations run successfully");
    }

    let state = AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        config.request_timeout,
    );
    let app = create_routes(state, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pool");
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        _ = terminate => tracing::info!("Received SIGTERM signal"),
    }
}

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::{seed, DatabaseManager};

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting catalog API in {:?} mode", config.environment);

    // Connection failures abort startup; seeding failures do not
    let db = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to document store")?;

    if config.database.seed_on_startup {
        let startup_db = db.with_timeout(config.database.startup_timeout());
        if let Err(e) = seed::initialize(&startup_db).await {
            warn!("Startup seeding failed, continuing without it: {}", e);
        }
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    let router = app(AppState::new(db.clone()), &config);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped, closing document store");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

// Main entry point for the Crew server

use crew::api::{create_router, AppState};
use crew::auth::auth_middleware::AuthState;
use crew::config::Config;
use crew::store::{SqliteUserStore, UserStore};
use crew::telemetry::init_tracing;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber with config values
    init_tracing(&config.log_level, &config.log_format).map_err(anyhow::Error::msg)?;

    info!("Starting Crew server");

    info!(
        bind_address = %config.bind_address,
        port = config.port,
        database = ?config.database_path,
        "Configuration loaded"
    );

    if config.api_key.is_empty() {
        warn!("CREW_API_KEY is not set; all protected requests will be rejected");
    }

    // 3. Open the user store
    let store = SqliteUserStore::connect(&config.database_path)
        .await
        .map_err(|e| {
            error!(error = %e, path = ?config.database_path, "Failed to open user store");
            e
        })?;
    store.ping().await?;

    info!("User store initialized");

    // 4. Build state and router
    let auth_state = Arc::new(AuthState::new(config.api_key.clone()));
    let app_state = AppState::new(Arc::new(store), config.clone());
    let router = create_router(&app_state, auth_state).with_state(app_state);

    // 5. Start HTTP server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind to address");
        e
    })?;

    info!(addr = %addr, "Server listening on {}", addr);

    // ConnectInfo gives the auth middleware the peer address for its logs
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| {
        error!(error = %e, "Server error");
        e
    })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}

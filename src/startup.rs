//! Application startup and initialization logic.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::app_state::AppState;
use crate::auth::JwtService;
use crate::config::{Config, StorageBackend};
use crate::database::{DocumentStore, MemoryStore, MongoStore};

/// Initialize services and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!("🚀 Starting travel groups API ({})", config.environment);

    // Initialize Prometheus metrics exporter
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("✅ Prometheus metrics initialized");

    let store = setup_store(config).await?;

    let jwt_service = JwtService::from_config(config)?;
    info!(
        "✅ JWT service initialized (tokens valid for {} days)",
        jwt_service.validity().num_days()
    );

    if config.legacy_error_status {
        warn!("⚠️  LEGACY_ERROR_STATUS enabled: store failures and bad requests answer 200");
    }

    Ok(AppState::new(store, config.clone(), jwt_service).with_metrics(metrics_handle))
}

/// Connect the configured document store.
async fn setup_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.storage_backend {
        StorageBackend::MongoDb => {
            let uri = config
                .mongodb_uri
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("MONGODB_URI is required for the mongodb backend"))?;

            let store = MongoStore::connect(uri, &config.database_name)
                .await
                .map_err(|e| {
                    error!("Failed to connect to MongoDB: {}", e);
                    anyhow::anyhow!("MongoDB connection failed: {}", e)
                })?;
            info!("✅ MongoDB connection established (database: {})", config.database_name);
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            warn!("⚠️  Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Wait for shutdown signal.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}

use std::sync::Arc;
use tokio::signal;

use soulverse_profile::config::{AppConfig, StoreBackend};
use soulverse_profile::services::ProfileService;
use soulverse_profile::{build_router, AppState};
use soulverse_shared::clients::{DocumentStore, MemoryStore, MongoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    soulverse_shared::middleware::init_tracing("soulverse-profile");

    let config = AppConfig::load()?;

    let (store, mongo): (Arc<dyn DocumentStore>, Option<MongoStore>) = match config.store {
        StoreBackend::Mongo => {
            let mongo = MongoStore::connect(&config.mongodb_uri, &config.database).await?;
            (Arc::new(mongo.clone()), Some(mongo))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, data will not survive a restart");
            (Arc::new(MemoryStore::new()), None)
        }
    };

    let metrics_handle = soulverse_shared::middleware::init_metrics()?;
    let profiles = ProfileService::new(store, config.default_profile_image);

    let state = Arc::new(AppState {
        profiles,
        metrics_handle: Some(metrics_handle),
    });
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(addr = %addr, "soulverse-profile starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(mongo) = mongo {
        mongo.shutdown().await;
    }
    tracing::info!("soulverse-profile stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}

//! # farmledgerd — farmledger daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`farmledger.toml`, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until Ctrl-C or SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use farmledger_adapter_http_axum::state::AppState;
use farmledger_adapter_storage_sqlite_sqlx::{
    SqliteCropRepository, SqliteFarmRepository, SqliteHarvestRepository,
    SqlitePlantingRepository, SqliteProducerRepository,
};
use farmledger_app::services::crop_service::CropService;
use farmledger_app::services::farm_service::FarmService;
use farmledger_app::services::harvest_service::HarvestService;
use farmledger_app::services::planting_service::PlantingService;
use farmledger_app::services::producer_service::ProducerService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = config
        .storage()
        .build()
        .await
        .with_context(|| format!("opening database {}", config.database.url))?;
    let pool = db.pool().clone();

    // Repositories
    let producer_repo = SqliteProducerRepository::new(pool.clone());
    let farm_repo = SqliteFarmRepository::new(pool.clone());
    let crop_repo = SqliteCropRepository::new(pool.clone());
    let harvest_repo = SqliteHarvestRepository::new(pool.clone());
    let planting_repo = SqlitePlantingRepository::new(pool);

    // Services
    let state = AppState::new(
        ProducerService::new(producer_repo.clone()),
        FarmService::new(farm_repo.clone(), producer_repo),
        CropService::new(crop_repo.clone()),
        HarvestService::new(harvest_repo.clone()),
        PlantingService::new(planting_repo, farm_repo, crop_repo, harvest_repo),
    );
    let app = farmledger_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(address = %bind_addr, "farmledgerd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("farmledgerd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

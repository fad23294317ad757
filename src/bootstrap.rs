//! Startup sequence shared by the binaries.
//!
//! The payment client is configured exactly once here; the probe runs after
//! it. Neither depends on the other.

use tracing::info;

use crate::config::{Config, DatabaseConfig};
use crate::database::{self, DbConnector, ProbeOutcome};
use crate::error::AppError;
use crate::payment::{self, PaymentClient};

/// Handles produced at startup.
#[derive(Debug)]
pub struct Services {
    pub payments: PaymentClient,
    pub database: ProbeOutcome,
}

pub async fn start(config: &Config) -> Result<Services, AppError> {
    info!(
        log_level = %config.log_level,
        db_driver = ?config.database.driver,
        "config loaded"
    );

    let payments = payment::configure(&config.payment)?;
    let database = run_probe(&config.database).await;

    Ok(Services { payments, database })
}

pub async fn run_probe(config: &DatabaseConfig) -> ProbeOutcome {
    let connector = DbConnector::for_driver(config.driver);
    database::probe(&connector, config.uri.as_deref()).await
}

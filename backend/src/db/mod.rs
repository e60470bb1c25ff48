//! Database pool and migrations
//!
//! The database is the Supabase project's Postgres, reached either
//! directly (port 5432, 54322 locally) or through the Supavisor
//! transaction pooler on port 6543. The pooler hands each transaction a
//! different server connection, so prepared statements cannot be cached
//! there.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const APPLICATION_NAME: &str = "top-tier-backend";
const TRANSACTION_POOLER_PORT: u16 = 6543;

/// Pool sizing and connection lifetimes
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl PoolSettings {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            min_connections: config.max_connections.min(2),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }
}

/// Whether the URL points at the transaction pooler
pub fn uses_transaction_pooler(options: &PgConnectOptions) -> bool {
    options.get_port() == TRANSACTION_POOLER_PORT
}

/// Connection options for a database URL
pub fn connect_options(url: &str) -> Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(url)
        .context("Invalid database URL")?
        .application_name(APPLICATION_NAME);

    if uses_transaction_pooler(&options) {
        info!("Transaction pooler detected, disabling statement cache");
        Ok(options.statement_cache_capacity(0))
    } else {
        Ok(options)
    }
}

/// Create the connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let settings = PoolSettings::from_config(config);

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .max_lifetime(settings.max_lifetime)
        .test_before_acquire(true)
        .connect_with(connect_options(&config.url)?)
        .await
        .context("Failed to connect to database")?;

    info!(
        max = settings.max_connections,
        min = settings.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Apply pending migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// `SELECT 1` against the pool
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "Database health check failed");
            e.into()
        })
}

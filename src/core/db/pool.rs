//! PostgreSQL pool setup for the blog store

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

use crate::core::config::{Config, DEFAULT_DB_MAX_CONNECTIONS};

/// Connections kept warm while the server is idle
const MIN_CONNECTIONS: u32 = 1;

/// How long a request waits for a free connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections are closed after this long
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Settings for the blog's connection pool
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            min_connections: MIN_CONNECTIONS,
            acquire_timeout: ACQUIRE_TIMEOUT,
            idle_timeout: IDLE_TIMEOUT,
        }
    }
}

impl DbConfig {
    /// Pool settings taken from the application config
    pub fn from_config(config: &Config) -> Self {
        Self {
            database_url: config.database_url.clone(),
            max_connections: config.db_max_connections,
            ..Default::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Open the pool and bring the schema up to date
pub async fn create_pool_with_migrations(config: &DbConfig) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::debug!(max_connections = config.max_connections, "Database pool opened");

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply pending migrations from `./migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Blog schema migrations applied");
    Ok(())
}

/// Round-trip a trivial query
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

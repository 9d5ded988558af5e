//! Database connection and pool management
//!
//! One pool is created at startup for whichever backend the configured URL
//! names. Handlers never see the pool directly; they go through the
//! repository traits in [`crate::repositories`].

use crate::config::DatabaseConfig;
use anyhow::{bail, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Storage backend selected by the database URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else {
            bail!("Unsupported database URL scheme (expected postgres:// or sqlite:)")
        }
    }
}

/// Process-wide connection pool
#[derive(Debug, Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub fn backend(&self) -> DatabaseBackend {
        match self {
            DbPool::Postgres(_) => DatabaseBackend::Postgres,
            DbPool::Sqlite(_) => DatabaseBackend::Sqlite,
        }
    }

    pub async fn close(&self) {
        match self {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Pool tuning shared by both backends
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub require_ssl: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
            require_ssl: false,
        }
    }
}

impl From<&DatabaseConfig> for DbConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            acquire_timeout_secs: config.acquire_timeout_secs,
            require_ssl: config.require_ssl,
            ..Default::default()
        }
    }
}

/// Create the pool for the configured backend
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    create_pool_with_config(&DbConfig::from(config)).await
}

/// Create the pool with custom configuration
pub async fn create_pool_with_config(config: &DbConfig) -> Result<DbPool> {
    let pool = match DatabaseBackend::from_url(&config.url)? {
        DatabaseBackend::Postgres => DbPool::Postgres(create_pg_pool(config).await?),
        DatabaseBackend::Sqlite => DbPool::Sqlite(create_sqlite_pool(config).await?),
    };
    Ok(pool)
}

async fn create_pg_pool(config: &DbConfig) -> Result<PgPool> {
    let ssl_mode = if config.require_ssl {
        PgSslMode::Require
    } else {
        PgSslMode::Prefer
    };
    let connect_options = PgConnectOptions::from_str(&config.url)?
        .application_name("dahiraa")
        .ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = config.min_connections,
        require_ssl = config.require_ssl,
        "PostgreSQL pool created"
    );

    Ok(pool)
}

async fn create_sqlite_pool(config: &DbConfig) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Each connection to an in-memory database is its own database, so the
    // pool must hold exactly one connection and never recycle it.
    let pool = if is_in_memory(&config.url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect_with(connect_options)
            .await?
    };

    info!(url = %config.url, "SQLite pool created");
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Run database migrations for the pool's backend
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    info!(backend = ?pool.backend(), "Running database migrations...");
    match pool {
        DbPool::Postgres(pool) => sqlx::migrate!("./migrations/postgres").run(pool).await?,
        DbPool::Sqlite(pool) => sqlx::migrate!("./migrations/sqlite").run(pool).await?,
    }
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DbPool) -> Result<()> {
    let result = match pool {
        DbPool::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
        DbPool::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
    };
    result.map_err(|e| {
        warn!("Database health check failed: {}", e);
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout_secs, 30);
    }

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            DatabaseBackend::from_url("postgres://u:p@localhost/dahiraa").unwrap(),
            DatabaseBackend::Postgres
        );
        assert_eq!(
            DatabaseBackend::from_url("postgresql://localhost/dahiraa").unwrap(),
            DatabaseBackend::Postgres
        );
        assert_eq!(
            DatabaseBackend::from_url("sqlite::memory:").unwrap(),
            DatabaseBackend::Sqlite
        );
        assert!(DatabaseBackend::from_url("mysql://localhost/dahiraa").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_sqlite_pool_migrates_and_answers() {
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let pool = create_pool_with_config(&config).await.unwrap();
        assert_eq!(pool.backend(), DatabaseBackend::Sqlite);

        run_migrations(&pool).await.unwrap();
        health_check(&pool).await.unwrap();
    }
}

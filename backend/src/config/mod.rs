//! Configuration management for the Dahiraa backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: DAHIRAA__)
//! 4. The conventional `DATABASE_URL`, `JWT_SECRET` and `PORT` variables

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Secret shipped in the defaults; rejected in production
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-in-production";

/// Shortest JWT secret accepted in production
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// bcrypt accepts work factors in this range
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
}

/// Database configuration
///
/// The URL scheme selects the backend: `postgres://` or `sqlite:`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Require TLS for PostgreSQL connections. Ignored for SQLite.
    pub require_ssl: bool,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_secs: i64,
}

/// Password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// bcrypt work factor for new digests
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { bcrypt_cost: 10 }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                request_timeout_secs: 30,
                body_limit_bytes: 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "sqlite://dahiraa.db".to_string(),
                max_connections: 10,
                acquire_timeout_secs: 30,
                require_ssl: false,
            },
            jwt: JwtConfig {
                secret: DEVELOPMENT_JWT_SECRET.to_string(),
                expiry_secs: 24 * 60 * 60, // 24 hours
            },
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with DAHIRAA__ prefix
    /// 4. DATABASE_URL, JWT_SECRET, PORT
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let mut defaults = AppConfig::default();
        defaults.database.require_ssl = Self::is_production();

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&defaults)?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (DAHIRAA__ prefix)
            // e.g., DAHIRAA__SERVER__PORT=9000 sets server.port
            .add_source(config::Environment::with_prefix("DAHIRAA").separator("__"))
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            .set_override_option("server.port", env::var("PORT").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.trim().is_empty() {
            bail!("JWT secret is not configured");
        }
        if self.jwt.expiry_secs <= 0 {
            bail!("jwt.expiry_secs must be positive");
        }
        if !BCRYPT_COST_RANGE.contains(&self.auth.bcrypt_cost) {
            bail!(
                "auth.bcrypt_cost must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            );
        }
        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }

    /// Extra requirements when `RUST_ENV=production`
    pub fn validate_production(&self) -> Result<()> {
        if self.jwt.secret == DEVELOPMENT_JWT_SECRET || self.jwt.secret.len() < MIN_PRODUCTION_SECRET_LEN {
            bail!(
                "JWT secret must be at least {} characters and not the development default",
                MIN_PRODUCTION_SECRET_LEN
            );
        }
        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expiry_secs, 86_400);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let mut config = AppConfig::default();
        config.jwt.secret = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_rejects_weak_secrets() {
        let mut config = AppConfig::default();
        assert!(config.validate_production().is_err());

        config.jwt.secret = "short-but-not-default".to_string();
        assert!(config.validate_production().is_err());

        config.jwt.secret = "x".repeat(MIN_PRODUCTION_SECRET_LEN);
        assert!(config.validate_production().is_ok());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = AppConfig::default();
        config.auth.bcrypt_cost = 3;
        assert!(config.validate().is_err());
        config.auth.bcrypt_cost = 4;
        assert!(config.validate().is_ok());
        config.auth.bcrypt_cost = 32;
        assert!(config.validate().is_err());
    }
}

//! Application state management
//!
//! Shared state passed to every handler via Axum's state extraction.
//! Built once at startup; cloning is cheap (pools and keys are `Arc`ed).

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::repositories::Repositories;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,
    /// Repositories for the pool's backend
    pub repos: Repositories,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
}

impl AppState {
    /// Derives the JWT keys and repository set. Call once at startup.
    pub fn new(db: DbPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.expiry_secs);
        let repos = Repositories::new(&db);

        Self {
            db,
            repos,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn db(&self) -> &DbPool {
        &self.db
    }

    #[inline]
    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// bcrypt work factor for new digests
    #[inline]
    pub fn bcrypt_cost(&self) -> u32 {
        self.config.auth.bcrypt_cost
    }
}

//! Database repositories
//!
//! One trait per entity, each implemented for PostgreSQL and SQLite.
//! [`Repositories`] picks the implementations matching the pool once at
//! startup; everything above this layer only sees the traits.

pub mod cotisation;
pub mod event;
pub mod expense;
pub mod member;
pub mod user;

use crate::db::DbPool;
use std::sync::Arc;

pub use cotisation::{
    CotisationChanges, CotisationRecord, CotisationRepository, NewCotisation,
    PgCotisationRepository, SqliteCotisationRepository,
};
pub use event::{
    EventChanges, EventRecord, EventRepository, NewEvent, PgEventRepository,
    SqliteEventRepository,
};
pub use expense::{
    ExpenseChanges, ExpenseRecord, ExpenseRepository, NewExpense, PgExpenseRepository,
    SqliteExpenseRepository,
};
pub use member::{
    MemberChanges, MemberRecord, MemberRepository, NewMember, PgMemberRepository,
    SqliteMemberRepository,
};
pub use user::{PgUserRepository, SqliteUserRepository, UserChanges, UserRecord, UserRepository};

/// Repository set for the configured backend
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub cotisations: Arc<dyn CotisationRepository>,
    pub events: Arc<dyn EventRepository>,
    pub expenses: Arc<dyn ExpenseRepository>,
}

impl Repositories {
    pub fn new(pool: &DbPool) -> Self {
        match pool {
            DbPool::Postgres(pool) => Self {
                users: Arc::new(PgUserRepository::new(pool.clone())),
                members: Arc::new(PgMemberRepository::new(pool.clone())),
                cotisations: Arc::new(PgCotisationRepository::new(pool.clone())),
                events: Arc::new(PgEventRepository::new(pool.clone())),
                expenses: Arc::new(PgExpenseRepository::new(pool.clone())),
            },
            DbPool::Sqlite(pool) => Self {
                users: Arc::new(SqliteUserRepository::new(pool.clone())),
                members: Arc::new(SqliteMemberRepository::new(pool.clone())),
                cotisations: Arc::new(SqliteCotisationRepository::new(pool.clone())),
                events: Arc::new(SqliteEventRepository::new(pool.clone())),
                expenses: Arc::new(SqliteExpenseRepository::new(pool.clone())),
            },
        }
    }
}

/// True when `err` wraps a unique-constraint violation from either backend
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

/// True when `err` wraps a foreign-key violation from either backend
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) async fn test_sqlite_pool() -> sqlx::SqlitePool {
    let config = crate::db::DbConfig {
        url: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    let pool = crate::db::create_pool_with_config(&config).await.unwrap();
    crate::db::run_migrations(&pool).await.unwrap();
    match pool {
        DbPool::Sqlite(pool) => pool,
        DbPool::Postgres(_) => unreachable!("sqlite URL"),
    }
}

#[cfg(test)]
pub(crate) fn new_member(first: &str, last: &str) -> NewMember {
    NewMember {
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: None,
        email: None,
        address: None,
        joined_on: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bundle_follows_pool_backend() {
        let config = crate::db::DbConfig {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        let pool = crate::db::create_pool_with_config(&config).await.unwrap();
        crate::db::run_migrations(&pool).await.unwrap();

        let repos = Repositories::new(&pool);
        assert_eq!(repos.users.count().await.unwrap(), 0);
        assert_eq!(repos.members.count().await.unwrap(), 0);
    }

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = anyhow::anyhow!("boom");
        assert!(!is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }
}

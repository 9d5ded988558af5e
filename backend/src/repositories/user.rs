//! User repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dahiraa_shared::{Page, Role, UserProfile, UserSummary};
use sqlx::{PgPool, SqlitePool};
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn role(&self) -> Result<Role> {
        self.role
            .parse::<Role>()
            .map_err(|e| anyhow::anyhow!("User {} has a corrupt role: {}", self.id, e))
    }

    pub fn summary(&self) -> Result<UserSummary> {
        Ok(UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role()?,
        })
    }

    pub fn profile(&self) -> Result<UserProfile> {
        Ok(UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Fields a profile update may change
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, email: &str, password_hash: &str, role: Role) -> Result<UserRecord>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>>;
    /// Apply only the supplied fields; `None` when the user does not exist
    async fn update(&self, id: &str, changes: UserChanges) -> Result<Option<UserRecord>>;
    async fn list(&self, page: Page) -> Result<Vec<UserRecord>>;
    async fn count(&self) -> Result<i64>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, email: &str, password_hash: &str, role: Role) -> Result<UserRecord> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                updated_at = $4
            WHERE id = $1
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self, page: Page) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, email: &str, password_hash: &str, role: Role) -> Result<UserRecord> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET email = COALESCE(?2, email),
                password_hash = COALESCE(?3, password_hash),
                updated_at = ?4
            WHERE id = ?1
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self, page: Page) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at ASC, id ASC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{is_unique_violation, test_sqlite_pool};

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = SqliteUserRepository::new(test_sqlite_pool().await);
        let created = repo
            .create("a@x.com", "$2b$04$digest", Role::Gestionnaire)
            .await
            .unwrap();

        assert_eq!(created.role().unwrap(), Role::Gestionnaire);
        assert!(Uuid::parse_str(&created.id).is_ok());

        let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        // Case-sensitive as stored
        assert!(repo.find_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let repo = SqliteUserRepository::new(test_sqlite_pool().await);
        repo.create("dup@x.com", "h1", Role::Admin).await.unwrap();

        let err = repo.create("dup@x.com", "h2", Role::Admin).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = SqliteUserRepository::new(test_sqlite_pool().await);
        let user = repo.create("old@x.com", "h1", Role::Admin).await.unwrap();

        let updated = repo
            .update(
                &user.id,
                UserChanges {
                    email: Some("new@x.com".to_string()),
                    password_hash: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.email, "new@x.com");
        assert_eq!(updated.password_hash, "h1");
        assert!(updated.updated_at >= user.updated_at);

        let missing = repo.update("nope", UserChanges::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_and_count() {
        let repo = SqliteUserRepository::new(test_sqlite_pool().await);
        for i in 0..3 {
            repo.create(&format!("u{}@x.com", i), "h", Role::Gestionnaire)
                .await
                .unwrap();
        }

        assert_eq!(repo.count().await.unwrap(), 3);
        let page = repo.list(Page { limit: 2, offset: 0 }).await.unwrap();
        assert_eq!(page.len(), 2);
        let rest = repo.list(Page { limit: 2, offset: 2 }).await.unwrap();
        assert_eq!(rest.len(), 1);
    }
}

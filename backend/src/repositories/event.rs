//! Event repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dahiraa_shared::Page;
use sqlx::{PgPool, SqlitePool};
use uuid::Uuid;

/// Event record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_on: NaiveDate,
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_on: NaiveDate,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, input: NewEvent) -> Result<EventRecord>;
    async fn find_by_id(&self, id: &str) -> Result<Option<EventRecord>>;
    async fn list(&self, page: Page) -> Result<Vec<EventRecord>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: &str, changes: EventChanges) -> Result<Option<EventRecord>>;
    /// Expenses linked to the event are kept and detached
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, input: NewEvent) -> Result<EventRecord> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            INSERT INTO events (id, title, description, location, starts_on, budget,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, title, description, location, starts_on, budget, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.starts_on)
        .bind(input.budget)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EventRecord>> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, title, description, location, starts_on, budget, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, page: Page) -> Result<Vec<EventRecord>> {
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, title, description, location, starts_on, budget, created_at, updated_at
            FROM events
            ORDER BY starts_on DESC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: EventChanges) -> Result<Option<EventRecord>> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                starts_on = COALESCE($5, starts_on),
                budget = COALESCE($6, budget),
                updated_at = $7
            WHERE id = $1
            RETURNING id, title, description, location, starts_on, budget, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.starts_on)
        .bind(changes.budget)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, input: NewEvent) -> Result<EventRecord> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            INSERT INTO events (id, title, description, location, starts_on, budget,
                                created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING id, title, description, location, starts_on, budget, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.starts_on)
        .bind(input.budget)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EventRecord>> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, title, description, location, starts_on, budget, created_at, updated_at
            FROM events
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, page: Page) -> Result<Vec<EventRecord>> {
        let records = sqlx::query_as::<_, EventRecord>(
            r#"
            SELECT id, title, description, location, starts_on, budget, created_at, updated_at
            FROM events
            ORDER BY starts_on DESC, id ASC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: EventChanges) -> Result<Option<EventRecord>> {
        let record = sqlx::query_as::<_, EventRecord>(
            r#"
            UPDATE events
            SET title = COALESCE(?2, title),
                description = COALESCE(?3, description),
                location = COALESCE(?4, location),
                starts_on = COALESCE(?5, starts_on),
                budget = COALESCE(?6, budget),
                updated_at = ?7
            WHERE id = ?1
            RETURNING id, title, description, location, starts_on, budget, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.starts_on)
        .bind(changes.budget)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_sqlite_pool;

    fn magal() -> NewEvent {
        NewEvent {
            title: "Magal".to_string(),
            description: None,
            location: Some("Touba".to_string()),
            starts_on: NaiveDate::from_ymd_opt(2024, 8, 23).unwrap(),
            budget: Some(250_000.0),
        }
    }

    #[tokio::test]
    async fn test_create_and_update() {
        let repo = SqliteEventRepository::new(test_sqlite_pool().await);
        let event = repo.create(magal()).await.unwrap();
        assert_eq!(event.budget, Some(250_000.0));

        let updated = repo
            .update(
                &event.id,
                EventChanges {
                    description: Some("Grand Magal".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Magal");
        assert_eq!(updated.description.as_deref(), Some("Grand Magal"));
        assert_eq!(updated.location.as_deref(), Some("Touba"));
    }

    #[tokio::test]
    async fn test_missing_event() {
        let repo = SqliteEventRepository::new(test_sqlite_pool().await);
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
        assert!(repo.update("missing", EventChanges::default()).await.unwrap().is_none());
        assert!(!repo.delete("missing").await.unwrap());
    }
}

//! Cotisation (membership dues) repository

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dahiraa_shared::Page;
use sqlx::{PgPool, SqlitePool};
use uuid::Uuid;

/// Cotisation record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CotisationRecord {
    pub id: String,
    pub member_id: String,
    pub amount: f64,
    pub period: String,
    pub paid_on: NaiveDate,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCotisation {
    pub member_id: String,
    pub amount: f64,
    pub period: String,
    pub paid_on: NaiveDate,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CotisationChanges {
    pub amount: Option<f64>,
    pub period: Option<String>,
    pub paid_on: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait CotisationRepository: Send + Sync {
    async fn create(&self, input: NewCotisation) -> Result<CotisationRecord>;
    async fn find_by_id(&self, id: &str) -> Result<Option<CotisationRecord>>;
    /// Newest payments first, optionally restricted to one member
    async fn list(&self, member_id: Option<&str>, page: Page) -> Result<Vec<CotisationRecord>>;
    async fn count(&self, member_id: Option<&str>) -> Result<i64>;
    async fn update(&self, id: &str, changes: CotisationChanges) -> Result<Option<CotisationRecord>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct PgCotisationRepository {
    pool: PgPool,
}

impl PgCotisationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CotisationRepository for PgCotisationRepository {
    async fn create(&self, input: NewCotisation) -> Result<CotisationRecord> {
        let record = sqlx::query_as::<_, CotisationRecord>(
            r#"
            INSERT INTO cotisations (id, member_id, amount, period, paid_on,
                                     payment_method, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, member_id, amount, period, paid_on, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.member_id)
        .bind(input.amount)
        .bind(&input.period)
        .bind(input.paid_on)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CotisationRecord>> {
        let record = sqlx::query_as::<_, CotisationRecord>(
            r#"
            SELECT id, member_id, amount, period, paid_on, payment_method, notes,
                   created_at, updated_at
            FROM cotisations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, member_id: Option<&str>, page: Page) -> Result<Vec<CotisationRecord>> {
        let records = sqlx::query_as::<_, CotisationRecord>(
            r#"
            SELECT id, member_id, amount, period, paid_on, payment_method, notes,
                   created_at, updated_at
            FROM cotisations
            WHERE ($1::TEXT IS NULL OR member_id = $1)
            ORDER BY paid_on DESC, created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(member_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self, member_id: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cotisations WHERE ($1::TEXT IS NULL OR member_id = $1)",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: CotisationChanges) -> Result<Option<CotisationRecord>> {
        let record = sqlx::query_as::<_, CotisationRecord>(
            r#"
            UPDATE cotisations
            SET amount = COALESCE($2, amount),
                period = COALESCE($3, period),
                paid_on = COALESCE($4, paid_on),
                payment_method = COALESCE($5, payment_method),
                notes = COALESCE($6, notes),
                updated_at = $7
            WHERE id = $1
            RETURNING id, member_id, amount, period, paid_on, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.amount)
        .bind(changes.period)
        .bind(changes.paid_on)
        .bind(changes.payment_method)
        .bind(changes.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cotisations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct SqliteCotisationRepository {
    pool: SqlitePool,
}

impl SqliteCotisationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CotisationRepository for SqliteCotisationRepository {
    async fn create(&self, input: NewCotisation) -> Result<CotisationRecord> {
        let record = sqlx::query_as::<_, CotisationRecord>(
            r#"
            INSERT INTO cotisations (id, member_id, amount, period, paid_on,
                                     payment_method, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING id, member_id, amount, period, paid_on, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.member_id)
        .bind(input.amount)
        .bind(&input.period)
        .bind(input.paid_on)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CotisationRecord>> {
        let record = sqlx::query_as::<_, CotisationRecord>(
            r#"
            SELECT id, member_id, amount, period, paid_on, payment_method, notes,
                   created_at, updated_at
            FROM cotisations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, member_id: Option<&str>, page: Page) -> Result<Vec<CotisationRecord>> {
        let records = sqlx::query_as::<_, CotisationRecord>(
            r#"
            SELECT id, member_id, amount, period, paid_on, payment_method, notes,
                   created_at, updated_at
            FROM cotisations
            WHERE (?1 IS NULL OR member_id = ?1)
            ORDER BY paid_on DESC, created_at DESC, id ASC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(member_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self, member_id: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cotisations WHERE (?1 IS NULL OR member_id = ?1)",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: CotisationChanges) -> Result<Option<CotisationRecord>> {
        let record = sqlx::query_as::<_, CotisationRecord>(
            r#"
            UPDATE cotisations
            SET amount = COALESCE(?2, amount),
                period = COALESCE(?3, period),
                paid_on = COALESCE(?4, paid_on),
                payment_method = COALESCE(?5, payment_method),
                notes = COALESCE(?6, notes),
                updated_at = ?7
            WHERE id = ?1
            RETURNING id, member_id, amount, period, paid_on, payment_method, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.amount)
        .bind(changes.period)
        .bind(changes.paid_on)
        .bind(changes.payment_method)
        .bind(changes.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cotisations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

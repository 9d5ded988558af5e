//! Expense repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dahiraa_shared::Page;
use sqlx::{PgPool, SqlitePool};
use uuid::Uuid;

/// Expense record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseRecord {
    pub id: String,
    pub label: String,
    pub amount: f64,
    pub category: Option<String>,
    pub spent_on: NaiveDate,
    pub event_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub label: String,
    pub amount: f64,
    pub category: Option<String>,
    pub spent_on: NaiveDate,
    pub event_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    pub label: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub spent_on: Option<NaiveDate>,
    pub event_id: Option<String>,
    pub notes: Option<String>,
}

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, input: NewExpense) -> Result<ExpenseRecord>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ExpenseRecord>>;
    async fn list(&self, event_id: Option<&str>, page: Page) -> Result<Vec<ExpenseRecord>>;
    async fn count(&self, event_id: Option<&str>) -> Result<i64>;
    async fn update(&self, id: &str, changes: ExpenseChanges) -> Result<Option<ExpenseRecord>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct PgExpenseRepository {
    pool: PgPool,
}

impl PgExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PgExpenseRepository {
    async fn create(&self, input: NewExpense) -> Result<ExpenseRecord> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            INSERT INTO expenses (id, label, amount, category, spent_on, event_id, notes,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, label, amount, category, spent_on, event_id, notes,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.label)
        .bind(input.amount)
        .bind(&input.category)
        .bind(input.spent_on)
        .bind(&input.event_id)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ExpenseRecord>> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, label, amount, category, spent_on, event_id, notes, created_at, updated_at
            FROM expenses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, event_id: Option<&str>, page: Page) -> Result<Vec<ExpenseRecord>> {
        let records = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, label, amount, category, spent_on, event_id, notes, created_at, updated_at
            FROM expenses
            WHERE ($1::TEXT IS NULL OR event_id = $1)
            ORDER BY spent_on DESC, created_at DESC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(event_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self, event_id: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM expenses WHERE ($1::TEXT IS NULL OR event_id = $1)",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: ExpenseChanges) -> Result<Option<ExpenseRecord>> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            UPDATE expenses
            SET label = COALESCE($2, label),
                amount = COALESCE($3, amount),
                category = COALESCE($4, category),
                spent_on = COALESCE($5, spent_on),
                event_id = COALESCE($6, event_id),
                notes = COALESCE($7, notes),
                updated_at = $8
            WHERE id = $1
            RETURNING id, label, amount, category, spent_on, event_id, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.label)
        .bind(changes.amount)
        .bind(changes.category)
        .bind(changes.spent_on)
        .bind(changes.event_id)
        .bind(changes.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct SqliteExpenseRepository {
    pool: SqlitePool,
}

impl SqliteExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for SqliteExpenseRepository {
    async fn create(&self, input: NewExpense) -> Result<ExpenseRecord> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            INSERT INTO expenses (id, label, amount, category, spent_on, event_id, notes,
                                  created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING id, label, amount, category, spent_on, event_id, notes,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.label)
        .bind(input.amount)
        .bind(&input.category)
        .bind(input.spent_on)
        .bind(&input.event_id)
        .bind(&input.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ExpenseRecord>> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, label, amount, category, spent_on, event_id, notes, created_at, updated_at
            FROM expenses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, event_id: Option<&str>, page: Page) -> Result<Vec<ExpenseRecord>> {
        let records = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, label, amount, category, spent_on, event_id, notes, created_at, updated_at
            FROM expenses
            WHERE (?1 IS NULL OR event_id = ?1)
            ORDER BY spent_on DESC, created_at DESC, id ASC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(event_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self, event_id: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM expenses WHERE (?1 IS NULL OR event_id = ?1)",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: ExpenseChanges) -> Result<Option<ExpenseRecord>> {
        let record = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            UPDATE expenses
            SET label = COALESCE(?2, label),
                amount = COALESCE(?3, amount),
                category = COALESCE(?4, category),
                spent_on = COALESCE(?5, spent_on),
                event_id = COALESCE(?6, event_id),
                notes = COALESCE(?7, notes),
                updated_at = ?8
            WHERE id = ?1
            RETURNING id, label, amount, category, spent_on, event_id, notes,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.label)
        .bind(changes.amount)
        .bind(changes.category)
        .bind(changes.spent_on)
        .bind(changes.event_id)
        .bind(changes.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

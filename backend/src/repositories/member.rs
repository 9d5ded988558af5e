//! Member repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dahiraa_shared::Page;
use sqlx::{PgPool, SqlitePool};
use uuid::Uuid;

/// Member record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub joined_on: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a member
#[derive(Debug, Clone)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub joined_on: NaiveDate,
    pub is_active: bool,
}

/// Input for a partial member update
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub joined_on: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, input: NewMember) -> Result<MemberRecord>;
    async fn find_by_id(&self, id: &str) -> Result<Option<MemberRecord>>;
    async fn list(&self, page: Page) -> Result<Vec<MemberRecord>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: &str, changes: MemberChanges) -> Result<Option<MemberRecord>>;
    /// Returns false when no row matched. Cotisations go with the member.
    async fn delete(&self, id: &str) -> Result<bool>;
}

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn create(&self, input: NewMember) -> Result<MemberRecord> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            INSERT INTO members (id, first_name, last_name, phone, email, address,
                                 joined_on, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING id, first_name, last_name, phone, email, address,
                      joined_on, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.joined_on)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MemberRecord>> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT id, first_name, last_name, phone, email, address,
                   joined_on, is_active, created_at, updated_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, page: Page) -> Result<Vec<MemberRecord>> {
        let records = sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT id, first_name, last_name, phone, email, address,
                   joined_on, is_active, created_at, updated_at
            FROM members
            ORDER BY last_name ASC, first_name ASC, id ASC
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
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: MemberChanges) -> Result<Option<MemberRecord>> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            UPDATE members
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                address = COALESCE($6, address),
                joined_on = COALESCE($7, joined_on),
                is_active = COALESCE($8, is_active),
                updated_at = $9
            WHERE id = $1
            RETURNING id, first_name, last_name, phone, email, address,
                      joined_on, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.address)
        .bind(changes.joined_on)
        .bind(changes.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn create(&self, input: NewMember) -> Result<MemberRecord> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            INSERT INTO members (id, first_name, last_name, phone, email, address,
                                 joined_on, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING id, first_name, last_name, phone, email, address,
                      joined_on, is_active, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.joined_on)
        .bind(input.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<MemberRecord>> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT id, first_name, last_name, phone, email, address,
                   joined_on, is_active, created_at, updated_at
            FROM members
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self, page: Page) -> Result<Vec<MemberRecord>> {
        let records = sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT id, first_name, last_name, phone, email, address,
                   joined_on, is_active, created_at, updated_at
            FROM members
            ORDER BY last_name ASC, first_name ASC, id ASC
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
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update(&self, id: &str, changes: MemberChanges) -> Result<Option<MemberRecord>> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            UPDATE members
            SET first_name = COALESCE(?2, first_name),
                last_name = COALESCE(?3, last_name),
                phone = COALESCE(?4, phone),
                email = COALESCE(?5, email),
                address = COALESCE(?6, address),
                joined_on = COALESCE(?7, joined_on),
                is_active = COALESCE(?8, is_active),
                updated_at = ?9
            WHERE id = ?1
            RETURNING id, first_name, last_name, phone, email, address,
                      joined_on, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.address)
        .bind(changes.joined_on)
        .bind(changes.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Queries are bound at runtime, so the crate builds without a live database.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    long_url: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    is_deleted: bool,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.code,
            r.long_url,
            r.owner_id,
            r.created_at,
            r.is_deleted,
        )
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    urls: i64,
    users: i64,
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, long_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, code, long_url, owner_id, created_at, is_deleted
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .bind(new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, long_url, owner_id, created_at, is_deleted
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, long_url, owner_id, created_at, is_deleted
            FROM links
            WHERE long_url = $1 AND NOT is_deleted
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, long_url, owner_id, created_at, is_deleted
            FROM links
            WHERE owner_id = $1 AND NOT is_deleted
            ORDER BY created_at, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_batch(&self, owner_id: i64, codes: Vec<String>) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET is_deleted = TRUE
            WHERE owner_id = $1 AND code = ANY($2)
            "#,
        )
        .bind(owner_id)
        .bind(&codes)
        .execute(self.pool.as_ref())
        .await?;

        tracing::debug!(
            owner_id,
            requested = codes.len(),
            affected = result.rows_affected(),
            "Links soft-deleted"
        );

        Ok(())
    }

    async fn stats(&self) -> Result<LinkStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE NOT is_deleted) AS urls,
                COUNT(DISTINCT owner_id) AS users
            FROM links
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(LinkStats {
            urls: row.urls,
            users: row.users,
        })
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

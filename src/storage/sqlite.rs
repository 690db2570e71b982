use crate::models::{Click, Link, NewClick};
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL UNIQUE,
                destination_url TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        // No foreign key to links: clicks for unknown slugs are tolerated
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clicks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                client_address TEXT,
                client_identity TEXT
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clicks_slug_timestamp ON clicks(slug, timestamp)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn create_link(
        &self,
        slug: &str,
        destination_url: &str,
        created_at: i64,
        expires_at: Option<i64>,
    ) -> StorageResult<Link> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (slug, destination_url, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(slug) DO NOTHING
            "#,
        )
        .bind(slug)
        .bind(destination_url)
        .bind(created_at)
        .bind(expires_at)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }

        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, slug, destination_url, created_at, expires_at
            FROM links
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn get_link(&self, slug: &str) -> StorageResult<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, slug, destination_url, created_at, expires_at
            FROM links
            WHERE slug = ?
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_links(&self, limit: i64, offset: i64) -> StorageResult<Vec<Link>> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, slug, destination_url, created_at, expires_at
            FROM links
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn record_click(&self, click: &NewClick) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO clicks (slug, timestamp, client_address, client_identity)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&click.slug)
        .bind(click.timestamp)
        .bind(&click.client_address)
        .bind(&click.client_identity)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn recent_clicks(&self, slug: &str, limit: i64) -> StorageResult<Vec<Click>> {
        let clicks = sqlx::query_as::<_, Click>(
            r#"
            SELECT id, slug, timestamp, client_address, client_identity
            FROM clicks
            WHERE slug = ?
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(slug)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn click_count(&self, slug: &str) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clicks WHERE slug = ?")
            .bind(slug)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

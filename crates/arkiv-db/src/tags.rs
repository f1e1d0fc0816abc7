//! Tag repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use arkiv_core::{Error, Result, Tag, TagRepository};

/// PostgreSQL implementation of TagRepository.
///
/// Tag rows are created lazily by the article repository's tag replacement;
/// this side only reads. Orphaned tags (no remaining join rows) are left in
/// place.
#[derive(Clone)]
pub struct PgTagRepository {
    pool: Pool<Postgres>,
}

impl PgTagRepository {
    /// Create a new PgTagRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn list_with_counts(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.id,
                t.name,
                t.created_at,
                COUNT(a.id) as article_count
            FROM tags t
            LEFT JOIN article_tags at ON t.id = at.tag_id
            LEFT JOIN articles a ON at.article_id = a.id AND a.deleted_at IS NULL
            GROUP BY t.id, t.name, t.created_at
            ORDER BY article_count DESC, t.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let tags = rows
            .into_iter()
            .map(|row| Tag {
                id: row.get("id"),
                name: row.get("name"),
                created_at: row.get("created_at"),
                article_count: row.get("article_count"),
            })
            .collect();

        Ok(tags)
    }
}

//! Article repository implementation.
//!
//! Sole writer of the `articles`, `tags`, and `article_tags` rows. Content
//! never passes through here; the row carries only the blob key, size, and
//! hash that the service layer attaches after a blob write.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use std::collections::HashMap;

use arkiv_core::{ArticleMetadata, ArticleRepository, Error, Result, Tag, UpdateArticleFields};

use crate::escape_like;

/// Metadata columns, shared by every listing query. Content stays in the
/// blob store, so list views never drag blobs across the wire.
const METADATA_COLUMNS: &str = "id, title, content_key, content_size, content_hash, memo, \
                                category_id, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of ArticleRepository.
#[derive(Clone)]
pub struct PgArticleRepository {
    pool: Pool<Postgres>,
}

impl PgArticleRepository {
    /// Create a new PgArticleRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Attach tags for a set of articles.
    ///
    /// Issues exactly one join query keyed by the full id set, however many
    /// articles were fetched. Listing paths must never load tags row-by-row.
    async fn attach_tags(&self, articles: &mut [ArticleMetadata]) -> Result<()> {
        if articles.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        let rows = sqlx::query(
            "SELECT at.article_id, t.id, t.name, t.created_at
             FROM article_tags at
             INNER JOIN tags t ON at.tag_id = t.id
             WHERE at.article_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut tag_map: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            let article_id: i64 = row.get("article_id");
            tag_map.entry(article_id).or_default().push(Tag {
                id: row.get("id"),
                name: row.get("name"),
                created_at: row.get("created_at"),
                article_count: 0,
            });
        }

        for article in articles.iter_mut() {
            article.tags = tag_map.remove(&article.id).unwrap_or_default();
        }

        Ok(())
    }
}

/// Map a database row to ArticleMetadata (tags attached separately).
fn metadata_from_row(row: &PgRow) -> ArticleMetadata {
    ArticleMetadata {
        id: row.get("id"),
        title: row.get("title"),
        content_key: row.get("content_key"),
        content_size: row.get("content_size"),
        content_hash: row.get("content_hash"),
        memo: row.get("memo"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
        tags: Vec::new(),
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn list_active(&self) -> Result<Vec<ArticleMetadata>> {
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM articles
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut articles: Vec<ArticleMetadata> = rows.iter().map(metadata_from_row).collect();
        self.attach_tags(&mut articles).await?;
        Ok(articles)
    }

    async fn list_trashed(&self) -> Result<Vec<ArticleMetadata>> {
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM articles
             WHERE deleted_at IS NOT NULL
             ORDER BY deleted_at DESC"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut articles: Vec<ArticleMetadata> = rows.iter().map(metadata_from_row).collect();
        self.attach_tags(&mut articles).await?;
        Ok(articles)
    }

    async fn search(&self, query: &str) -> Result<Vec<ArticleMetadata>> {
        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            r#"SELECT {METADATA_COLUMNS} FROM articles
               WHERE deleted_at IS NULL
                 AND (title ILIKE $1 ESCAPE '\' OR memo ILIKE $1 ESCAPE '\')
               ORDER BY created_at DESC"#
        );
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut articles: Vec<ArticleMetadata> = rows.iter().map(metadata_from_row).collect();
        self.attach_tags(&mut articles).await?;
        Ok(articles)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleMetadata>> {
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM articles
             WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut articles = vec![metadata_from_row(&row)];
        self.attach_tags(&mut articles).await?;
        Ok(articles.pop())
    }

    async fn insert_shell(
        &self,
        title: &str,
        memo: Option<&str>,
        category_id: Option<i64>,
    ) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO articles (title, memo, category_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(title)
        .bind(memo)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(id)
    }

    async fn attach_content_metadata(
        &self,
        id: i64,
        key: &str,
        size: i64,
        hash: &str,
    ) -> Result<()> {
        let now = Utc::now();
        sqlx::query(
            "UPDATE articles
             SET content_key = $1, content_size = $2, content_hash = $3, updated_at = $4
             WHERE id = $5",
        )
        .bind(key)
        .bind(size)
        .bind(hash)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn update_fields(&self, id: i64, fields: UpdateArticleFields) -> Result<()> {
        let now = Utc::now();
        // Empty strings degrade to NULL so COALESCE keeps the stored value.
        let title = fields.title.filter(|t| !t.is_empty());
        let memo = fields.memo.filter(|m| !m.is_empty());

        // category_id is not COALESCE'd: NULL is the valid "uncategorized"
        // state and must be settable, so the column only appears in the SET
        // list when the caller passed it.
        if let Some(category_id) = fields.category_id {
            sqlx::query(
                "UPDATE articles
                 SET title = COALESCE($1, title),
                     memo = COALESCE($2, memo),
                     category_id = $3,
                     updated_at = $4
                 WHERE id = $5",
            )
            .bind(title)
            .bind(memo)
            .bind(category_id)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        } else {
            sqlx::query(
                "UPDATE articles
                 SET title = COALESCE($1, title),
                     memo = COALESCE($2, memo),
                     updated_at = $3
                 WHERE id = $4",
            )
            .bind(title)
            .bind(memo)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let now = Utc::now();
        let result = sqlx::query("UPDATE articles SET deleted_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE articles SET deleted_at = NULL WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_tags(&self, article_id: i64, tag_names: &[String]) -> Result<()> {
        // Deliberately not one transaction: a failure partway leaves a
        // partial tag set, which callers accept for this low-concurrency
        // workload.
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        let now = Utc::now();
        for name in tag_names {
            // Find-or-create, case-sensitive. The unique constraint on
            // tags.name resolves concurrent creators to a single row; an
            // insert conflict just means someone else won.
            sqlx::query(
                "INSERT INTO tags (name, created_at) VALUES ($1, $2)
                 ON CONFLICT (name) DO NOTHING",
            )
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

            let tag_id: i64 = sqlx::query_scalar("SELECT id FROM tags WHERE name = $1")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

            sqlx::query(
                "INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(article_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        }

        Ok(())
    }

    async fn find_orphaned_shells(&self, older_than: Duration) -> Result<Vec<ArticleMetadata>> {
        let cutoff = Utc::now() - older_than;
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM articles
             WHERE deleted_at IS NULL
               AND content_key IS NULL
               AND content_size IS NULL
               AND content_hash IS NULL
               AND created_at < $1
             ORDER BY created_at ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let mut articles: Vec<ArticleMetadata> = rows.iter().map(metadata_from_row).collect();
        self.attach_tags(&mut articles).await?;
        Ok(articles)
    }
}

//! Category repository implementation.
//!
//! Deletion relies on the schema's foreign keys: descendant categories
//! cascade away and referencing articles get `category_id = NULL`. The
//! repository itself issues single-row statements only.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use arkiv_core::{Category, CategoryRepository, CreateCategoryRequest, Error, Result};

/// Color assigned when a category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn category_from_row(row: &sqlx::postgres::PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        parent_id: row.get("parent_id"),
        color: row.get("color"),
        display_order: row.get("display_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, parent_id, color, display_order, created_at, updated_at
             FROM categories
             ORDER BY display_order ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn create(&self, req: CreateCategoryRequest) -> Result<i64> {
        // New categories serialize to the end of the ordering.
        let max_order: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(display_order), 0) FROM categories")
                .fetch_one(&self.pool)
                .await
                .map_err(Error::Database)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, parent_id, color, display_order)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&req.name)
        .bind(req.parent_id)
        .bind(req.color.as_deref().unwrap_or(DEFAULT_CATEGORY_COLOR))
        .bind(max_order + 1)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn update(&self, id: i64, name: &str, color: &str) -> Result<()> {
        let now = Utc::now();
        sqlx::query("UPDATE categories SET name = $1, color = $2, updated_at = $3 WHERE id = $4")
            .bind(name)
            .bind(color)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // Cascade to children and nullify on articles happen in the store.
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[i64]) -> Result<()> {
        // Each update stands alone; a failure partway leaves a partially
        // reordered list, which callers accept.
        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE categories SET display_order = $1 WHERE id = $2")
                .bind((position + 1) as i32)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;
        }
        Ok(())
    }
}

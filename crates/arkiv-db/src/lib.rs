//! # arkiv-db
//!
//! PostgreSQL metadata layer for arkiv.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for articles, tags, and categories
//! - The soft-delete/restore lifecycle and batched tag loading
//!
//! Article content is not stored here; rows carry only the blob key, byte
//! size, and SHA-256 digest the service layer attaches after a blob write.
//!
//! ## Example
//!
//! ```rust,ignore
//! use arkiv_core::ArticleRepository;
//! use arkiv_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/arkiv").await?;
//!
//!     let id = db.articles.insert_shell("Hello", None, None).await?;
//!     println!("Created article shell: {}", id);
//!     Ok(())
//! }
//! ```

pub mod articles;
pub mod categories;
pub mod pool;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use arkiv_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export repository implementations
pub use articles::PgArticleRepository;
pub use categories::{PgCategoryRepository, DEFAULT_CATEGORY_COLOR};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use tags::PgTagRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Article repository for metadata CRUD and the trash lifecycle.
    pub articles: PgArticleRepository,
    /// Tag repository for tag listings with counts.
    pub tags: PgTagRepository,
    /// Category repository for the category tree rows.
    pub categories: PgCategoryRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            articles: PgArticleRepository::new(pool.clone()),
            tags: PgTagRepository::new(pool.clone()),
            categories: PgCategoryRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}

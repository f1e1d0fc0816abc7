//! Core traits for arkiv abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability. The repositories
//! own all relational rows; the blob side of an article never flows through
//! them.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ARTICLE REPOSITORY
// =============================================================================

/// Repository for article metadata CRUD and the soft-delete lifecycle.
///
/// Listing methods return metadata only (no content blobs) and attach tags
/// with a single batched query keyed by the full id set of the result,
/// regardless of its size.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// List all active articles, newest first.
    async fn list_active(&self) -> Result<Vec<ArticleMetadata>>;

    /// List trashed articles, most recently deleted first.
    async fn list_trashed(&self) -> Result<Vec<ArticleMetadata>>;

    /// Case-insensitive substring search over title and memo.
    async fn search(&self, query: &str) -> Result<Vec<ArticleMetadata>>;

    /// Fetch a single active article with its tags. Trashed and missing
    /// articles both yield None.
    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleMetadata>>;

    /// Insert a metadata row with no content fields and return its id.
    /// The id is needed before the content key can be derived.
    async fn insert_shell(
        &self,
        title: &str,
        memo: Option<&str>,
        category_id: Option<i64>,
    ) -> Result<i64>;

    /// Update the three content columns and refresh `updated_at`. Touches
    /// nothing else; the columns always move together.
    async fn attach_content_metadata(
        &self,
        id: i64,
        key: &str,
        size: i64,
        hash: &str,
    ) -> Result<()>;

    /// Partial metadata update. See [`UpdateArticleFields`] for the
    /// tri-state category encoding.
    async fn update_fields(&self, id: i64, fields: UpdateArticleFields) -> Result<()>;

    /// Move an article to the trash. Returns whether a row was affected;
    /// an already-trashed id still matches and refreshes its timestamp.
    async fn soft_delete(&self, id: i64) -> Result<bool>;

    /// Bring an article back from the trash.
    async fn restore(&self, id: i64) -> Result<bool>;

    /// Replace the article's tag set: all join rows are deleted, then each
    /// name is found-or-created (case-sensitive) and re-linked. Not atomic
    /// across tags.
    async fn replace_tags(&self, article_id: i64, tag_names: &[String]) -> Result<()>;

    /// Find active articles whose content columns are still NULL and whose
    /// creation is older than the threshold (interrupted create workflows).
    async fn find_orphaned_shells(
        &self,
        older_than: chrono::Duration,
    ) -> Result<Vec<ArticleMetadata>>;
}

// =============================================================================
// TAG REPOSITORY
// =============================================================================

/// Repository for tag reads. Tags are created lazily through
/// [`ArticleRepository::replace_tags`] and never deleted here.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// List all tags with their active-article counts, highest count first,
    /// then name.
    async fn list_with_counts(&self) -> Result<Vec<Tag>>;
}

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Repository for the category tree rows.
///
/// Deletion semantics (descendants cascade, referencing articles are
/// nullified) come from the store's foreign-key constraints, not from
/// application logic; the migrations must configure them.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List all categories ordered by display_order, then name.
    async fn list(&self) -> Result<Vec<Category>>;

    /// Create a category at the end of the ordering and return its id.
    async fn create(&self, req: CreateCategoryRequest) -> Result<i64>;

    /// Rename/recolor a category.
    async fn update(&self, id: i64, name: &str, color: &str) -> Result<()>;

    /// Delete a category; the store's constraints cascade to descendants
    /// and nullify referencing articles.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Assign display_order 1..N following the given sequence. Each update
    /// is independent; a failure partway leaves a partial reorder.
    async fn reorder(&self, ordered_ids: &[i64]) -> Result<()>;
}

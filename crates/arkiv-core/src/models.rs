//! Core data models for arkiv.
//!
//! These types are shared across all arkiv crates and represent the core
//! domain entities. An article's metadata and its Markdown content live in
//! different stores; `ArticleMetadata` is the relational row (plus tags
//! attached at read time) and `Article` is the assembled view a caller sees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// ARTICLE TYPES
// =============================================================================

/// Metadata for an article (without content).
///
/// The content fields (`content_key`, `content_size`, `content_hash`) are
/// either all `None` (content never persisted) or all `Some` and mutually
/// consistent: the hash is the hex SHA-256 of the bytes stored at the key,
/// and the size is their byte length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub id: i64,
    pub title: String,
    /// Blob-store key (`articles/<id>.md`), None until content is persisted.
    pub content_key: Option<String>,
    /// Byte length of the content at last write.
    pub content_size: Option<i64>,
    /// Hex-encoded SHA-256 of the content at last write.
    pub content_hash: Option<String>,
    pub memo: Option<String>,
    /// Category foreign key; None means "uncategorized".
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Non-null marks the article as trashed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Attached via the join table at read time, never stored on the row.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Complete article with content assembled from the blob store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub meta: ArticleMetadata,
    /// Markdown content; None when never persisted or when the blob fetch
    /// degraded (key present but object missing).
    pub content: Option<String>,
}

// =============================================================================
// TAG & CATEGORY TYPES
// =============================================================================

/// A tag definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Number of active articles with this tag (computed)
    #[serde(default)]
    pub article_count: i64,
}

/// A category (self-referential tree; UI assumes two levels).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Parent category ID for nesting (None = root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub color: String,
    /// Stable sort position, assigned sequentially.
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with its children resolved, produced by the tree builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

// =============================================================================
// BLOB STORE TYPES
// =============================================================================

/// Result of persisting a content blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub key: String,
    pub size: i64,
    pub hash: String,
}

/// Metadata persisted alongside each content blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobMetadata {
    pub article_id: i64,
    pub content_type: String,
    pub hash: String,
    pub uploaded_at: DateTime<Utc>,
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request for creating a new article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Request for partially updating an article.
///
/// `category_id` is a double option: an omitted field leaves the stored
/// value untouched, an explicit null uncategorizes the article, and a value
/// reassigns it. `title` and `memo` keep the stored value when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
}

/// Distinguish an omitted field (outer None) from an explicit null
/// (Some(None)). Plain `Option<Option<T>>` collapses both to None.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateArticleRequest {
    /// Whether any relational metadata field is present.
    pub fn has_metadata_changes(&self) -> bool {
        self.title.is_some() || self.memo.is_some() || self.category_id.is_some()
    }
}

/// Repository-level partial update of article metadata.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleFields {
    pub title: Option<String>,
    pub memo: Option<String>,
    /// None = keep, Some(None) = set NULL, Some(v) = set v.
    pub category_id: Option<Option<i64>>,
}

/// Request for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_tristate_category() {
        let omitted: UpdateArticleRequest = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(omitted.category_id, None);

        let null: UpdateArticleRequest =
            serde_json::from_str(r#"{"category_id":null}"#).unwrap();
        assert_eq!(null.category_id, Some(None));

        let set: UpdateArticleRequest = serde_json::from_str(r#"{"category_id":7}"#).unwrap();
        assert_eq!(set.category_id, Some(Some(7)));
    }

    #[test]
    fn test_has_metadata_changes() {
        let empty = UpdateArticleRequest::default();
        assert!(!empty.has_metadata_changes());

        let uncategorize = UpdateArticleRequest {
            category_id: Some(None),
            ..Default::default()
        };
        assert!(uncategorize.has_metadata_changes());

        let content_only = UpdateArticleRequest {
            content: Some("# body".to_string()),
            ..Default::default()
        };
        assert!(!content_only.has_metadata_changes());
    }
}

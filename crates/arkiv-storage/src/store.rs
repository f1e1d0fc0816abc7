//! Article content store.
//!
//! Wraps a [`StorageBackend`] with the article-content conventions: a
//! deterministic key per article, SHA-256 integrity hashing, and a JSON
//! metadata sidecar carrying what an object store would keep as per-object
//! metadata (content type, owning article, digest, upload time).

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::debug;

use arkiv_core::{BlobMetadata, Error, Result, StoredBlob};

use crate::backend::StorageBackend;

/// Content type recorded for every article blob.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

/// Derive the blob key for an article: `articles/<id>.md`.
///
/// The key embeds only the id, so rewriting content never moves the blob.
pub fn content_key(article_id: i64) -> String {
    format!("articles/{}.md", article_id)
}

/// Compute the hex-encoded SHA-256 digest of content's UTF-8 bytes.
pub fn compute_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn metadata_key(key: &str) -> String {
    format!("{}.meta", key)
}

/// Durable storage of Markdown article content, addressed by string keys.
///
/// The store performs no retries; backend I/O errors propagate to the
/// caller. Retry policy, if any, belongs to the service layer.
pub struct ArticleStore {
    backend: Box<dyn StorageBackend>,
}

impl ArticleStore {
    /// Create a new store over the given backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Persist an article's content, overwriting any previous blob at the
    /// same key (last-write-wins, no versioning). Returns the key, byte
    /// size, and hex SHA-256 digest of what was written.
    pub async fn save(&self, article_id: i64, content: &str) -> Result<StoredBlob> {
        let key = content_key(article_id);
        let bytes = content.as_bytes();
        let hash = compute_content_hash(content);

        self.backend.write(&key, bytes).await?;

        let metadata = BlobMetadata {
            article_id,
            content_type: MARKDOWN_CONTENT_TYPE.to_string(),
            hash: hash.clone(),
            uploaded_at: Utc::now(),
        };
        self.backend
            .write(&metadata_key(&key), &serde_json::to_vec(&metadata)?)
            .await?;

        debug!(
            subsystem = "storage",
            component = "blob_store",
            op = "save",
            article_id,
            blob_key = %key,
            content_bytes = bytes.len(),
            "Stored article content"
        );

        Ok(StoredBlob {
            key,
            size: bytes.len() as i64,
            hash,
        })
    }

    /// Fetch content by key. A missing key yields `Ok(None)`; content may
    /// legitimately be pending for a freshly created shell, so callers must
    /// treat absence as non-fatal.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.backend.read(key).await {
            Ok(bytes) => {
                let content = String::from_utf8(bytes).map_err(|e| {
                    Error::Serialization(format!("blob {} is not valid UTF-8: {}", key, e))
                })?;
                Ok(Some(content))
            }
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Remove a blob and its metadata sidecar. Deleting a missing key is
    /// not an error.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.backend.delete(key).await?;
        self.backend.delete(&metadata_key(key)).await?;
        Ok(())
    }

    /// Check whether a blob exists at the key.
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.backend.exists(key).await
    }

    /// Read the metadata sidecar stored next to a blob.
    pub async fn metadata(&self, key: &str) -> Result<Option<BlobMetadata>> {
        match self.backend.read(&metadata_key(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Recompute the digest of `content` and compare against `expected`.
    ///
    /// Reads trust the stored metadata by default; this check is for
    /// explicit integrity audits, not the hot path.
    pub fn verify(&self, content: &str, expected_hash: &str) -> bool {
        compute_content_hash(content) == expected_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_key_is_deterministic() {
        assert_eq!(content_key(1), "articles/1.md");
        assert_eq!(content_key(98765), "articles/98765.md");
    }

    #[test]
    fn test_compute_content_hash() {
        // SHA-256 of the empty string
        assert_eq!(
            compute_content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        let hash = compute_content_hash("# Title\n\nbody");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_covers_utf8_bytes() {
        assert_ne!(compute_content_hash("café"), compute_content_hash("cafe"));
    }

    #[test]
    fn test_metadata_key() {
        assert_eq!(metadata_key("articles/3.md"), "articles/3.md.meta");
    }
}

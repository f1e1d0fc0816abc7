//! Storage backend trait and filesystem implementation.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use arkiv_core::Result;

/// Storage backend trait for different storage implementations.
///
/// Allows abstracting over filesystem, S3, or other object-store providers.
/// Backends are byte-oriented; everything above the raw object (keys,
/// hashing, metadata) belongs to [`crate::ArticleStore`].
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write data to the specified path, replacing any existing object.
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Read data from the specified path.
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Delete data at the specified path.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Check if data exists at the specified path.
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Filesystem storage backend.
///
/// Stores objects as plain files under a base directory, creating parent
/// directories on demand. Writes are atomic (temp file + rename) so a
/// crashed write never leaves a truncated blob behind.
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    /// Validate that the storage backend can write, read, and delete files.
    ///
    /// Performs a full round-trip test at startup to catch filesystem issues
    /// (overlayfs quirks, permission errors, missing directories) early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join(".health-check");
        let test_file = test_dir.join("test.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_data = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_data != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await; // Best-effort cleanup

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        debug!(blob_key = %path, full_path = %full_path.display(), size = data.len(), "blob_store: write");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "blob_store: create_dir_all failed");
                e
            })?;
        }

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "blob_store: File::create failed");
            e
        })?;
        file.write_all(data).await.map_err(|e| {
            warn!(error = %e, "blob_store: write_all failed");
            e
        })?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "blob_store: rename failed");
            e
        })?;

        // Set permissions to 0644 (rw-r--r--, no execute)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(())
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.full_path(path);
        Ok(fs::read(full_path).await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.full_path(path);
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.full_path(path);
        Ok(fs::try_exists(full_path).await?)
    }
}

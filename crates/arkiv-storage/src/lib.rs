//! # arkiv-storage
//!
//! Blob store adapter for arkiv article content.
//!
//! Markdown content lives outside the relational store, addressed by
//! deterministic `articles/<id>.md` keys. This crate provides:
//! - The [`StorageBackend`] seam (filesystem today, S3-style tomorrow)
//! - [`FilesystemBackend`] with atomic writes and a startup health check
//! - [`ArticleStore`], which owns keys, SHA-256 hashing, and blob metadata
//!
//! The adapter never touches the relational store; keeping metadata rows
//! and blobs consistent is the service layer's job.

pub mod backend;
pub mod store;

pub use backend::{FilesystemBackend, StorageBackend};
pub use store::{compute_content_hash, content_key, ArticleStore, MARKDOWN_CONTENT_TYPE};

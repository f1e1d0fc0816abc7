//! # arkiv-service
//!
//! Service layer for arkiv: orchestrates the PostgreSQL metadata
//! repositories and the content blob store so callers see articles as
//! single entities. This is the only crate allowed to keep the two stores
//! in sync; the repositories and the blob adapter never call each other.

pub mod articles;
pub mod config;

pub use articles::ArticleService;
pub use config::ServiceConfig;

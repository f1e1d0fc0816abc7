//! # arkiv-core
//!
//! Core types, traits, and abstractions for the arkiv knowledge base.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other arkiv crates depend on: the article/tag/
//! category models, the repository traits the database layer implements,
//! the shared error type, the structured-logging schema, and the pure
//! category-tree utility.

pub mod category_tree;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use category_tree::{build_tree, flatten_order};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;

//! GHL Common Library
//!
//! Shared types, error handling and logging for the GeneHancer loader workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`GhlError`] and the [`Result`] alias
//! - **Types**: gene categories, node roles and the canonical edge record
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use ghl_common::types::GeneCategory;
//!
//! let category: GeneCategory = "ncRNA gene".parse().unwrap();
//! assert_eq!(category, GeneCategory::NcRna);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{GhlError, Result};

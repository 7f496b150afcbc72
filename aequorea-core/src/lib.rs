//! Shared primitives for the Aequorea evaluation ecosystem.
//!
//! `aequorea-core` provides the foundation that the other Aequorea crates
//! build on:
//!
//! - **Error types** — [`AequoreaError`] and [`Result`] for structured error handling
//! - **Traits** — [`Summarizable`] for one-line summaries of tables and curves

pub mod error;
pub mod traits;

pub use error::{AequoreaError, Result};
pub use traits::*;

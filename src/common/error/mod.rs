//! Unified error types for quickpict.
//!
//! Format readers report their own error enums; everything surfaces to
//! callers through the single [`Error`] type defined here.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};

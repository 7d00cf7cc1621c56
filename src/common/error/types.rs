//! Unified error types for quickpict.
//!
//! This module provides the crate-level error type. Format-specific errors
//! (such as [`PictError`](crate::images::pict::PictError)) convert into it.
use thiserror::Error;

/// Main error type for quickpict operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error occurred
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// QuickDraw picture decoding error
    #[error("PICT error: {0}")]
    Pict(#[from] crate::images::pict::PictError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for quickpict operations.
pub type Result<T> = std::result::Result<T, Error>;

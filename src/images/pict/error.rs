//! Error taxonomy for QuickDraw picture decoding.

use crate::common::binary::BinaryError;
use thiserror::Error;

/// Errors raised while decoding a PICT stream.
///
/// Only [`PictError::HeaderMismatch`] is fatal for a document; the dispatcher
/// recovers from every other variant by dropping the offending record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PictError {
    /// A fixed-size operand runs past the end of the input
    #[error("truncated input at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A rectangle with non-positive width or height
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    /// A PackBits run reads or writes outside its declared bounds
    #[error("malformed run: {0}")]
    MalformedRun(String),

    /// Pixel size or component layout this decoder cannot handle
    #[error("unknown pixel format: pixel size {pixel_size}, {component_count} components")]
    UnknownPixelFormat {
        pixel_size: u16,
        component_count: u16,
    },

    /// Neither a version 1 nor a version 2 header was found
    #[error("no PICT header found")]
    HeaderMismatch,
}

impl From<BinaryError> for PictError {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::InsufficientData {
                expected,
                available,
            } => PictError::TruncatedInput {
                offset: available,
                needed: expected.saturating_sub(available),
                available: 0,
            },
            BinaryError::ParseError(msg) => PictError::MalformedRun(msg),
        }
    }
}

/// Result type for PICT decoding.
pub type PictResult<T> = std::result::Result<T, PictError>;

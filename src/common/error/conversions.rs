//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

#[cfg(feature = "imgconv")]
use super::types::Error;

#[cfg(feature = "imgconv")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Other(format!("Image conversion failed: {}", err))
    }
}

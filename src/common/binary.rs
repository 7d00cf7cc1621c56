//! Binary data parsing utilities shared across formats.
//!
//! QuickDraw data is big-endian throughout, so every reader here decodes
//! big-endian values out of a byte slice at an absolute offset.

use zerocopy::{BE, FromBytes, I16, I32, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone)]
pub enum BinaryError {
    /// Not enough data to read the requested type
    InsufficientData { expected: usize, available: usize },
    /// Failed to parse the data
    ParseError(String),
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::InsufficientData {
                expected,
                available,
            } => {
                write!(
                    f,
                    "Insufficient data: expected {}, got {}",
                    expected, available
                )
            },
            BinaryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

#[inline]
fn window(data: &[u8], offset: usize, len: usize) -> BinaryResult<&[u8]> {
    let end = offset.checked_add(len).ok_or(BinaryError::InsufficientData {
        expected: usize::MAX,
        available: data.len(),
    })?;
    if end > data.len() {
        return Err(BinaryError::InsufficientData {
            expected: end,
            available: data.len(),
        });
    }
    Ok(&data[offset..end])
}

/// Read a big-endian u16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use quickpict::common::binary::read_u16_be;
/// let data = [0x12, 0x34, 0x56, 0x78];
/// assert_eq!(read_u16_be(&data, 0).unwrap(), 0x1234);
/// assert_eq!(read_u16_be(&data, 2).unwrap(), 0x5678);
/// ```
#[inline]
pub fn read_u16_be(data: &[u8], offset: usize) -> BinaryResult<u16> {
    U16::<BE>::read_from_bytes(window(data, offset, 2)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u16".to_string()))
}

/// Read a big-endian i16 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use quickpict::common::binary::read_i16_be;
/// let data = [0xFF, 0xFE];
/// assert_eq!(read_i16_be(&data, 0).unwrap(), -2i16);
/// ```
#[inline]
pub fn read_i16_be(data: &[u8], offset: usize) -> BinaryResult<i16> {
    I16::<BE>::read_from_bytes(window(data, offset, 2)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i16".to_string()))
}

/// Read a big-endian u32 from a byte slice at the given offset.
///
/// # Examples
///
/// ```
/// use quickpict::common::binary::read_u32_be;
/// let data = [0x12, 0x34, 0x56, 0x78];
/// assert_eq!(read_u32_be(&data, 0).unwrap(), 0x12345678);
/// ```
#[inline]
pub fn read_u32_be(data: &[u8], offset: usize) -> BinaryResult<u32> {
    U32::<BE>::read_from_bytes(window(data, offset, 4)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read u32".to_string()))
}

/// Read a big-endian i32 from a byte slice at the given offset.
#[inline]
pub fn read_i32_be(data: &[u8], offset: usize) -> BinaryResult<i32> {
    I32::<BE>::read_from_bytes(window(data, offset, 4)?)
        .map(|v| v.get())
        .map_err(|_| BinaryError::ParseError("Failed to read i32".to_string()))
}

/// Read a 16.16 fixed-point number stored as a big-endian i32.
///
/// # Examples
///
/// ```
/// use quickpict::common::binary::read_fixed_be;
/// let data = [0x00, 0x48, 0x80, 0x00];
/// assert!((read_fixed_be(&data, 0).unwrap() - 72.5).abs() < f64::EPSILON);
/// ```
#[inline]
pub fn read_fixed_be(data: &[u8], offset: usize) -> BinaryResult<f64> {
    read_i32_be(data, offset).map(|v| f64::from(v) / 65536.0)
}

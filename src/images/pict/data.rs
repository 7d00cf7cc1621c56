//! Data manipulation and compression utilities
//!
//! PackBits decompression in the two flavours QuickDraw rasters use: byte
//! units with strict length checking for bitmaps, and multi-byte units with
//! a soft output cap for pixmaps.

use super::error::{PictError, PictResult};

/// Slack allowed past the nominal row length when unpacking pixmap rows.
pub const PIXMAP_ROW_SLACK: usize = 24;

/// UnpackBits decompression algorithm
///
/// Each control byte `n` is read as signed:
/// - `n < 0`: repeat the following byte `1 - n` times
/// - `n >= 0`: copy the following `n + 1` bytes, clipped to what is left of
///   the row and of the input
///
/// Output must be exactly `expected_size` bytes and the whole of
/// `compressed` must be consumed; anything else is a [`PictError::MalformedRun`].
pub fn unpack_bits(compressed: &[u8], expected_size: usize) -> PictResult<Vec<u8>> {
    let mut output = Vec::with_capacity(expected_size);
    let mut input_pos = 0;

    while output.len() < expected_size {
        let Some(&control) = compressed.get(input_pos) else {
            return Err(PictError::MalformedRun(format!(
                "input exhausted after {} of {} bytes",
                output.len(),
                expected_size
            )));
        };
        input_pos += 1;
        let code = control as i8;

        if code < 0 {
            let run_length = (1 - i32::from(code)) as usize;
            let Some(&byte) = compressed.get(input_pos) else {
                return Err(PictError::MalformedRun(
                    "missing byte for repeat run".into(),
                ));
            };
            input_pos += 1;
            if output.len() + run_length > expected_size {
                return Err(PictError::MalformedRun(format!(
                    "repeat run of {} overflows row of {}",
                    run_length, expected_size
                )));
            }
            output.extend(std::iter::repeat_n(byte, run_length));
        } else {
            let literal_count = (code as usize + 1)
                .min(expected_size - output.len())
                .min(compressed.len() - input_pos);
            if literal_count == 0 {
                return Err(PictError::MalformedRun(
                    "not enough literal bytes".into(),
                ));
            }
            output.extend_from_slice(&compressed[input_pos..input_pos + literal_count]);
            input_pos += literal_count;
        }
    }

    if input_pos != compressed.len() {
        return Err(PictError::MalformedRun(format!(
            "consumed {} of {} packed bytes",
            input_pos,
            compressed.len()
        )));
    }

    Ok(output)
}

/// Result of a soft-capped unpack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedRow {
    pub bytes: Vec<u8>,
    /// A run was dropped because it would pass the cap or the input ended inside it
    pub truncated: bool,
}

/// PackBits with `unit`-byte elements (1 to 4) and a soft output cap.
///
/// Runs repeat or copy whole units. Decoding stops quietly at the first run
/// that would push the output past `max_len` or that lacks input bytes.
pub fn unpack_bits_wide(compressed: &[u8], unit: usize, max_len: usize) -> UnpackedRow {
    let unit = unit.clamp(1, 4);
    let mut bytes = Vec::with_capacity(max_len);
    let mut input_pos = 0;
    let mut truncated = false;

    while input_pos < compressed.len() {
        let code = compressed[input_pos] as i8;
        input_pos += 1;

        if code < 0 {
            let count = (1 - i32::from(code)) as usize;
            if input_pos + unit > compressed.len() || bytes.len() + count * unit > max_len {
                truncated = true;
                break;
            }
            let element = &compressed[input_pos..input_pos + unit];
            input_pos += unit;
            for _ in 0..count {
                bytes.extend_from_slice(element);
            }
        } else {
            let len = (code as usize + 1) * unit;
            if input_pos + len > compressed.len() || bytes.len() + len > max_len {
                truncated = true;
                break;
            }
            bytes.extend_from_slice(&compressed[input_pos..input_pos + len]);
            input_pos += len;
        }
    }

    UnpackedRow { bytes, truncated }
}

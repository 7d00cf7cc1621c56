//! 1-bit QuickDraw bitmaps (`BitsRect`, `BitsRgn`, `PackBitsRect`, `PackBitsRgn`)

use super::data::unpack_bits;
use super::error::{PictError, PictResult};
use super::region::Region;
use super::stream::PictStream;
use super::types::{PictRect, Rgb};

/// Row bytes keep only the low 14 bits; the top bits are flags.
pub const ROW_BYTES_MASK: u16 = 0x3FFF;

/// Largest transfer mode accepted on raster records
pub const MAX_TRANSFER_MODE: u16 = 64;

/// Rows are packed only from this stride on.
pub const MIN_PACKED_ROW_BYTES: usize = 8;

/// Read the 1- or 2-byte length of a packed row and return its bytes.
pub(crate) fn read_packed_row<'data>(
    stream: &mut PictStream<'data>,
    row_bytes: usize,
) -> PictResult<&'data [u8]> {
    let start = stream.pos();
    let len = if row_bytes > 250 {
        stream.read_u16()? as usize
    } else {
        stream.read_u8()? as usize
    };
    match stream.read_bytes(len) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            stream.seek(start)?;
            Err(e)
        },
    }
}

pub(crate) fn check_rect(what: &str, rect: &PictRect) -> PictResult<()> {
    if !rect.is_valid() {
        return Err(PictError::MalformedGeometry(format!(
            "{} {:?} is empty",
            what, rect
        )));
    }
    Ok(())
}

/// A bitmap record whose bytes have been consumed but not yet decoded.
#[derive(Debug, Clone)]
pub struct RawBitmap<'data> {
    pub row_bytes: usize,
    pub bounds: PictRect,
    pub src_rect: PictRect,
    pub dst_rect: PictRect,
    pub mode: u16,
    pub region: Option<Region>,
    pub packed: bool,
    rows: Vec<&'data [u8]>,
}

/// Decoded 1-bit bitmap: rows of `row_bytes` bytes, MSB first, 1 = black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub row_bytes: usize,
    pub bounds: PictRect,
    pub src_rect: PictRect,
    pub dst_rect: PictRect,
    pub mode: u16,
    pub region: Option<Region>,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Read the bitmap record after its opcode (and base address, if any).
    ///
    /// Consumes the header, the optional mask region and every row.
    /// `packed` is the opcode's packing flag; rows narrower than eight bytes
    /// are always stored raw.
    pub fn read<'data>(
        stream: &mut PictStream<'data>,
        packed: bool,
        has_region: bool,
    ) -> PictResult<RawBitmap<'data>> {
        stream.check(2 + 3 * 8 + 2)?;
        let row_bytes = (stream.read_u16()? & ROW_BYTES_MASK) as usize;
        let bounds = stream.read_rect()?;
        let src_rect = stream.read_rect()?;
        let dst_rect = stream.read_rect()?;
        let mode = stream.read_u16()?;
        let region = if has_region {
            Region::parse_mask(stream)?
        } else {
            None
        };

        let packed = packed && row_bytes >= MIN_PACKED_ROW_BYTES;
        let num_rows = bounds.height().max(0) as usize;
        if !packed {
            stream.check(num_rows * row_bytes)?;
        }
        let mut rows = Vec::with_capacity(num_rows);
        for _ in 0..num_rows {
            let row = if packed {
                read_packed_row(stream, row_bytes)?
            } else {
                stream.read_bytes(row_bytes)?
            };
            rows.push(row);
        }

        Ok(RawBitmap {
            row_bytes,
            bounds,
            src_rect,
            dst_rect,
            mode,
            region,
            packed,
            rows,
        })
    }

    /// Read and decode in one step.
    pub fn parse(
        stream: &mut PictStream<'_>,
        packed: bool,
        has_region: bool,
    ) -> PictResult<Self> {
        Self::read(stream, packed, has_region)?.decode()
    }

    pub fn width(&self) -> usize {
        self.bounds.width().max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.bounds.height().max(0) as usize
    }

    /// Whether the pixel at (`x`, `y`) relative to the bounds is set
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data
            .get(y * self.row_bytes + x / 8)
            .is_some_and(|byte| byte & (0x80 >> (x % 8)) != 0)
    }

    /// Palette used by the bit values: 0 is white, 1 is black
    pub fn palette() -> [Rgb; 2] {
        [Rgb::WHITE, Rgb::BLACK]
    }
}

impl RawBitmap<'_> {
    /// Validate the geometry and expand every row.
    pub fn decode(self) -> PictResult<Bitmap> {
        check_rect("bitmap bounds", &self.bounds)?;
        check_rect("bitmap source", &self.src_rect)?;
        check_rect("bitmap destination", &self.dst_rect)?;
        if self.mode > MAX_TRANSFER_MODE {
            return Err(PictError::MalformedGeometry(format!(
                "transfer mode {}",
                self.mode
            )));
        }
        if self.row_bytes * 8 < self.bounds.width() as usize {
            return Err(PictError::MalformedGeometry(format!(
                "row bytes {} too small for width {}",
                self.row_bytes,
                self.bounds.width()
            )));
        }

        let mut data = Vec::with_capacity(self.row_bytes * self.rows.len());
        for row in &self.rows {
            if self.packed {
                data.extend_from_slice(&unpack_bits(row, self.row_bytes)?);
            } else {
                data.extend_from_slice(row);
            }
        }

        Ok(Bitmap {
            row_bytes: self.row_bytes,
            bounds: self.bounds,
            src_rect: self.src_rect,
            dst_rect: self.dst_rect,
            mode: self.mode,
            region: self.region,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(row_bytes: u16, rect: [i16; 4], mode: u16) -> Vec<u8> {
        let mut data = row_bytes.to_be_bytes().to_vec();
        for _ in 0..3 {
            for v in rect {
                data.extend_from_slice(&v.to_be_bytes());
            }
        }
        data.extend_from_slice(&mode.to_be_bytes());
        data
    }

    #[test]
    fn test_unpacked_bitmap() {
        let mut data = header(2, [0, 0, 2, 16], 0);
        data.extend_from_slice(&[0xF0, 0x0F, 0x00, 0xFF]);
        let mut s = PictStream::new(&data);
        let bm = Bitmap::parse(&mut s, false, false).unwrap();
        assert_eq!(bm.data, vec![0xF0, 0x0F, 0x00, 0xFF]);
        assert!(bm.is_set(0, 0));
        assert!(!bm.is_set(4, 0));
        assert!(bm.is_set(15, 1));
        assert!(s.is_at_end());
    }

    #[test]
    fn test_narrow_rows_stay_raw_even_when_packed() {
        let mut data = header(2, [0, 0, 1, 16], 0);
        data.extend_from_slice(&[0xAA, 0x55]);
        let mut s = PictStream::new(&data);
        let bm = Bitmap::parse(&mut s, true, false).unwrap();
        assert_eq!(bm.data, vec![0xAA, 0x55]);
    }

    #[test]
    fn test_packed_bitmap_rows() {
        let mut data = header(8, [0, 0, 2, 64], 1);
        // row 0: eight 0xFF
        data.extend_from_slice(&[2, 0xF9, 0xFF]);
        // row 1: literal 8 bytes
        data.extend_from_slice(&[9, 7, 1, 2, 3, 4, 5, 6, 7, 8]);
        let mut s = PictStream::new(&data);
        let bm = Bitmap::parse(&mut s, true, false).unwrap();
        assert_eq!(&bm.data[..8], &[0xFF; 8]);
        assert_eq!(&bm.data[8..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(bm.mode, 1);
        assert!(s.is_at_end());
    }

    #[test]
    fn test_bad_run_rejects_record_but_consumes_it() {
        let mut data = header(8, [0, 0, 1, 64], 0);
        data.extend_from_slice(&[2, 0xF0, 0xFF]);
        let mut s = PictStream::new(&data);
        let raw = Bitmap::read(&mut s, true, false).unwrap();
        assert!(s.is_at_end());
        assert!(matches!(raw.decode(), Err(PictError::MalformedRun(_))));
    }

    #[test]
    fn test_empty_destination_is_malformed() {
        let mut data = header(1, [0, 0, 1, 8], 0);
        // overwrite destination rect with an empty one
        data[18..26].copy_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
        data.push(0xFF);
        let mut s = PictStream::new(&data);
        let raw = Bitmap::read(&mut s, false, false).unwrap();
        assert!(matches!(
            raw.decode(),
            Err(PictError::MalformedGeometry(_))
        ));
    }

    #[test]
    fn test_truncated_rows() {
        let mut data = header(2, [0, 0, 4, 16], 0);
        data.extend_from_slice(&[0, 0, 0]);
        let mut s = PictStream::new(&data);
        assert!(matches!(
            Bitmap::read(&mut s, false, false),
            Err(PictError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_row_bytes_flags_are_masked() {
        let mut data = header(0x4001, [0, 0, 1, 8], 0);
        data.push(0x80);
        let mut s = PictStream::new(&data);
        let bm = Bitmap::parse(&mut s, false, false).unwrap();
        assert_eq!(bm.row_bytes, 1);
        assert!(bm.is_set(0, 0));
    }
}

//! Colour QuickDraw pixel maps
//!
//! Indexed (1/2/4/8 bits) and direct (16/32 bits) pixmaps as found in the
//! `BitsRect`/`PackBitsRect` family, `DirectBitsRect`/`DirectBitsRgn` and
//! pixel patterns.

use super::bitmap::{
    MIN_PACKED_ROW_BYTES, ROW_BYTES_MASK, check_rect, read_packed_row,
};
use super::color_table::ColorTable;
use super::data::{PIXMAP_ROW_SLACK, unpack_bits_wide};
use super::error::{PictError, PictResult};
use super::region::Region;
use super::stream::PictStream;
use super::types::{PictRect, Rgb};
use tracing::warn;

/// High bit of the row-bytes word marks a pixmap rather than a bitmap
pub const PIXMAP_ROW_FLAG: u16 = 0x8000;

/// Largest pixmap decoded, in pixels (8192 x 8192)
pub const MAX_PIXELS: usize = 1 << 26;

/// Which optional parts follow the pixmap header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixmapLayout {
    pub color_table: bool,
    pub rects_and_mode: bool,
    pub region: bool,
    pub packed: bool,
}

impl PixmapLayout {
    /// `BitsRect`/`PackBitsRect` style record
    pub const fn indexed(packed: bool, region: bool) -> Self {
        Self {
            color_table: true,
            rects_and_mode: true,
            region,
            packed,
        }
    }

    /// `DirectBitsRect`/`DirectBitsRgn` record
    pub const fn direct(region: bool) -> Self {
        Self {
            color_table: false,
            rects_and_mode: true,
            region,
            packed: true,
        }
    }

    /// Pixmap embedded in a pixel pattern
    pub const fn pattern() -> Self {
        Self {
            color_table: true,
            rects_and_mode: false,
            region: false,
            packed: true,
        }
    }
}

/// Fixed part of a `PixMap` record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixmapHeader {
    pub row_bytes: usize,
    pub bounds: PictRect,
    pub version: u16,
    pub pack_type: u16,
    pub pack_size: u32,
    pub h_res: f64,
    pub v_res: f64,
    pub pixel_type: u16,
    pub pixel_size: u16,
    pub component_count: u16,
    pub component_size: u16,
    pub plane_bytes: u32,
}

impl PixmapHeader {
    /// Bytes in the header after the row-bytes word
    pub const SIZE: usize = 8 + 2 + 2 + 4 + 4 + 4 + 2 + 2 + 2 + 2 + 4 + 4 + 4;

    /// Parse the header; `row_bytes_word` is the already-read first word.
    pub fn parse(stream: &mut PictStream<'_>, row_bytes_word: u16) -> PictResult<Self> {
        stream.check(Self::SIZE)?;
        let bounds = stream.read_rect()?;
        let version = stream.read_u16()?;
        let pack_type = stream.read_u16()?;
        let pack_size = stream.read_u32()?;
        let h_res = stream.read_fixed()?;
        let v_res = stream.read_fixed()?;
        let pixel_type = stream.read_u16()?;
        let pixel_size = stream.read_u16()?;
        let component_count = stream.read_u16()?;
        let component_size = stream.read_u16()?;
        let plane_bytes = stream.read_u32()?;
        let _table_handle = stream.read_u32()?;
        let _reserved = stream.read_u32()?;
        Ok(Self {
            row_bytes: (row_bytes_word & ROW_BYTES_MASK) as usize,
            bounds,
            version,
            pack_type,
            pack_size,
            h_res,
            v_res,
            pixel_type,
            pixel_size,
            component_count,
            component_size,
            plane_bytes,
        })
    }
}

/// How a row's bytes are laid out once unpacked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLayout {
    /// 1, 2, 4 or 8 bit palette indices
    Indexed,
    /// 16-bit 5/5/5
    Rgb555,
    /// 32-bit `xRGB` chunks
    Chunky32,
    /// One byte per component, components in separate bands
    Planar { planes: usize },
}

/// Decoded pixels: palette indices with their table, or direct colours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    Indexed {
        indices: Vec<u8>,
        color_table: ColorTable,
    },
    Rgb(Vec<Rgb>),
}

/// Pixmap record consumed but not yet decoded
#[derive(Debug, Clone)]
pub struct RawPixmap<'data> {
    pub header: PixmapHeader,
    pub color_table: Option<ColorTable>,
    pub src_rect: Option<PictRect>,
    pub dst_rect: Option<PictRect>,
    pub mode: u16,
    pub region: Option<Region>,
    pub packed: bool,
    rows: Vec<&'data [u8]>,
}

/// Decoded pixmap
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    pub header: PixmapHeader,
    pub src_rect: Option<PictRect>,
    pub dst_rect: Option<PictRect>,
    pub mode: u16,
    pub region: Option<Region>,
    pub pixels: PixelData,
}

impl Pixmap {
    /// Read a pixmap whose row-bytes word has already been consumed.
    pub fn read<'data>(
        stream: &mut PictStream<'data>,
        row_bytes_word: u16,
        layout: PixmapLayout,
    ) -> PictResult<RawPixmap<'data>> {
        let header = PixmapHeader::parse(stream, row_bytes_word)?;
        let color_table = if layout.color_table {
            Some(ColorTable::parse(stream)?)
        } else {
            None
        };
        let (src_rect, dst_rect, mode) = if layout.rects_and_mode {
            stream.check(18)?;
            let src = stream.read_rect()?;
            let dst = stream.read_rect()?;
            (Some(src), Some(dst), stream.read_u16()?)
        } else {
            (None, None, 0)
        };
        let region = if layout.region {
            Region::parse_mask(stream)?
        } else {
            None
        };

        let row_bytes = header.row_bytes;
        // 32-bit pack type 2 rows are stored raw
        let raw_direct = header.pixel_size == 32 && header.pack_type == 2;
        let packed = layout.packed
            && row_bytes >= MIN_PACKED_ROW_BYTES
            && header.pack_type != 1
            && !raw_direct;
        let num_rows = header.bounds.height().max(0) as usize;
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

        Ok(RawPixmap {
            header,
            color_table,
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
        row_bytes_word: u16,
        layout: PixmapLayout,
    ) -> PictResult<Self> {
        Self::read(stream, row_bytes_word, layout)?.decode()
    }

    pub fn width(&self) -> usize {
        self.header.bounds.width().max(0) as usize
    }

    pub fn height(&self) -> usize {
        self.header.bounds.height().max(0) as usize
    }

    /// Colour of the pixel at (`x`, `y`) relative to the bounds
    pub fn color_at(&self, x: usize, y: usize) -> Option<Rgb> {
        let offset = y * self.width() + x;
        match &self.pixels {
            PixelData::Indexed {
                indices,
                color_table,
            } => color_table.get(usize::from(*indices.get(offset)?)),
            PixelData::Rgb(colors) => colors.get(offset).copied(),
        }
    }
}

impl RawPixmap<'_> {
    fn row_layout(&self) -> PictResult<(RowLayout, usize)> {
        let h = &self.header;
        let unknown = || PictError::UnknownPixelFormat {
            pixel_size: h.pixel_size,
            component_count: h.component_count,
        };
        match h.pixel_size {
            1 | 2 | 4 | 8 => Ok((RowLayout::Indexed, 1)),
            16 => Ok((RowLayout::Rgb555, 2)),
            32 if !self.packed || h.pack_type == 2 => Ok((RowLayout::Chunky32, 4)),
            32 => match h.component_count {
                3 | 4 => Ok((
                    RowLayout::Planar {
                        planes: usize::from(h.component_count),
                    },
                    1,
                )),
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }

    /// Validate the record and rebuild its pixels.
    pub fn decode(self) -> PictResult<Pixmap> {
        let (layout, unit) = self.row_layout()?;
        check_rect("pixmap bounds", &self.header.bounds)?;
        if let Some(src) = &self.src_rect {
            check_rect("pixmap source", src)?;
        }
        if let Some(dst) = &self.dst_rect {
            check_rect("pixmap destination", dst)?;
        }

        let width = self.header.bounds.width() as usize;
        let height = self.rows.len();
        let pixel_size = usize::from(self.header.pixel_size);
        if width * pixel_size > self.header.row_bytes * 8 {
            return Err(PictError::MalformedGeometry(format!(
                "{} pixels of {} bits do not fit rows of {} bytes",
                width, pixel_size, self.header.row_bytes
            )));
        }
        if width.saturating_mul(height) > MAX_PIXELS {
            return Err(PictError::MalformedGeometry(format!(
                "pixmap of {}x{} is too large",
                width, height
            )));
        }
        let row_bytes = match layout {
            RowLayout::Planar { planes: 3 } => self.header.row_bytes * 3 / 4,
            _ => self.header.row_bytes,
        };

        let mut indices = Vec::new();
        let mut colors = Vec::new();
        let mut max_index = 0usize;
        let mut truncated_rows = 0usize;
        if layout == RowLayout::Indexed {
            indices.reserve(width * height);
        } else {
            colors.reserve(width * height);
        }

        for raw in &self.rows {
            let unpacked;
            let row: &[u8] = if self.packed {
                let out = unpack_bits_wide(raw, unit, row_bytes + PIXMAP_ROW_SLACK);
                if out.truncated {
                    truncated_rows += 1;
                }
                unpacked = out.bytes;
                &unpacked
            } else {
                raw
            };
            let byte = |i: usize| row.get(i).copied().unwrap_or(0);

            match layout {
                RowLayout::Indexed => {
                    let mask = (1u16 << pixel_size) - 1;
                    for x in 0..width {
                        let bit = x * pixel_size;
                        let shift = 8 - pixel_size - bit % 8;
                        let index = ((u16::from(byte(bit / 8)) >> shift) & mask) as u8;
                        max_index = max_index.max(usize::from(index));
                        indices.push(index);
                    }
                },
                RowLayout::Rgb555 => {
                    for x in 0..width {
                        let v = u16::from_be_bytes([byte(2 * x), byte(2 * x + 1)]);
                        colors.push(Rgb::new(
                            ((v >> 7) & 0xF8) as u8,
                            ((v >> 2) & 0xF8) as u8,
                            ((v << 3) & 0xFF) as u8,
                        ));
                    }
                },
                RowLayout::Chunky32 => {
                    for x in 0..width {
                        let o = 4 * x;
                        colors.push(Rgb::new(byte(o + 1), byte(o + 2), byte(o + 3)));
                    }
                },
                RowLayout::Planar { planes } => {
                    let start = if planes == 4 { width } else { 0 };
                    for x in 0..width {
                        colors.push(Rgb::new(
                            byte(start + x),
                            byte(start + width + x),
                            byte(start + 2 * width + x),
                        ));
                    }
                },
            }
        }

        if truncated_rows > 0 {
            warn!(
                truncated_rows,
                row_bytes, "pixmap rows truncated at the unpack limit"
            );
        }

        let pixels = if layout == RowLayout::Indexed && !indices.is_empty() {
            let mut color_table = self.color_table.unwrap_or_default();
            color_table.fill_missing(max_index);
            PixelData::Indexed {
                indices,
                color_table,
            }
        } else {
            PixelData::Rgb(colors)
        };

        Ok(Pixmap {
            header: self.header,
            src_rect: self.src_rect,
            dst_rect: self.dst_rect,
            mode: self.mode,
            region: self.region,
            pixels,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct PixmapSpec {
        pub row_bytes: u16,
        pub rect: [i16; 4],
        pub pack_type: u16,
        pub pixel_size: u16,
        pub component_count: u16,
    }

    pub(crate) fn header_bytes(spec: &PixmapSpec) -> Vec<u8> {
        let mut data = (spec.row_bytes | PIXMAP_ROW_FLAG).to_be_bytes().to_vec();
        for v in spec.rect {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(&0u16.to_be_bytes()); // version
        data.extend_from_slice(&spec.pack_type.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes()); // pack size
        data.extend_from_slice(&0x0048_0000u32.to_be_bytes());
        data.extend_from_slice(&0x0048_0000u32.to_be_bytes());
        let pixel_type: u16 = if spec.pixel_size > 8 { 16 } else { 0 };
        data.extend_from_slice(&pixel_type.to_be_bytes());
        data.extend_from_slice(&spec.pixel_size.to_be_bytes());
        data.extend_from_slice(&spec.component_count.to_be_bytes());
        data.extend_from_slice(&8u16.to_be_bytes()); // component size
        data.extend_from_slice(&[0; 12]); // plane bytes, table, reserved
        data
    }

    pub(crate) fn color_table_bytes(colors: &[(u16, u16, u16)]) -> Vec<u8> {
        let mut data = vec![0, 0, 0, 0, 0, 0];
        data.extend_from_slice(&((colors.len() as i16) - 1).to_be_bytes());
        for (i, (r, g, b)) in colors.iter().enumerate() {
            data.extend_from_slice(&(i as u16).to_be_bytes());
            for c in [r, g, b] {
                data.extend_from_slice(&c.to_be_bytes());
            }
        }
        data
    }

    fn rects_and_mode(rect: [i16; 4]) -> Vec<u8> {
        let mut data = Vec::new();
        for _ in 0..2 {
            for v in rect {
                data.extend_from_slice(&v.to_be_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_be_bytes());
        data
    }

    fn parse_with_row_word(data: &[u8], layout: PixmapLayout) -> PictResult<Pixmap> {
        let mut s = PictStream::new(data);
        let word = s.read_u16()?;
        let pm = Pixmap::parse(&mut s, word, layout)?;
        assert!(s.is_at_end());
        Ok(pm)
    }

    #[test]
    fn test_rgb555_pixel() {
        let rect = [0, 0, 1, 1];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 2,
            rect,
            pack_type: 0,
            pixel_size: 16,
            component_count: 3,
        });
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[0x7C, 0x00]);
        let pm = parse_with_row_word(&data, PixmapLayout::direct(false)).unwrap();
        // (v >> 7) & 0xF8, (v >> 2) & 0xF8, (v << 3) & 0xFF; green is 0x00 for
        // 0x7C00, not the 0x80 sometimes quoted for this pixel
        assert_eq!(pm.pixels, PixelData::Rgb(vec![Rgb::new(0xF8, 0x00, 0x00)]));
    }

    #[test]
    fn test_rgb555_channels() {
        let rect = [0, 0, 1, 3];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 6,
            rect,
            pack_type: 0,
            pixel_size: 16,
            component_count: 3,
        });
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[0x03, 0xE0, 0x00, 0x1F, 0x7F, 0xFF]);
        let pm = parse_with_row_word(&data, PixmapLayout::direct(false)).unwrap();
        assert_eq!(
            pm.pixels,
            PixelData::Rgb(vec![
                Rgb::new(0x00, 0xF8, 0x00),
                Rgb::new(0x00, 0x00, 0xF8),
                Rgb::new(0xF8, 0xF8, 0xF8)
            ])
        );
    }

    #[test]
    fn test_indexed_4bit_with_ramp() {
        let rect = [0, 0, 1, 4];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 2,
            rect,
            pack_type: 0,
            pixel_size: 4,
            component_count: 1,
        });
        data.extend(color_table_bytes(&[(0xFFFF, 0, 0)]));
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[0x01, 0x23]);
        let pm = parse_with_row_word(&data, PixmapLayout::indexed(true, false)).unwrap();
        let PixelData::Indexed {
            indices,
            color_table,
        } = &pm.pixels
        else {
            panic!("expected indexed pixels");
        };
        assert_eq!(indices, &vec![0, 1, 2, 3]);
        assert_eq!(color_table.len(), 4);
        assert_eq!(color_table.get(0), Some(Rgb::new(0xFF, 0, 0)));
        assert_eq!(color_table.get(1), Some(Rgb::grey(255)));
        assert_eq!(color_table.get(3), Some(Rgb::grey(1)));
        assert_eq!(pm.color_at(0, 0), Some(Rgb::new(0xFF, 0, 0)));
    }

    #[test]
    fn test_planar_32bit_packed() {
        let rect = [0, 0, 1, 2];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 8,
            rect,
            pack_type: 4,
            pixel_size: 32,
            component_count: 3,
        });
        data.extend(rects_and_mode(rect));
        // literal run of six component bytes: R R G G B B
        let row = [0x05, 0x10, 0x11, 0x20, 0x21, 0x30, 0x31];
        data.push(row.len() as u8);
        data.extend_from_slice(&row);
        let pm = parse_with_row_word(&data, PixmapLayout::direct(false)).unwrap();
        assert_eq!(
            pm.pixels,
            PixelData::Rgb(vec![Rgb::new(0x10, 0x20, 0x30), Rgb::new(0x11, 0x21, 0x31)])
        );
    }

    #[test]
    fn test_planar_32bit_skips_alpha_plane() {
        let rect = [0, 0, 1, 2];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 8,
            rect,
            pack_type: 4,
            pixel_size: 32,
            component_count: 4,
        });
        data.extend(rects_and_mode(rect));
        let row = [0x07, 0xAA, 0xAA, 1, 2, 3, 4, 5, 6];
        data.push(row.len() as u8);
        data.extend_from_slice(&row);
        let pm = parse_with_row_word(&data, PixmapLayout::direct(false)).unwrap();
        assert_eq!(
            pm.pixels,
            PixelData::Rgb(vec![Rgb::new(1, 3, 5), Rgb::new(2, 4, 6)])
        );
    }

    #[test]
    fn test_unpacked_32bit() {
        let rect = [0, 0, 1, 1];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 4,
            rect,
            pack_type: 1,
            pixel_size: 32,
            component_count: 3,
        });
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[0x00, 0x12, 0x34, 0x56]);
        let pm = parse_with_row_word(&data, PixmapLayout::direct(false)).unwrap();
        assert_eq!(pm.pixels, PixelData::Rgb(vec![Rgb::new(0x12, 0x34, 0x56)]));
    }

    #[test]
    fn test_32bit_pack_type_2_rows_are_raw() {
        let rect = [0, 0, 1, 2];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 8,
            rect,
            pack_type: 2,
            pixel_size: 32,
            component_count: 3,
        });
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x00, 0x44, 0x55, 0x66]);
        let pm = parse_with_row_word(&data, PixmapLayout::direct(false)).unwrap();
        assert_eq!(
            pm.pixels,
            PixelData::Rgb(vec![Rgb::new(0x11, 0x22, 0x33), Rgb::new(0x44, 0x55, 0x66)])
        );
    }

    #[test]
    fn test_width_past_row_bytes_is_rejected() {
        let rect = [0, i16::MIN, 1, i16::MAX];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 8,
            rect,
            pack_type: 0,
            pixel_size: 8,
            component_count: 1,
        });
        data.extend(color_table_bytes(&[(0, 0, 0)]));
        data.extend(rects_and_mode([0, 0, 1, 1]));
        data.push(0); // empty packed row
        let mut s = PictStream::new(&data);
        let word = s.read_u16().unwrap();
        let raw = Pixmap::read(&mut s, word, PixmapLayout::indexed(true, false)).unwrap();
        assert!(s.is_at_end());
        assert!(matches!(
            raw.decode(),
            Err(PictError::MalformedGeometry(_))
        ));
    }

    #[test]
    fn test_oversized_pixmap_is_rejected() {
        let (width, height) = (0x3FFFi16, 8192i16);
        let rect = [0, 0, height, width];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 0x3FFF,
            rect,
            pack_type: 0,
            pixel_size: 8,
            component_count: 1,
        });
        data.extend(color_table_bytes(&[(0, 0, 0)]));
        data.extend(rects_and_mode([0, 0, 1, 1]));
        // every row is an empty run with a two-byte length
        data.extend(std::iter::repeat_n(0u8, 2 * height as usize));
        let mut s = PictStream::new(&data);
        let word = s.read_u16().unwrap();
        let raw = Pixmap::read(&mut s, word, PixmapLayout::indexed(true, false)).unwrap();
        assert!(s.is_at_end());
        assert!(matches!(
            raw.decode(),
            Err(PictError::MalformedGeometry(_))
        ));
    }

    #[test]
    fn test_unknown_pixel_size_consumes_record() {
        let rect = [0, 0, 1, 1];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 3,
            rect,
            pack_type: 0,
            pixel_size: 24,
            component_count: 3,
        });
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[1, 2, 3]);
        let mut s = PictStream::new(&data);
        let word = s.read_u16().unwrap();
        let raw = Pixmap::read(&mut s, word, PixmapLayout::direct(false)).unwrap();
        assert!(s.is_at_end());
        assert!(matches!(
            raw.decode(),
            Err(PictError::UnknownPixelFormat { pixel_size: 24, .. })
        ));
    }

    #[test]
    fn test_planar_two_components_is_unknown() {
        let rect = [0, 0, 1, 4];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 16,
            rect,
            pack_type: 4,
            pixel_size: 32,
            component_count: 2,
        });
        data.extend(rects_and_mode(rect));
        data.extend_from_slice(&[2, 0xF1, 0x00]);
        assert!(matches!(
            parse_with_row_word(&data, PixmapLayout::direct(false)),
            Err(PictError::UnknownPixelFormat { .. })
        ));
    }

    #[test]
    fn test_overlong_run_is_soft_truncated() {
        let rect = [0, 0, 1, 8];
        let mut data = header_bytes(&PixmapSpec {
            row_bytes: 8,
            rect,
            pack_type: 0,
            pixel_size: 8,
            component_count: 1,
        });
        data.extend(color_table_bytes(&[(0, 0, 0), (0xFFFF, 0xFFFF, 0xFFFF)]));
        data.extend(rects_and_mode(rect));
        // four literal indices, then a run far past the slack
        let row = [0x03, 1, 1, 0, 1, 0x81, 1];
        data.push(row.len() as u8);
        data.extend_from_slice(&row);
        let pm = parse_with_row_word(&data, PixmapLayout::indexed(true, false)).unwrap();
        let PixelData::Indexed { indices, .. } = pm.pixels else {
            panic!("expected indexed pixels");
        };
        assert_eq!(indices, vec![1, 1, 0, 1, 0, 0, 0, 0]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_indices_fit_palette(
                pixel_size in prop::sample::select(vec![1u16, 2, 4, 8]),
                width in 1i16..24,
                height in 1i16..6,
                defined in 1usize..4,
                seed in prop::collection::vec(any::<u8>(), 256),
            ) {
                let bits = usize::from(pixel_size) * width as usize;
                let row_bytes = bits.div_ceil(8).max(1);
                let rect = [0, 0, height, width];
                let mut data = header_bytes(&PixmapSpec {
                    row_bytes: row_bytes as u16,
                    rect,
                    pack_type: 1,
                    pixel_size,
                    component_count: 1,
                });
                let colors: Vec<_> = (0..defined).map(|i| (i as u16, 0, 0)).collect();
                data.extend(color_table_bytes(&colors));
                data.extend(rects_and_mode(rect));
                for i in 0..row_bytes * height as usize {
                    data.push(seed[i % seed.len()]);
                }
                let pm = parse_with_row_word(&data, PixmapLayout::indexed(false, false)).unwrap();
                let PixelData::Indexed { indices, color_table } = pm.pixels else {
                    panic!("expected indexed pixels");
                };
                prop_assert_eq!(indices.len(), width as usize * height as usize);
                for index in indices {
                    prop_assert!(usize::from(index) < color_table.len());
                }
            }
        }
    }
}

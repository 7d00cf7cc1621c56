//! QuickDraw regions
//!
//! A region record is `rgnSize` (including itself), the bounding box, then
//! for non-rectangular regions a list of scanlines: `y, x1, x2, ..., 0x7FFF`
//! closed by a final `0x7FFF`.

use super::error::{PictError, PictResult};
use super::stream::PictStream;
use super::types::{PictRect, Point};
use tracing::warn;

/// End of scanline and end of region marker
pub const REGION_END: i16 = 0x7FFF;

const REGION_HEADER_SIZE: usize = 10;

/// Decoded region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub bbox: PictRect,
    /// Inversion points in scanline order
    pub points: Vec<Point>,
}

impl Region {
    /// Region covering exactly `bbox`
    pub fn rect(bbox: PictRect) -> Self {
        Self {
            bbox,
            points: Vec::new(),
        }
    }

    pub fn is_rectangular(&self) -> bool {
        self.points.is_empty()
    }

    /// Parse a region record, leaving the cursor after it.
    ///
    /// Scanline data that leaves the bounding box ends decoding; the points
    /// collected so far are kept. A record too short for its bounding box is
    /// skipped and reported as [`PictError::MalformedGeometry`].
    pub fn parse(stream: &mut PictStream<'_>) -> PictResult<Self> {
        let start = stream.pos();
        let size = stream.read_u16()? as usize;
        if size < REGION_HEADER_SIZE {
            if let Err(e) = stream.skip(size.saturating_sub(2)) {
                stream.seek(start)?;
                return Err(e);
            }
            return Err(PictError::MalformedGeometry(format!(
                "region size {} below header size",
                size
            )));
        }
        let old_end = match stream.limit(size - 2) {
            Ok(end) => end,
            Err(e) => {
                stream.seek(start)?;
                return Err(e);
            },
        };
        let bbox = stream.read_rect()?;
        let points = Self::read_scanlines(stream, &bbox);
        stream.restore_limit(old_end);
        Ok(Self { bbox, points })
    }

    /// Parse the mask region of a raster record.
    ///
    /// A malformed mask is dropped so the pixel rows after it stay readable.
    pub(crate) fn parse_mask(stream: &mut PictStream<'_>) -> PictResult<Option<Self>> {
        match Self::parse(stream) {
            Ok(region) => Ok(Some(region)),
            Err(PictError::MalformedGeometry(msg)) => {
                warn!(%msg, "dropping raster mask region");
                Ok(None)
            },
            Err(e) => Err(e),
        }
    }

    fn read_scanlines(stream: &mut PictStream<'_>, bbox: &PictRect) -> Vec<Point> {
        let mut points = Vec::new();
        while stream.remaining() >= 2 {
            let Ok(y) = stream.read_i16() else { break };
            if y == REGION_END {
                return points;
            }
            if !bbox.contains_inclusive(i32::from(bbox.left), i32::from(y)) {
                warn!(y, ?bbox, "region scanline outside its bounding box");
                return points;
            }
            loop {
                let Ok(x) = stream.read_i16() else {
                    warn!("region scanline truncated");
                    return points;
                };
                if x == REGION_END {
                    break;
                }
                if !bbox.contains_inclusive(i32::from(x), i32::from(y)) {
                    warn!(x, y, ?bbox, "region point outside its bounding box");
                    return points;
                }
                points.push(Point::new(i32::from(x), i32::from(y)));
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_bytes(bbox: [i16; 4], values: &[i16]) -> Vec<u8> {
        let size = (REGION_HEADER_SIZE + values.len() * 2) as u16;
        let mut data = size.to_be_bytes().to_vec();
        for v in bbox.iter().chain(values) {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_rectangular_region() {
        let data = region_bytes([0, 0, 10, 20], &[]);
        let mut s = PictStream::new(&data);
        let rgn = Region::parse(&mut s).unwrap();
        assert_eq!(rgn.bbox, PictRect::new(0, 0, 10, 20));
        assert!(rgn.is_rectangular());
        assert!(s.is_at_end());
    }

    #[test]
    fn test_scanline_region() {
        let data = region_bytes(
            [0, 0, 10, 10],
            &[2, 1, 5, REGION_END, 8, 1, 5, REGION_END, REGION_END],
        );
        let mut s = PictStream::new(&data);
        let rgn = Region::parse(&mut s).unwrap();
        assert_eq!(
            rgn.points,
            vec![
                Point::new(1, 2),
                Point::new(5, 2),
                Point::new(1, 8),
                Point::new(5, 8)
            ]
        );
        assert!(s.is_at_end());
    }

    #[test]
    fn test_out_of_bounds_point_keeps_prefix() {
        let data = region_bytes(
            [0, 0, 10, 10],
            &[2, 1, 50, REGION_END, REGION_END, 0, 0],
        );
        let mut s = PictStream::new(&data);
        let rgn = Region::parse(&mut s).unwrap();
        assert_eq!(rgn.points, vec![Point::new(1, 2)]);
        assert_eq!(s.pos(), data.len());
    }

    #[test]
    fn test_size_below_header_is_skipped() {
        let data = [0x00, 0x04, 0, 0, 0, 0];
        let mut s = PictStream::new(&data);
        assert!(matches!(
            Region::parse(&mut s),
            Err(PictError::MalformedGeometry(_))
        ));
        assert_eq!(s.pos(), 4);
    }

    #[test]
    fn test_declared_size_past_end_is_truncation() {
        let mut data = region_bytes([0, 0, 10, 10], &[2, 1, REGION_END, REGION_END]);
        data.truncate(12);
        let mut s = PictStream::new(&data);
        assert!(matches!(
            Region::parse(&mut s),
            Err(PictError::TruncatedInput { .. })
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_points_stay_inside_bbox(
                top in -100i16..100, left in -100i16..100,
                h in 0i16..100, w in 0i16..100,
                values in prop::collection::vec(-300i16..300, 0..64),
            ) {
                let bbox = [top, left, top + h, left + w];
                let data = region_bytes(bbox, &values);
                let mut s = PictStream::new(&data);
                let rgn = Region::parse(&mut s).unwrap();
                for p in &rgn.points {
                    prop_assert!(rgn.bbox.contains_inclusive(p.x, p.y));
                }
                prop_assert_eq!(s.pos(), data.len());
            }
        }
    }
}

//! Bounds-checked cursor over PICT bytes
//!
//! Every read validates the remaining length before consuming anything, so a
//! failed read leaves the cursor where it was.

use super::error::{PictError, PictResult};
use super::types::{PictRect, Point, Rgb};
use crate::common::binary::{read_fixed_be, read_i16_be, read_u16_be, read_u32_be};

/// Seekable view over a byte slice with an end limit.
#[derive(Debug, Clone)]
pub struct PictStream<'data> {
    data: &'data [u8],
    pos: usize,
    end: usize,
}

impl<'data> PictStream<'data> {
    pub fn new(data: &'data [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.end
    }

    /// Fail unless `n` more bytes are available.
    #[inline]
    pub fn check(&self, n: usize) -> PictResult<()> {
        if n > self.remaining() {
            return Err(PictError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Move to an absolute position (may equal the end).
    pub fn seek(&mut self, pos: usize) -> PictResult<()> {
        if pos > self.end {
            return Err(PictError::TruncatedInput {
                offset: self.pos,
                needed: pos - self.pos.min(pos),
                available: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> PictResult<()> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    /// Narrow the readable window to `len` bytes from the cursor, returning
    /// the previous end so it can be restored.
    pub fn limit(&mut self, len: usize) -> PictResult<usize> {
        self.check(len)?;
        let old = self.end;
        self.end = self.pos + len;
        Ok(old)
    }

    /// Undo [`limit`](Self::limit), leaving the cursor at the limited end.
    pub fn restore_limit(&mut self, old_end: usize) {
        self.pos = self.end;
        self.end = old_end.min(self.data.len());
    }

    pub fn read_u8(&mut self) -> PictResult<u8> {
        self.check(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> PictResult<i8> {
        self.read_u8().map(|v| v as i8)
    }

    pub fn read_u16(&mut self) -> PictResult<u16> {
        self.check(2)?;
        let v = read_u16_be(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_i16(&mut self) -> PictResult<i16> {
        self.check(2)?;
        let v = read_i16_be(self.data, self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> PictResult<u32> {
        self.check(4)?;
        let v = read_u32_be(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    /// 16.16 fixed-point value
    pub fn read_fixed(&mut self) -> PictResult<f64> {
        self.check(4)?;
        let v = read_fixed_be(self.data, self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    pub fn peek_u16(&self) -> PictResult<u16> {
        self.check(2)?;
        Ok(read_u16_be(self.data, self.pos)?)
    }

    pub fn read_bytes(&mut self, n: usize) -> PictResult<&'data [u8]> {
        self.check(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// QuickDraw point, stored vertical first
    pub fn read_point(&mut self) -> PictResult<Point> {
        self.check(4)?;
        let v = self.read_i16()?;
        let h = self.read_i16()?;
        Ok(Point::new(i32::from(h), i32::from(v)))
    }

    pub fn read_rect(&mut self) -> PictResult<PictRect> {
        self.check(8)?;
        let top = self.read_i16()?;
        let left = self.read_i16()?;
        let bottom = self.read_i16()?;
        let right = self.read_i16()?;
        Ok(PictRect::new(top, left, bottom, right))
    }

    /// `RGBColor`: three 16-bit channels, only the high byte is kept
    pub fn read_rgb(&mut self) -> PictResult<Rgb> {
        self.check(6)?;
        let r = self.read_u16()?;
        let g = self.read_u16()?;
        let b = self.read_u16()?;
        Ok(Rgb::new((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8))
    }

    /// Skip one byte if the position is odd relative to `base`.
    pub fn align_even(&mut self, base: usize) {
        if (self.pos - base.min(self.pos)) % 2 == 1 && self.pos < self.end {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance_cursor() {
        let data = [0x00, 0x0A, 0xFF, 0xFE, 0x01, 0x02, 0x03, 0x04];
        let mut s = PictStream::new(&data);
        assert_eq!(s.read_u16().unwrap(), 10);
        assert_eq!(s.read_i16().unwrap(), -2);
        assert_eq!(s.read_u32().unwrap(), 0x01020304);
        assert!(s.is_at_end());
    }

    #[test]
    fn test_failed_read_keeps_position() {
        let data = [0x00, 0x01, 0x02];
        let mut s = PictStream::new(&data);
        s.skip(2).unwrap();
        let err = s.read_u16().unwrap_err();
        assert_eq!(
            err,
            PictError::TruncatedInput {
                offset: 2,
                needed: 2,
                available: 1
            }
        );
        assert_eq!(s.pos(), 2);
        assert!(s.read_rect().is_err());
        assert_eq!(s.pos(), 2);
    }

    #[test]
    fn test_point_is_vertical_first() {
        let data = [0x00, 0x05, 0x00, 0x07];
        let mut s = PictStream::new(&data);
        assert_eq!(s.read_point().unwrap(), Point::new(7, 5));
    }

    #[test]
    fn test_limit_and_restore() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut s = PictStream::new(&data);
        s.skip(1).unwrap();
        let old = s.limit(2).unwrap();
        assert_eq!(s.remaining(), 2);
        assert!(s.read_bytes(3).is_err());
        s.read_u8().unwrap();
        s.restore_limit(old);
        assert_eq!(s.pos(), 3);
        assert_eq!(s.remaining(), 3);
    }

    #[test]
    fn test_rgb_keeps_high_byte() {
        let data = [0xFF, 0x10, 0x80, 0xFF, 0x00, 0xAA];
        let mut s = PictStream::new(&data);
        assert_eq!(s.read_rgb().unwrap(), Rgb::new(0xFF, 0x80, 0x00));
    }

    #[test]
    fn test_align_even() {
        let data = [0u8; 4];
        let mut s = PictStream::new(&data);
        s.skip(1).unwrap();
        s.align_even(0);
        assert_eq!(s.pos(), 2);
        s.align_even(0);
        assert_eq!(s.pos(), 2);
    }
}

//! QuickDraw colour tables (`ColorTable` records)

use super::error::{PictError, PictResult};
use super::stream::PictStream;
use super::types::Rgb;
use tracing::debug;

/// Ordered palette read from a `ColorTable` record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorTable {
    pub flags: u16,
    pub colors: Vec<Rgb>,
}

impl ColorTable {
    /// Parse `ctSeed`, `ctFlags`, `ctSize` and the colour specs.
    ///
    /// Each colour spec is a 16-bit value (ignored) followed by 16-bit R, G
    /// and B channels of which only the high byte is kept.
    pub fn parse(stream: &mut PictStream<'_>) -> PictResult<Self> {
        stream.check(8)?;
        let start = stream.pos();
        let _seed = stream.read_u32()?;
        let flags = stream.read_u16()?;
        let size = stream.read_i16()?;
        if size < 0 {
            stream.seek(start)?;
            return Err(PictError::MalformedGeometry(format!(
                "colour table size {}",
                size
            )));
        }

        let count = size as usize + 1;
        if let Err(e) = stream.check(count * 8) {
            stream.seek(start)?;
            return Err(e);
        }
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            let _value = stream.read_u16()?;
            colors.push(stream.read_rgb()?);
        }

        Ok(Self { flags, colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Grow the table so `max_index` is addressable.
    ///
    /// Pixel patterns often define only their first and last colours; the
    /// missing entries become a greyscale ramp from white down towards black.
    pub fn fill_missing(&mut self, max_index: usize) {
        if max_index < self.colors.len() {
            return;
        }
        let unset = max_index + 1 - self.colors.len();
        let step = if unset > 1 { 255 / (unset - 1) } else { 0 };
        debug!(
            defined = self.colors.len(),
            unset, step, "synthesizing greyscale colour table entries"
        );
        for i in 0..unset {
            let v = 255usize.saturating_sub(i * step) as u8;
            self.colors.push(Rgb::grey(v));
        }
    }
}

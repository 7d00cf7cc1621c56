//! QuickDraw 8x8 patterns and pixel patterns

use super::error::PictResult;
use super::pixmap::{Pixmap, PixmapLayout};
use super::stream::PictStream;
use super::types::Rgb;
use tracing::warn;

/// Side of a monochrome pattern cell
pub const PATTERN_SIZE: usize = 8;

/// Pixel pattern kinds stored in `PixPat` records
const PIXPAT_PIXMAP: u16 = 1;
const PIXPAT_RGB: u16 = 2;

/// Pattern slot contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// 8x8 bit cell, MSB first; set bits paint the foreground colour
    Mono([u8; PATTERN_SIZE]),
    /// Colour cell decoded from a pixel pattern
    Pixel {
        /// Monochrome fallback stored alongside the colour data
        mono: [u8; PATTERN_SIZE],
        width: usize,
        height: usize,
        colors: Vec<Rgb>,
    },
    /// Solid RGB pattern
    Solid {
        mono: [u8; PATTERN_SIZE],
        color: Rgb,
    },
}

/// Fully coloured pattern cell ready for tiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTile {
    pub width: usize,
    pub height: usize,
    /// Row-major pixels
    pub pixels: Vec<Rgb>,
}

impl PatternTile {
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        self.pixels.get(y * self.width + x).copied()
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Pattern {
    /// Every bit set
    pub const BLACK: Pattern = Pattern::Mono([0xFF; PATTERN_SIZE]);
    /// No bit set
    pub const WHITE: Pattern = Pattern::Mono([0x00; PATTERN_SIZE]);

    /// Implicit palette of a monochrome cell: clear bits first, set bits second
    pub const MONO_PALETTE: [Rgb; 2] = [Rgb::WHITE, Rgb::BLACK];

    /// Read an 8-byte monochrome pattern (`BkPat`, `PnPat`, `FillPat`).
    pub fn parse_mono(stream: &mut PictStream<'_>) -> PictResult<Self> {
        Ok(Self::Mono(read_cell(stream)?))
    }

    /// Read a `PixPat` record.
    ///
    /// A type 1 record carries a pixmap with its colour table; type 2 carries
    /// one RGB colour. Anything else only has the monochrome cell. A pixmap
    /// that is consumed but cannot be decoded degrades to the monochrome cell.
    pub fn parse_pix_pat(stream: &mut PictStream<'_>) -> PictResult<Self> {
        stream.check(2 + PATTERN_SIZE)?;
        let kind = stream.read_u16()?;
        let mono = read_cell(stream)?;
        match kind {
            PIXPAT_PIXMAP => {
                let row_bytes = stream.read_u16()?;
                let raw = Pixmap::read(stream, row_bytes, PixmapLayout::pattern())?;
                match raw.decode() {
                    Ok(pixmap) => {
                        let (width, height) = (pixmap.width(), pixmap.height());
                        let colors = (0..height)
                            .flat_map(|y| (0..width).map(move |x| (x, y)))
                            .map(|(x, y)| pixmap.color_at(x, y).unwrap_or(Rgb::BLACK))
                            .collect();
                        Ok(Self::Pixel {
                            mono,
                            width,
                            height,
                            colors,
                        })
                    },
                    Err(err) => {
                        warn!(%err, "pixel pattern falls back to its monochrome cell");
                        Ok(Self::Mono(mono))
                    },
                }
            },
            PIXPAT_RGB => Ok(Self::Solid {
                mono,
                color: stream.read_rgb()?,
            }),
            _ => Ok(Self::Mono(mono)),
        }
    }

    /// Whether the bit at (`x`, `y`) of the monochrome cell is set
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let cell = self.mono_cell();
        cell[y % PATTERN_SIZE] & (0x80 >> (x % PATTERN_SIZE)) != 0
    }

    pub fn mono_cell(&self) -> &[u8; PATTERN_SIZE] {
        match self {
            Self::Mono(cell) | Self::Pixel { mono: cell, .. } | Self::Solid { mono: cell, .. } => {
                cell
            },
        }
    }

    /// Colour the cell: monochrome bits map to `fg`/`bg`.
    pub fn tile(&self, fg: Rgb, bg: Rgb) -> PatternTile {
        match self {
            Self::Mono(_) => PatternTile {
                width: PATTERN_SIZE,
                height: PATTERN_SIZE,
                pixels: (0..PATTERN_SIZE * PATTERN_SIZE)
                    .map(|i| {
                        if self.is_set(i % PATTERN_SIZE, i / PATTERN_SIZE) {
                            fg
                        } else {
                            bg
                        }
                    })
                    .collect(),
            },
            Self::Pixel {
                width,
                height,
                colors,
                ..
            } => PatternTile {
                width: *width,
                height: *height,
                pixels: colors.clone(),
            },
            Self::Solid { color, .. } => PatternTile {
                width: 1,
                height: 1,
                pixels: vec![*color],
            },
        }
    }

    /// The single colour the pattern paints, if it paints only one
    pub fn uniform_color(&self, fg: Rgb, bg: Rgb) -> Option<Rgb> {
        match self {
            Self::Mono(cell) if cell.iter().all(|&b| b == 0xFF) => Some(fg),
            Self::Mono(cell) if cell.iter().all(|&b| b == 0x00) => Some(bg),
            Self::Mono(_) => None,
            Self::Pixel { colors, .. } => {
                let first = *colors.first()?;
                colors.iter().all(|&c| c == first).then_some(first)
            },
            Self::Solid { color, .. } => Some(*color),
        }
    }

    /// Mean colour of the cell
    pub fn average_color(&self, fg: Rgb, bg: Rgb) -> Rgb {
        let tile = self.tile(fg, bg);
        let count = tile.pixels.len().max(1) as u32;
        let (r, g, b) = tile.pixels.iter().fold((0u32, 0u32, 0u32), |(r, g, b), c| {
            (r + u32::from(c.r), g + u32::from(c.g), b + u32::from(c.b))
        });
        Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
    }

    /// A monochrome cell with every bit set, i.e. plain foreground
    pub fn is_solid_foreground(&self) -> bool {
        matches!(self, Self::Mono(cell) if cell.iter().all(|&b| b == 0xFF))
    }
}

fn read_cell(stream: &mut PictStream<'_>) -> PictResult<[u8; PATTERN_SIZE]> {
    let mut cell = [0u8; PATTERN_SIZE];
    cell.copy_from_slice(stream.read_bytes(PATTERN_SIZE)?);
    Ok(cell)
}

//! Common data types for the PICT format
//!
//! Rectangles and points keep QuickDraw's on-disk integer layout; values
//! handed to a [`PictSink`](super::sink::PictSink) use the floating point
//! [`Bounds`]/[`PointF`] forms, already shifted into page space.

use bitflags::bitflags;

/// PICT rectangle structure (big-endian `top, left, bottom, right`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PictRect {
    pub top: i16,
    pub left: i16,
    pub bottom: i16,
    pub right: i16,
}

impl PictRect {
    pub const fn new(top: i16, left: i16, bottom: i16, right: i16) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Get width of rectangle
    #[inline(always)]
    pub fn width(&self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }

    /// Get height of rectangle
    #[inline(always)]
    pub fn height(&self) -> i32 {
        i32::from(self.bottom) - i32::from(self.top)
    }

    /// Whether width and height are both strictly positive
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Inclusive containment test used by region scanlines
    #[inline]
    pub fn contains_inclusive(&self, x: i32, y: i32) -> bool {
        x >= i32::from(self.left)
            && x <= i32::from(self.right)
            && y >= i32::from(self.top)
            && y <= i32::from(self.bottom)
    }

    pub fn top_left(&self) -> Point {
        Point::new(i32::from(self.left), i32::from(self.top))
    }

    pub fn to_bounds(self) -> Bounds {
        Bounds::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }
}

/// Integer point in picture coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Point in page space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in page space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> PointF {
        PointF::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Smallest box holding every point, `None` when the iterator is empty
    pub fn from_points(points: impl IntoIterator<Item = PointF>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = Self::new(first.x, first.y, first.x, first.y);
        for p in it {
            b.left = b.left.min(p.x);
            b.top = b.top.min(p.y);
            b.right = b.right.max(p.x);
            b.bottom = b.bottom.max(p.y);
        }
        Some(b)
    }
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Map one of the eight classic QuickDraw colour constants
    pub fn from_old_color(value: u32) -> Option<Self> {
        match value {
            33 => Some(Self::BLACK),
            30 => Some(Self::WHITE),
            205 => Some(Self::new(0xDD, 0x08, 0x06)),
            341 => Some(Self::new(0x00, 0x80, 0x11)),
            409 => Some(Self::new(0x00, 0x00, 0xD4)),
            273 => Some(Self::new(0x02, 0xAB, 0xEA)),
            137 => Some(Self::new(0xF2, 0x08, 0x84)),
            69 => Some(Self::new(0xFC, 0xF3, 0x05)),
            _ => None,
        }
    }
}

bitflags! {
    /// QuickDraw text face (`TxFace`) bits
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct FontStyle: u8 {
        const BOLD = 0x01;
        const ITALIC = 0x02;
        const UNDERLINE = 0x04;
        const OUTLINE = 0x08;
        const SHADOW = 0x10;
        const CONDENSE = 0x20;
        const EXTEND = 0x40;
    }
}

//! Output side of the interpreter
//!
//! [`PictSink`] receives decoded primitives in page coordinates. The
//! [`EventRecorder`] sink keeps them as an ordered [`DrawEvent`] list.

use super::opcode::DrawMethod;
use super::pattern::PatternTile;
use super::region::Region;
use super::types::{Bounds, FontStyle, PictRect, PointF, Rgb};

/// Interior of a shape
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Fill {
    #[default]
    None,
    Solid(Rgb),
    /// Tiled cell plus its mean colour for sinks that cannot tile
    Pattern { tile: PatternTile, average: Rgb },
}

impl Fill {
    /// Single colour approximating the fill
    pub fn color(&self) -> Option<Rgb> {
        match self {
            Fill::None => None,
            Fill::Solid(c) => Some(*c),
            Fill::Pattern { average, .. } => Some(*average),
        }
    }
}

/// Resolved drawing style of one primitive
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub method: DrawMethod,
    pub line_color: Option<Rgb>,
    pub line_width: f64,
    pub fill: Fill,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            method: DrawMethod::Undefined,
            line_color: Some(Rgb::BLACK),
            line_width: 1.0,
            fill: Fill::None,
        }
    }
}

/// Shape family tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Rect,
    RoundRect,
    Oval,
    Arc,
    Pie,
    Polygon,
    Region,
}

/// Shape geometry in page coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: PointF,
        to: PointF,
    },
    Rect(Bounds),
    RoundRect {
        bounds: Bounds,
        /// Corner oval radii
        radius: PointF,
    },
    Oval(Bounds),
    /// Open arc; angles counter-clockwise from 3 o'clock
    Arc {
        oval: Bounds,
        start_angle: f64,
        end_angle: f64,
        bounds: Bounds,
    },
    /// Closed wedge
    Pie {
        oval: Bounds,
        start_angle: f64,
        end_angle: f64,
        bounds: Bounds,
    },
    Polygon {
        points: Vec<PointF>,
    },
    Region {
        bounds: Bounds,
        /// Inversion points of the scanline encoding
        points: Vec<PointF>,
    },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line { .. } => ShapeKind::Line,
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::RoundRect { .. } => ShapeKind::RoundRect,
            Shape::Oval(_) => ShapeKind::Oval,
            Shape::Arc { .. } => ShapeKind::Arc,
            Shape::Pie { .. } => ShapeKind::Pie,
            Shape::Polygon { .. } => ShapeKind::Polygon,
            Shape::Region { .. } => ShapeKind::Region,
        }
    }

    /// Extent of the drawn geometry
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Line { from, to } => {
                Bounds::from_points([*from, *to]).unwrap_or_default()
            },
            Shape::Rect(b) | Shape::Oval(b) => *b,
            Shape::RoundRect { bounds, .. }
            | Shape::Arc { bounds, .. }
            | Shape::Pie { bounds, .. }
            | Shape::Region { bounds, .. } => *bounds,
            Shape::Polygon { points } => {
                Bounds::from_points(points.iter().copied()).unwrap_or_default()
            },
        }
    }
}

/// Font selection sent before text
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    pub id: u16,
    /// Name from a `FontName` record, when one was seen for `id`
    pub name: Option<String>,
    pub size: u16,
    pub style: FontStyle,
    pub color: Rgb,
}

/// One run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Baseline origin
    pub position: PointF,
}

/// Raster format tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RasterFormat {
    Mono,
    Indexed,
    Rgb,
    Jpeg,
}

/// Decoded raster payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterData {
    /// 1 bit per pixel, MSB first; clear bits use `palette[0]`
    Mono {
        width: usize,
        height: usize,
        row_bytes: usize,
        bits: Vec<u8>,
        palette: [Rgb; 2],
    },
    /// One palette index per pixel
    Indexed {
        width: usize,
        height: usize,
        indices: Vec<u8>,
        palette: Vec<Rgb>,
    },
    /// One colour per pixel
    Rgb {
        width: usize,
        height: usize,
        pixels: Vec<Rgb>,
    },
    /// Compressed JPEG stream
    Jpeg(Vec<u8>),
}

impl RasterData {
    pub fn format(&self) -> RasterFormat {
        match self {
            RasterData::Mono { .. } => RasterFormat::Mono,
            RasterData::Indexed { .. } => RasterFormat::Indexed,
            RasterData::Rgb { .. } => RasterFormat::Rgb,
            RasterData::Jpeg(_) => RasterFormat::Jpeg,
        }
    }

    /// Pixel dimensions, unknown for compressed data
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        match self {
            RasterData::Mono { width, height, .. }
            | RasterData::Indexed { width, height, .. }
            | RasterData::Rgb { width, height, .. } => Some((*width, *height)),
            RasterData::Jpeg(_) => None,
        }
    }

    /// Colour of the pixel at (`x`, `y`)
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        match self {
            RasterData::Mono {
                row_bytes,
                bits,
                palette,
                ..
            } => {
                let byte = bits.get(y * row_bytes + x / 8)?;
                Some(palette[usize::from(byte & (0x80 >> (x % 8)) != 0)])
            },
            RasterData::Indexed {
                width,
                indices,
                palette,
                ..
            } => palette.get(usize::from(*indices.get(y * width + x)?)).copied(),
            RasterData::Rgb { width, pixels, .. } => pixels.get(y * width + x).copied(),
            RasterData::Jpeg(_) => None,
        }
    }
}

/// Raster record placed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub data: RasterData,
    /// Destination box in page coordinates
    pub placement: Bounds,
    /// Part of the source pixels to draw, in the record's own coordinates
    pub src_rect: Option<PictRect>,
    /// QuickDraw transfer mode
    pub mode: u16,
    /// Mask region in picture coordinates
    pub mask: Option<Region>,
}

/// Receiver of decoded drawing primitives.
///
/// All geometry is already shifted into page space.
pub trait PictSink {
    fn begin_document(&mut self, page: Bounds);

    fn set_style(&mut self, style: &Style);

    fn set_font(&mut self, font: &FontInfo);

    fn draw_shape(&mut self, shape: &Shape, style: &Style);

    fn draw_text(&mut self, run: &TextRun, style: &Style);

    fn draw_raster(&mut self, image: &RasterImage);

    /// Picture comment (`ShortComment` has no data)
    fn comment(&mut self, _kind: u16, _data: &[u8]) {}
}

/// Recorded sink call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    BeginDocument { page: Bounds },
    SetStyle(Style),
    SetFont(FontInfo),
    Shape { shape: Shape, style: Style },
    Text { run: TextRun, style: Style },
    Raster(RasterImage),
    Comment { kind: u16, data: Vec<u8> },
}

impl DrawEvent {
    /// Shapes, text and rasters; everything else only sets context
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            DrawEvent::Shape { .. } | DrawEvent::Text { .. } | DrawEvent::Raster(_)
        )
    }
}

/// Sink that records every call in order
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    pub events: Vec<DrawEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_events(self) -> Vec<DrawEvent> {
        self.events
    }

    pub fn primitives(&self) -> impl Iterator<Item = &DrawEvent> {
        self.events.iter().filter(|e| e.is_primitive())
    }
}

impl PictSink for EventRecorder {
    fn begin_document(&mut self, page: Bounds) {
        self.events.push(DrawEvent::BeginDocument { page });
    }

    fn set_style(&mut self, style: &Style) {
        self.events.push(DrawEvent::SetStyle(style.clone()));
    }

    fn set_font(&mut self, font: &FontInfo) {
        self.events.push(DrawEvent::SetFont(font.clone()));
    }

    fn draw_shape(&mut self, shape: &Shape, style: &Style) {
        self.events.push(DrawEvent::Shape {
            shape: shape.clone(),
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, run: &TextRun, style: &Style) {
        self.events.push(DrawEvent::Text {
            run: run.clone(),
            style: style.clone(),
        });
    }

    fn draw_raster(&mut self, image: &RasterImage) {
        self.events.push(DrawEvent::Raster(image.clone()));
    }

    fn comment(&mut self, kind: u16, data: &[u8]) {
        self.events.push(DrawEvent::Comment {
            kind,
            data: data.to_vec(),
        });
    }
}

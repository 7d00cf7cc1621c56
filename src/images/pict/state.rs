//! Drawing state threaded through the opcode handlers

use std::collections::HashMap;

use super::error::{PictError, PictResult};
use super::opcode::DrawMethod;
use super::parser::PictVersion;
use super::pattern::Pattern;
use super::region::Region;
use super::sink::{Fill, FontInfo, Style};
use super::stream::PictStream;
use super::types::{Bounds, FontStyle, PictRect, Point, PointF, Rgb};

/// Pen and text mode that hands drawing to a PostScript printer
pub const POSTSCRIPT_MODE: u16 = 23;

/// `patCopy`
pub const DEFAULT_PEN_MODE: u16 = 8;

/// `srcOr`
pub const DEFAULT_TEXT_MODE: u16 = 1;

/// Highlight colour after `DefHilite`
pub const DEFAULT_HILITE_COLOR: Rgb = Rgb::BLACK;

/// Size used when a picture never sets one
pub const DEFAULT_FONT_SIZE: u16 = 12;

/// Shape families with a "same" opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    Rect,
    RRect,
    Oval,
    Arc,
    Poly,
    Region,
}

impl ShapeFamily {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

/// Polygon record: bounding box and vertices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polygon {
    pub bbox: PictRect,
    pub points: Vec<Point>,
}

impl Polygon {
    const HEADER_SIZE: usize = 10;

    /// Parse `polySize`, `polyBBox` and `(polySize - 10) / 4` points.
    ///
    /// A record shorter than its header is skipped and reported as
    /// [`PictError::MalformedGeometry`].
    pub fn parse(stream: &mut PictStream<'_>) -> PictResult<Self> {
        let start = stream.pos();
        let size = stream.read_u16()? as usize;
        if size < Self::HEADER_SIZE {
            if let Err(e) = stream.skip(size.saturating_sub(2)) {
                stream.seek(start)?;
                return Err(e);
            }
            return Err(PictError::MalformedGeometry(format!(
                "polygon size {}",
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
        let mut points = Vec::with_capacity(stream.remaining() / 4);
        while stream.remaining() >= 4 {
            points.push(stream.read_point()?);
        }
        stream.restore_limit(old_end);
        Ok(Self { bbox, points })
    }
}

/// Operands of the most recent shape in one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeGeometry {
    Rect(PictRect),
    RRect(PictRect),
    Oval(PictRect),
    Arc {
        rect: PictRect,
        start: i16,
        delta: i16,
    },
    Poly(Polygon),
    Region(Region),
}

impl ShapeGeometry {
    pub fn family(&self) -> ShapeFamily {
        match self {
            ShapeGeometry::Rect(_) => ShapeFamily::Rect,
            ShapeGeometry::RRect(_) => ShapeFamily::RRect,
            ShapeGeometry::Oval(_) => ShapeFamily::Oval,
            ShapeGeometry::Arc { .. } => ShapeFamily::Arc,
            ShapeGeometry::Poly(_) => ShapeFamily::Poly,
            ShapeGeometry::Region(_) => ShapeFamily::Region,
        }
    }
}

/// One remembered geometry per family, for the "same" opcodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastShapes {
    slots: [Option<ShapeGeometry>; ShapeFamily::COUNT],
}

impl LastShapes {
    pub fn remember(&mut self, geometry: ShapeGeometry) {
        let slot = geometry.family().index();
        self.slots[slot] = Some(geometry);
    }

    pub fn last(&self, family: ShapeFamily) -> Option<&ShapeGeometry> {
        self.slots[family.index()].as_ref()
    }
}

/// Text settings
#[derive(Debug, Clone, PartialEq)]
pub struct FontState {
    pub id: u16,
    pub size: u16,
    pub style: FontStyle,
    /// Extra width for space characters (`SpExtra`)
    pub space_extra: f64,
    /// Extra width for every character (`ChExtra`)
    pub char_extra: i16,
    /// `TxRatio` numerator and denominator
    pub ratio: (Point, Point),
}

impl Default for FontState {
    fn default() -> Self {
        Self {
            id: 0,
            size: DEFAULT_FONT_SIZE,
            style: FontStyle::empty(),
            space_extra: 0.0,
            char_extra: 0,
            ratio: (Point::new(1, 1), Point::new(1, 1)),
        }
    }
}

/// Mutable state of one picture
#[derive(Debug, Clone)]
pub struct DrawingState {
    pub version: PictVersion,
    pub frame: PictRect,
    pub page_origin: Point,
    /// Accumulated `Origin` offset
    pub origin: Point,
    pub pen_pos: Point,
    pub pen_size: Point,
    pub oval_size: Point,
    pub pen_mode: u16,
    pub text_mode: u16,
    pub hilite: bool,
    pub font: FontState,
    pub font_names: HashMap<u16, String>,
    pub fg_color: Rgb,
    pub bg_color: Rgb,
    pub hilite_color: Rgb,
    pub op_color: Rgb,
    pub pen_pattern: Pattern,
    pub bg_pattern: Pattern,
    pub fill_pattern: Pattern,
    pub last_shapes: LastShapes,
    pub text_pos: Point,
    pub clip: Option<Region>,
}

impl DrawingState {
    pub fn new(version: PictVersion, frame: PictRect, page_origin: Point) -> Self {
        Self {
            version,
            frame,
            page_origin,
            origin: Point::default(),
            pen_pos: Point::default(),
            pen_size: Point::new(1, 1),
            oval_size: Point::default(),
            pen_mode: DEFAULT_PEN_MODE,
            text_mode: DEFAULT_TEXT_MODE,
            hilite: false,
            font: FontState::default(),
            font_names: HashMap::new(),
            fg_color: Rgb::BLACK,
            bg_color: Rgb::WHITE,
            hilite_color: DEFAULT_HILITE_COLOR,
            op_color: Rgb::BLACK,
            pen_pattern: Pattern::BLACK,
            bg_pattern: Pattern::WHITE,
            fill_pattern: Pattern::BLACK,
            last_shapes: LastShapes::default(),
            text_pos: Point::default(),
            clip: None,
        }
    }

    /// Page size at the page origin
    pub fn page(&self) -> Bounds {
        let (x, y) = (f64::from(self.page_origin.x), f64::from(self.page_origin.y));
        Bounds::new(
            x,
            y,
            x + f64::from(self.frame.width()),
            y + f64::from(self.frame.height()),
        )
    }

    /// Picture coordinates to page coordinates
    pub fn to_page(&self, p: Point) -> PointF {
        let top_left = self.frame.top_left();
        let shift = |v: i32, origin: i32, corner: i32, page: i32| {
            f64::from(v) - f64::from(origin) - f64::from(corner) + f64::from(page)
        };
        PointF::new(
            shift(p.x, self.origin.x, top_left.x, self.page_origin.x),
            shift(p.y, self.origin.y, top_left.y, self.page_origin.y),
        )
    }

    pub fn rect_to_page(&self, rect: &PictRect) -> Bounds {
        let a = self.to_page(Point::new(i32::from(rect.left), i32::from(rect.top)));
        let b = self.to_page(Point::new(i32::from(rect.right), i32::from(rect.bottom)));
        Bounds::new(a.x, a.y, b.x, b.y)
    }

    /// Whether a primitive drawn with `method` leaves a mark
    pub fn is_visible(&self, method: DrawMethod) -> bool {
        match method {
            DrawMethod::Invert => false,
            DrawMethod::Text => self.text_mode != POSTSCRIPT_MODE,
            DrawMethod::Frame => {
                self.pen_mode != POSTSCRIPT_MODE && self.pen_size.x != 0 && self.pen_size.y != 0
            },
            _ => self.pen_mode != POSTSCRIPT_MODE,
        }
    }

    /// Foreground, or the pen pattern's mean colour when it is not plain foreground
    fn pen_color(&self) -> Rgb {
        if self.pen_pattern.is_solid_foreground() {
            self.fg_color
        } else {
            self.pen_pattern.average_color(self.fg_color, self.bg_color)
        }
    }

    fn pattern_fill(&self, pattern: &Pattern) -> Fill {
        match pattern.uniform_color(self.fg_color, self.bg_color) {
            Some(color) => Fill::Solid(color),
            None => Fill::Pattern {
                tile: pattern.tile(self.fg_color, self.bg_color),
                average: pattern.average_color(self.fg_color, self.bg_color),
            },
        }
    }

    /// Resolve the style of a primitive drawn with `method`
    pub fn style(&self, method: DrawMethod) -> Style {
        let (line_color, line_width, fill) = match method {
            DrawMethod::Frame => (
                Some(self.pen_color()),
                f64::from(self.pen_size.x + self.pen_size.y) / 2.0,
                Fill::None,
            ),
            DrawMethod::Paint => (None, 0.0, self.pattern_fill(&self.pen_pattern)),
            DrawMethod::Fill => (None, 0.0, self.pattern_fill(&self.fill_pattern)),
            DrawMethod::Erase => (None, 0.0, self.pattern_fill(&self.bg_pattern)),
            DrawMethod::Text | DrawMethod::Invert | DrawMethod::Undefined => {
                (Some(self.pen_color()), 0.0, Fill::None)
            },
        };
        Style {
            method,
            line_color,
            line_width,
            fill,
        }
    }

    pub fn font_info(&self) -> FontInfo {
        FontInfo {
            id: self.font.id,
            name: self.font_names.get(&self.font.id).cloned(),
            size: self.font.size,
            style: self.font.style,
            color: self.pen_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DrawingState {
        DrawingState::new(PictVersion::V2, PictRect::new(10, 20, 110, 220), Point::new(5, 5))
    }

    #[test]
    fn test_page_shift() {
        let mut st = state();
        assert_eq!(st.to_page(Point::new(20, 10)), PointF::new(5.0, 5.0));
        st.origin = Point::new(3, -2);
        assert_eq!(st.to_page(Point::new(20, 10)), PointF::new(2.0, 7.0));
        assert_eq!(st.page(), Bounds::new(5.0, 5.0, 205.0, 105.0));
    }

    #[test]
    fn test_visibility_rules() {
        let mut st = state();
        assert!(st.is_visible(DrawMethod::Frame));
        assert!(!st.is_visible(DrawMethod::Invert));

        st.pen_size = Point::new(0, 1);
        assert!(!st.is_visible(DrawMethod::Frame));
        assert!(st.is_visible(DrawMethod::Paint));

        st.pen_mode = POSTSCRIPT_MODE;
        assert!(!st.is_visible(DrawMethod::Paint));
        assert!(st.is_visible(DrawMethod::Text));

        st.text_mode = POSTSCRIPT_MODE;
        assert!(!st.is_visible(DrawMethod::Text));
    }

    #[test]
    fn test_frame_style() {
        let mut st = state();
        st.pen_size = Point::new(2, 4);
        st.fg_color = Rgb::new(1, 2, 3);
        let style = st.style(DrawMethod::Frame);
        assert_eq!(style.line_color, Some(Rgb::new(1, 2, 3)));
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.fill, Fill::None);

        st.pen_pattern = Pattern::Mono([0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55]);
        st.fg_color = Rgb::BLACK;
        assert_eq!(st.style(DrawMethod::Frame).line_color, Some(Rgb::grey(127)));
        assert_eq!(st.style(DrawMethod::Text).line_width, 0.0);
    }

    #[test]
    fn test_fill_styles() {
        let mut st = state();
        assert_eq!(st.style(DrawMethod::Paint).fill, Fill::Solid(Rgb::BLACK));
        assert_eq!(st.style(DrawMethod::Erase).fill, Fill::Solid(Rgb::WHITE));

        st.fill_pattern = Pattern::Mono([0xF0; 8]);
        let Fill::Pattern { tile, average } = st.style(DrawMethod::Fill).fill else {
            panic!("expected a pattern fill");
        };
        assert_eq!(tile.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(tile.pixel(7, 0), Some(Rgb::WHITE));
        assert_eq!(average, Rgb::grey(127));
    }

    #[test]
    fn test_last_shapes_per_family() {
        let mut last = LastShapes::default();
        last.remember(ShapeGeometry::Rect(PictRect::new(0, 0, 1, 1)));
        last.remember(ShapeGeometry::Oval(PictRect::new(0, 0, 2, 2)));
        last.remember(ShapeGeometry::Rect(PictRect::new(0, 0, 3, 3)));
        assert_eq!(
            last.last(ShapeFamily::Rect),
            Some(&ShapeGeometry::Rect(PictRect::new(0, 0, 3, 3)))
        );
        assert_eq!(
            last.last(ShapeFamily::Oval),
            Some(&ShapeGeometry::Oval(PictRect::new(0, 0, 2, 2)))
        );
        assert_eq!(last.last(ShapeFamily::Arc), None);
    }

    #[test]
    fn test_polygon_parse() {
        let mut data = 18u16.to_be_bytes().to_vec();
        for v in [0i16, 0, 10, 10, 0, 0, 10, 5] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        let mut s = PictStream::new(&data);
        let poly = Polygon::parse(&mut s).unwrap();
        assert_eq!(poly.bbox, PictRect::new(0, 0, 10, 10));
        assert_eq!(poly.points, vec![Point::new(0, 0), Point::new(5, 10)]);
        assert!(s.is_at_end());
    }

    #[test]
    fn test_short_polygon_is_skipped() {
        let data = [0x00, 0x06, 1, 2, 3, 4, 0xFF];
        let mut s = PictStream::new(&data);
        assert!(matches!(
            Polygon::parse(&mut s),
            Err(PictError::MalformedGeometry(_))
        ));
        assert_eq!(s.pos(), 6);
    }
}

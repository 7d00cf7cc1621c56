//! Minimal PICT to SVG converter
//!
//! [`SvgSink`] is a [`PictSink`] that writes compact SVG: one line, no
//! metadata, only non-default attributes. The picture frame is scaled to fit
//! [`SvgOptions::max_width`] x [`SvgOptions::max_height`] keeping its aspect
//! ratio.
//!
//! | Primitive | Element |
//! |-----------|---------|
//! | line | `<line>` |
//! | rect, round rect | `<rect>` |
//! | oval | `<ellipse>` |
//! | arc, pie, region | `<path>` |
//! | polygon | `<polygon>` (filled) or `<polyline>` (framed) |
//! | text | `<text>` |
//! | raster | `<image>` with a data URL (feature `imgconv`) |
//!
//! Pattern fills are drawn with their mean colour.
//!
//! # Example
//!
//! ```no_run
//! use quickpict::images::pict::convert_pict_to_svg;
//!
//! let data = std::fs::read("drawing.pict")?;
//! let svg = convert_pict_to_svg(&data)?;
//! std::fs::write("drawing.svg", svg)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::geometry::{point_on_oval, region_spans};
use super::opcode::DrawMethod;
use super::parser::{ParseOptions, PictParser};
use super::sink::{Fill, FontInfo, PictSink, RasterImage, Shape, Style, TextRun};
use super::types::{Bounds, FontStyle, PointF, Rgb};
use crate::common::error::Result;
use crate::images::svg_utils::{
    write_color_hex, write_num, write_num_attr, write_stroke_attrs, write_xml_escaped,
};
use tracing::debug;

/// SVG output options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub max_width: f64,
    pub max_height: f64,
    /// Embed raster records as data URLs
    pub embed_rasters: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            max_width: 768.0,
            max_height: 512.0,
            embed_rasters: true,
        }
    }
}

/// Page coordinates to SVG user units
#[derive(Debug, Clone, Copy)]
struct Transform {
    left: f64,
    top: f64,
    sx: f64,
    sy: f64,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        left: 0.0,
        top: 0.0,
        sx: 1.0,
        sy: 1.0,
    };

    fn new(page: &Bounds, width: f64, height: f64) -> Self {
        let (pw, ph) = (page.width().abs(), page.height().abs());
        Self {
            left: page.left.min(page.right),
            top: page.top.min(page.bottom),
            sx: if pw > 0.0 { width / pw } else { 1.0 },
            sy: if ph > 0.0 { height / ph } else { 1.0 },
        }
    }

    #[inline]
    fn point(&self, p: PointF) -> (f64, f64) {
        ((p.x - self.left) * self.sx, (p.y - self.top) * self.sy)
    }

    #[inline]
    fn bounds(&self, b: &Bounds) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.point(PointF::new(b.left.min(b.right), b.top.min(b.bottom)));
        (
            x0,
            y0,
            b.width().abs() * self.sx,
            b.height().abs() * self.sy,
        )
    }

    /// Scale a length that has no direction (pen width, font size)
    #[inline]
    fn len(&self, v: f64) -> f64 {
        v * (self.sx + self.sy) / 2.0
    }
}

/// Fit `page` into the max box keeping its aspect ratio
fn fit(page: &Bounds, options: &SvgOptions) -> (f64, f64) {
    let (w, h) = (page.width().abs(), page.height().abs());
    if w == 0.0 || h == 0.0 {
        return (options.max_width, options.max_height);
    }
    let ratio = h / w;
    if ratio > options.max_height / options.max_width {
        (options.max_height / ratio, options.max_height)
    } else {
        (options.max_width, options.max_width * ratio)
    }
}

/// Generic CSS family for the classic Macintosh font numbers
fn generic_family(id: u16) -> Option<&'static str> {
    match id {
        2 | 20 => Some("serif"),
        0 | 1 | 3 | 21 => Some("sans-serif"),
        4 | 22 => Some("monospace"),
        _ => None,
    }
}

/// Sink writing an SVG document
#[derive(Debug, Clone)]
pub struct SvgSink {
    options: SvgOptions,
    out: String,
    transform: Transform,
    font: Option<FontInfo>,
    started: bool,
}

impl SvgSink {
    pub fn new(options: SvgOptions) -> Self {
        Self {
            options,
            out: String::with_capacity(4096),
            transform: Transform::IDENTITY,
            font: None,
            started: false,
        }
    }

    /// Close the document and return it
    pub fn finish(mut self) -> String {
        if !self.started {
            self.write_header(self.options.max_width, self.options.max_height);
        }
        self.out.push_str("</svg>");
        self.out
    }

    fn write_header(&mut self, width: f64, height: f64) {
        self.started = true;
        self.out.push_str("<svg");
        write_num_attr(&mut self.out, "width", width);
        write_num_attr(&mut self.out, "height", height);
        self.out.push_str(r#" viewBox="0 0 "#);
        write_num(&mut self.out, width);
        self.out.push(' ');
        write_num(&mut self.out, height);
        self.out.push_str(r#"" xmlns="http://www.w3.org/2000/svg">"#);
    }

    fn write_point(&mut self, p: PointF) {
        let (x, y) = self.transform.point(p);
        write_num(&mut self.out, x);
        self.out.push(' ');
        write_num(&mut self.out, y);
    }

    /// Fill and stroke attributes, then close the element
    fn write_paint(&mut self, style: &Style) {
        match style.fill.color() {
            Some(Rgb::BLACK) => {},
            Some(color) => {
                self.out.push_str(" fill=\"");
                write_color_hex(&mut self.out, color);
                self.out.push('"');
            },
            None => self.out.push_str(r#" fill="none""#),
        }
        if style.fill == Fill::None {
            if let Some(color) = style.line_color {
                let width = self.transform.len(style.line_width);
                write_stroke_attrs(&mut self.out, color, width);
            }
        }
        self.out.push_str("/>");
    }

    fn write_rect(&mut self, bounds: &Bounds, radius: Option<PointF>, style: &Style) {
        let (x, y, w, h) = self.transform.bounds(bounds);
        self.out.push_str("<rect");
        write_num_attr(&mut self.out, "x", x);
        write_num_attr(&mut self.out, "y", y);
        write_num_attr(&mut self.out, "width", w);
        write_num_attr(&mut self.out, "height", h);
        if let Some(r) = radius {
            if r.x > 0.0 && r.y > 0.0 {
                write_num_attr(&mut self.out, "rx", r.x * self.transform.sx);
                write_num_attr(&mut self.out, "ry", r.y * self.transform.sy);
            }
        }
        self.write_paint(style);
    }

    fn write_ellipse(&mut self, oval: &Bounds, style: &Style) {
        let (x, y, w, h) = self.transform.bounds(oval);
        self.out.push_str("<ellipse");
        write_num_attr(&mut self.out, "cx", x + w / 2.0);
        write_num_attr(&mut self.out, "cy", y + h / 2.0);
        write_num_attr(&mut self.out, "rx", w / 2.0);
        write_num_attr(&mut self.out, "ry", h / 2.0);
        self.write_paint(style);
    }

    /// Arc or wedge, counter-clockwise from `angle0` to `angle1`
    fn write_arc(&mut self, oval: &Bounds, angle0: f64, angle1: f64, pie: bool, style: &Style) {
        if angle1 - angle0 >= 360.0 {
            self.write_ellipse(oval, style);
            return;
        }
        let rx = oval.width().abs() / 2.0 * self.transform.sx;
        let ry = oval.height().abs() / 2.0 * self.transform.sy;
        let large_arc = angle1 - angle0 > 180.0;

        self.out.push_str(r#"<path d="M"#);
        if pie {
            self.write_point(oval.center());
            self.out.push('L');
        }
        self.write_point(point_on_oval(oval, angle0));
        self.out.push('A');
        write_num(&mut self.out, rx);
        self.out.push(' ');
        write_num(&mut self.out, ry);
        self.out.push_str(if large_arc { " 0 1 0 " } else { " 0 0 0 " });
        self.write_point(point_on_oval(oval, angle1));
        if pie {
            self.out.push('Z');
        }
        self.out.push('"');
        self.write_paint(style);
    }

    fn write_poly(&mut self, points: &[PointF], style: &Style) {
        if points.is_empty() {
            return;
        }
        let element = if style.method == DrawMethod::Frame {
            "polyline"
        } else {
            "polygon"
        };
        self.out.push('<');
        self.out.push_str(element);
        self.out.push_str(r#" points=""#);
        for (i, &p) in points.iter().enumerate() {
            if i > 0 {
                self.out.push(' ');
            }
            let (x, y) = self.transform.point(p);
            write_num(&mut self.out, x);
            self.out.push(',');
            write_num(&mut self.out, y);
        }
        self.out.push('"');
        self.write_paint(style);
    }

    fn write_region(&mut self, bounds: &Bounds, points: &[PointF], style: &Style) {
        let spans = region_spans(points);
        if spans.is_empty() {
            self.write_rect(bounds, None, style);
            return;
        }
        self.out.push_str(r#"<path d=""#);
        for span in &spans {
            let (x, y, w, h) = self.transform.bounds(span);
            self.out.push('M');
            write_num(&mut self.out, x);
            self.out.push(' ');
            write_num(&mut self.out, y);
            self.out.push('h');
            write_num(&mut self.out, w);
            self.out.push('v');
            write_num(&mut self.out, h);
            self.out.push('h');
            write_num(&mut self.out, -w);
            self.out.push('Z');
        }
        self.out.push('"');
        self.write_paint(style);
    }

    #[cfg(feature = "imgconv")]
    fn write_image_href(&mut self, image: &RasterImage) -> bool {
        use super::converter::convert_raster_to_png;
        use super::sink::RasterData;
        use base64::Engine;

        let engine = base64::engine::general_purpose::STANDARD;
        match &image.data {
            RasterData::Jpeg(jpeg) => {
                self.out.push_str(r#" href="data:image/jpeg;base64,"#);
                engine.encode_string(jpeg, &mut self.out);
            },
            _ => match convert_raster_to_png(image) {
                Ok(png) => {
                    self.out.push_str(r#" href="data:image/png;base64,"#);
                    engine.encode_string(&png, &mut self.out);
                },
                Err(err) => {
                    debug!(%err, "raster not embedded");
                    return false;
                },
            },
        }
        self.out.push('"');
        true
    }

    #[cfg(not(feature = "imgconv"))]
    fn write_image_href(&mut self, _image: &RasterImage) -> bool {
        debug!("raster embedding needs the imgconv feature");
        false
    }
}

impl Default for SvgSink {
    fn default() -> Self {
        Self::new(SvgOptions::default())
    }
}

impl PictSink for SvgSink {
    fn begin_document(&mut self, page: Bounds) {
        let (width, height) = fit(&page, &self.options);
        self.transform = Transform::new(&page, width, height);
        self.write_header(width, height);
    }

    fn set_style(&mut self, _style: &Style) {}

    fn set_font(&mut self, font: &FontInfo) {
        self.font = Some(font.clone());
    }

    fn draw_shape(&mut self, shape: &Shape, style: &Style) {
        match shape {
            Shape::Line { from, to } => {
                let (x1, y1) = self.transform.point(*from);
                let (x2, y2) = self.transform.point(*to);
                self.out.push_str("<line");
                write_num_attr(&mut self.out, "x1", x1);
                write_num_attr(&mut self.out, "y1", y1);
                write_num_attr(&mut self.out, "x2", x2);
                write_num_attr(&mut self.out, "y2", y2);
                let color = style.line_color.unwrap_or(Rgb::BLACK);
                let width = self.transform.len(style.line_width);
                write_stroke_attrs(&mut self.out, color, width);
                self.out.push_str("/>");
            },
            Shape::Rect(bounds) => self.write_rect(bounds, None, style),
            Shape::RoundRect { bounds, radius } => self.write_rect(bounds, Some(*radius), style),
            Shape::Oval(oval) => self.write_ellipse(oval, style),
            Shape::Arc {
                oval,
                start_angle,
                end_angle,
                ..
            } => self.write_arc(oval, *start_angle, *end_angle, false, style),
            Shape::Pie {
                oval,
                start_angle,
                end_angle,
                ..
            } => self.write_arc(oval, *start_angle, *end_angle, true, style),
            Shape::Polygon { points } => self.write_poly(points, style),
            Shape::Region { bounds, points } => self.write_region(bounds, points, style),
        }
    }

    fn draw_text(&mut self, run: &TextRun, _style: &Style) {
        if run.text.is_empty() {
            return;
        }
        let (x, y) = self.transform.point(run.position);
        self.out.push_str("<text");
        write_num_attr(&mut self.out, "x", x);
        write_num_attr(&mut self.out, "y", y);

        let font = self.font.clone().unwrap_or(FontInfo {
            id: 0,
            name: None,
            size: super::state::DEFAULT_FONT_SIZE,
            style: FontStyle::empty(),
            color: Rgb::BLACK,
        });
        let family = font.name.as_deref().or_else(|| generic_family(font.id));
        if let Some(family) = family {
            self.out.push_str(r#" font-family=""#);
            write_xml_escaped(&mut self.out, family);
            self.out.push('"');
        }
        let size = if font.size == 0 {
            super::state::DEFAULT_FONT_SIZE
        } else {
            font.size
        };
        write_num_attr(&mut self.out, "font-size", self.transform.len(f64::from(size)));
        if font.style.contains(FontStyle::BOLD) {
            self.out.push_str(r#" font-weight="bold""#);
        }
        if font.style.contains(FontStyle::ITALIC) {
            self.out.push_str(r#" font-style="italic""#);
        }
        if font.style.contains(FontStyle::UNDERLINE) {
            self.out.push_str(r#" text-decoration="underline""#);
        }
        if font.color != Rgb::BLACK {
            self.out.push_str(" fill=\"");
            write_color_hex(&mut self.out, font.color);
            self.out.push('"');
        }
        self.out.push('>');
        write_xml_escaped(&mut self.out, &run.text);
        self.out.push_str("</text>");
    }

    fn draw_raster(&mut self, image: &RasterImage) {
        if !self.options.embed_rasters {
            return;
        }
        let mark = self.out.len();
        let (x, y, w, h) = self.transform.bounds(&image.placement);
        self.out.push_str("<image");
        write_num_attr(&mut self.out, "x", x);
        write_num_attr(&mut self.out, "y", y);
        write_num_attr(&mut self.out, "width", w);
        write_num_attr(&mut self.out, "height", h);
        self.out.push_str(r#" preserveAspectRatio="none""#);
        if self.write_image_href(image) {
            self.out.push_str("/>");
        } else {
            self.out.truncate(mark);
        }
    }
}

/// Convert a PICT picture to SVG with default options
pub fn convert_pict_to_svg(data: &[u8]) -> Result<String> {
    convert_pict_to_svg_with(data, ParseOptions::default(), SvgOptions::default())
}

/// Convert a PICT picture to SVG
pub fn convert_pict_to_svg_with(
    data: &[u8],
    parse_options: ParseOptions,
    svg_options: SvgOptions,
) -> Result<String> {
    let mut parser = PictParser::new(data, parse_options)?;
    let mut sink = SvgSink::new(svg_options);
    let summary = parser.run(&mut sink)?;
    debug!(
        opcodes = summary.opcodes,
        skipped = summary.skipped_records,
        stopped_early = summary.stopped_early,
        "PICT converted to SVG"
    );
    Ok(sink.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use crate::images::pict::PictError;

    fn sink() -> SvgSink {
        let mut sink = SvgSink::new(SvgOptions {
            max_width: 100.0,
            max_height: 100.0,
            embed_rasters: true,
        });
        sink.begin_document(Bounds::new(0.0, 0.0, 100.0, 100.0));
        sink
    }

    fn style(method: DrawMethod, fill: Fill) -> Style {
        Style {
            method,
            line_color: if fill == Fill::None { Some(Rgb::BLACK) } else { None },
            line_width: 1.0,
            fill,
        }
    }

    fn body(svg: &str) -> &str {
        let start = svg.find('>').map_or(0, |i| i + 1);
        svg[start..].trim_end_matches("</svg>")
    }

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        let opts = SvgOptions::default();
        assert_eq!(fit(&Bounds::new(0.0, 0.0, 200.0, 100.0), &opts), (768.0, 384.0));
        assert_eq!(fit(&Bounds::new(0.0, 0.0, 100.0, 200.0), &opts), (256.0, 512.0));
        assert_eq!(fit(&Bounds::new(0.0, 0.0, 0.0, 10.0), &opts), (768.0, 512.0));
    }

    #[test]
    fn test_header_and_empty_document() {
        let svg = sink().finish();
        assert_eq!(
            svg,
            r#"<svg width="100" height="100" viewBox="0 0 100 100" xmlns="http://www.w3.org/2000/svg"></svg>"#
        );
    }

    #[test]
    fn test_framed_and_painted_rects() {
        let mut s = sink();
        let rect = Shape::Rect(Bounds::new(10.0, 20.0, 40.0, 60.0));
        s.draw_shape(&rect, &style(DrawMethod::Frame, Fill::None));
        s.draw_shape(
            &rect,
            &style(DrawMethod::Paint, Fill::Solid(Rgb::new(0xFF, 0, 0))),
        );
        let svg = s.finish();
        assert_eq!(
            body(&svg),
            concat!(
                r##"<rect x="10" y="20" width="30" height="40" fill="none" stroke="#000000"/>"##,
                r##"<rect x="10" y="20" width="30" height="40" fill="#ff0000"/>"##
            )
        );
    }

    #[test]
    fn test_pie_path() {
        let mut s = sink();
        let oval = Bounds::new(0.0, 0.0, 100.0, 100.0);
        s.draw_shape(
            &Shape::Pie {
                oval,
                start_angle: 0.0,
                end_angle: 90.0,
                bounds: oval,
            },
            &style(DrawMethod::Paint, Fill::Solid(Rgb::BLACK)),
        );
        let svg = s.finish();
        assert_eq!(body(&svg), r#"<path d="M50 50L100 50A50 50 0 0 0 50 0Z"/>"#);
    }

    #[test]
    fn test_full_arc_is_an_ellipse() {
        let mut s = sink();
        let oval = Bounds::new(0.0, 0.0, 20.0, 10.0);
        s.draw_shape(
            &Shape::Arc {
                oval,
                start_angle: -90.0,
                end_angle: 270.0,
                bounds: oval,
            },
            &style(DrawMethod::Frame, Fill::None),
        );
        assert!(s.finish().contains(r#"<ellipse cx="10" cy="5" rx="10" ry="5""#));
    }

    #[test]
    fn test_polygon_elements() {
        let mut s = sink();
        let points = vec![
            PointF::new(0.0, 0.0),
            PointF::new(10.0, 0.0),
            PointF::new(5.0, 7.5),
        ];
        s.draw_shape(
            &Shape::Polygon {
                points: points.clone(),
            },
            &style(DrawMethod::Frame, Fill::None),
        );
        s.draw_shape(
            &Shape::Polygon { points },
            &style(DrawMethod::Fill, Fill::Solid(Rgb::BLACK)),
        );
        let svg = s.finish();
        assert!(svg.contains(r##"<polyline points="0,0 10,0 5,7.5" fill="none" stroke="#000000"/>"##));
        assert!(svg.contains(r#"<polygon points="0,0 10,0 5,7.5"/>"#));
    }

    #[test]
    fn test_region_path() {
        let mut s = sink();
        s.draw_shape(
            &Shape::Region {
                bounds: Bounds::new(0.0, 0.0, 10.0, 10.0),
                points: vec![
                    PointF::new(1.0, 2.0),
                    PointF::new(5.0, 2.0),
                    PointF::new(1.0, 8.0),
                    PointF::new(5.0, 8.0),
                ],
            },
            &style(DrawMethod::Paint, Fill::Solid(Rgb::BLACK)),
        );
        assert_eq!(body(&s.finish()), r#"<path d="M1 2h4v6h-4Z"/>"#);
    }

    #[test]
    fn test_text_element() {
        let mut s = sink();
        s.set_font(&FontInfo {
            id: 3,
            name: Some("Geneva".into()),
            size: 18,
            style: FontStyle::BOLD | FontStyle::ITALIC,
            color: Rgb::new(0, 0, 0xFF),
        });
        s.draw_text(
            &TextRun {
                text: "a<b & c".into(),
                position: PointF::new(10.0, 50.0),
            },
            &Style::default(),
        );
        assert_eq!(
            body(&s.finish()),
            concat!(
                r#"<text x="10" y="50" font-family="Geneva" font-size="18" font-weight="bold" "#,
                r##"font-style="italic" fill="#0000ff">a&lt;b &amp; c</text>"##
            )
        );
    }

    #[test]
    fn test_rasters_can_be_left_out() {
        let mut s = SvgSink::new(SvgOptions {
            embed_rasters: false,
            ..SvgOptions::default()
        });
        s.begin_document(Bounds::new(0.0, 0.0, 10.0, 10.0));
        s.draw_raster(&RasterImage {
            data: super::super::sink::RasterData::Jpeg(vec![0xFF, 0xD8, 0xFF]),
            placement: Bounds::new(0.0, 0.0, 10.0, 10.0),
            src_rect: None,
            mode: 0,
            mask: None,
        });
        assert!(!s.finish().contains("<image"));
    }

    #[cfg(feature = "imgconv")]
    #[test]
    fn test_mono_raster_is_embedded_as_png() {
        let mut s = sink();
        s.draw_raster(&RasterImage {
            data: super::super::sink::RasterData::Mono {
                width: 8,
                height: 1,
                row_bytes: 1,
                bits: vec![0xAA],
                palette: [Rgb::WHITE, Rgb::BLACK],
            },
            placement: Bounds::new(0.0, 0.0, 8.0, 1.0),
            src_rect: None,
            mode: 0,
            mask: None,
        });
        let svg = s.finish();
        assert!(svg.contains(r#"<image x="0" y="0" width="8" height="1" preserveAspectRatio="none" href="data:image/png;base64,"#));
    }

    #[test]
    fn test_convert_picture() {
        // version 1, frame 0,0 - 100,200, PaintRect, EndPic
        let mut data = vec![0, 0, 0, 0, 0, 0, 0, 100, 0, 200, 0x11, 0x01, 0x31];
        for v in [10i16, 20, 30, 60] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.push(0xFF);
        let svg = convert_pict_to_svg(&data).unwrap();
        assert!(svg.starts_with(r#"<svg width="768" height="384""#));
        assert!(svg.contains(r#"<rect x="76.8" y="38.4" width="153.6" height="76.8"/>"#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_convert_rejects_non_pict() {
        assert!(matches!(
            convert_pict_to_svg(b"GIF89a"),
            Err(Error::Pict(PictError::HeaderMismatch))
        ));
    }
}

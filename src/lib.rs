//! QuickPict - A Rust library for interpreting Macintosh QuickDraw pictures
//!
//! This library decodes PICT version 1 and version 2 files into an ordered
//! stream of drawing primitives in page coordinates, and converts them to
//! SVG and raster images.
//!
//! # Features
//!
//! - **Opcode interpreter**: shapes, lines, text, patterns, clip regions and
//!   every raster opcode of QuickDraw
//! - **Raster codecs**: 1-bit bitmaps, 1 to 8 bit indexed and 16/32-bit direct
//!   pixmaps, PackBits, embedded QuickTime JPEG
//! - **Best effort**: damaged records are dropped, truncated input keeps what
//!   was drawn so far
//! - **Pluggable output**: implement [`PictSink`] or collect [`DrawEvent`]s
//!
//! # Example - Listing drawing events
//!
//! ```no_run
//! use quickpict::{parse, DrawEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("image.pict")?;
//! for event in parse(&data)? {
//!     if let DrawEvent::Shape { shape, style } = event {
//!         println!("{:?} drawn with {:?}", shape.kind(), style.method);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Custom sink
//!
//! ```no_run
//! use quickpict::{ParseOptions, PictParser, PictSink};
//! use quickpict::images::pict::{Bounds, FontInfo, RasterImage, Shape, Style, TextRun};
//!
//! struct TextOnly(Vec<String>);
//!
//! impl PictSink for TextOnly {
//!     fn begin_document(&mut self, _page: Bounds) {}
//!     fn set_style(&mut self, _style: &Style) {}
//!     fn set_font(&mut self, _font: &FontInfo) {}
//!     fn draw_shape(&mut self, _shape: &Shape, _style: &Style) {}
//!     fn draw_text(&mut self, run: &TextRun, _style: &Style) {
//!         self.0.push(run.text.clone());
//!     }
//!     fn draw_raster(&mut self, _image: &RasterImage) {}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("image.pict")?;
//! let mut parser = PictParser::new(&data, ParseOptions::default())?;
//! let mut sink = TextOnly(Vec::new());
//! let summary = parser.run(&mut sink)?;
//! println!("{} runs, {} records skipped", sink.0.len(), summary.skipped_records);
//! # Ok(())
//! # }
//! ```

/// Shared infrastructure: error types and big-endian readers
pub mod common;

/// QuickDraw picture interpretation and conversion
pub mod images;

pub use common::error::{Error, Result};
pub use images::pict::{
    DrawEvent, EventRecorder, ParseOptions, ParseSummary, PictError, PictParser, PictSink,
    PictVersion, SvgOptions, convert_pict_to_svg, parse,
};

// Macintosh PICT format interpreter
//
// This module decodes QuickDraw pictures into a stream of drawing primitives
// (shapes, text runs, rasters) in page coordinates, and converts them to SVG
// and raster formats.
//
// PICT is the native graphics metafile format for Mac OS Classic. There are
// two versions: PICT 1 (one-byte opcodes) and PICT 2 (two-byte opcodes,
// colour pixmaps, and direct-colour images).
//
// # Architecture
//
// - `stream`: bounds-checked big-endian cursor
// - `data`: PackBits decompression
// - `region`, `pattern`, `color_table`, `bitmap`, `pixmap`: record readers
// - `opcode`: opcode table and the skip lengths of unimplemented opcodes
// - `state`: drawing state threaded through the dispatcher
// - `parser`: header detection and the opcode dispatcher
// - `sink`: the `PictSink` output trait and the `EventRecorder` sink
// - `svg_converter`: SVG output
// - `converter`: raster records to PNG (feature `imgconv`)
//
// References:
// - Inside Macintosh: Imaging With QuickDraw, appendix A
// - Apple Technical Note TN1023: Understanding the PICT Format

pub mod bitmap;
pub mod color_table;
#[cfg(feature = "imgconv")]
pub mod converter;
pub mod data;
pub mod error;
pub mod geometry;
pub mod opcode;
pub mod parser;
pub mod pattern;
pub mod pixmap;
pub mod region;
pub mod sink;
pub mod state;
pub mod stream;
pub mod svg_converter;
pub mod types;

pub use error::{PictError, PictResult};
pub use opcode::DrawMethod;
pub use parser::{ParseOptions, ParseSummary, PictHeader, PictParser, PictVersion};
pub use sink::{
    DrawEvent, EventRecorder, Fill, FontInfo, PictSink, RasterData, RasterFormat, RasterImage,
    Shape, ShapeKind, Style, TextRun,
};
pub use svg_converter::{SvgOptions, SvgSink, convert_pict_to_svg, convert_pict_to_svg_with};
pub use types::{Bounds, FontStyle, PictRect, Point, PointF, Rgb};

#[cfg(feature = "imgconv")]
pub use converter::{convert_raster, convert_raster_to_png, raster_to_rgba};

use crate::common::error::Result;

/// Interpret a picture with default options and return its events in order
///
/// Recoverable errors are absorbed (the events drawn before them are kept);
/// only input without a PICT header is an error.
///
/// # Example
/// ```no_run
/// use quickpict::images::pict::{parse, DrawEvent};
///
/// let data = std::fs::read("image.pict")?;
/// let shapes = parse(&data)?
///     .iter()
///     .filter(|e| matches!(e, DrawEvent::Shape { .. }))
///     .count();
/// println!("{} shapes", shapes);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse(data: &[u8]) -> Result<Vec<DrawEvent>> {
    let mut parser = PictParser::new(data, ParseOptions::default())?;
    let mut recorder = EventRecorder::new();
    parser.run(&mut recorder)?;
    Ok(recorder.into_events())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_event_order() {
        // version 1, frame 0,0 - 10,10, FrameOval, PaintRect, EndPic
        let mut data = vec![0, 0, 0, 0, 0, 0, 0, 10, 0, 10, 0x11, 0x01];
        data.push(0x50);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 4, 0, 4]);
        data.push(0x31);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 2, 0, 2]);
        data.push(0xFF);

        let events = parse(&data).unwrap();
        let kinds: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Shape { shape, .. } => Some(shape.kind()),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![ShapeKind::Oval, ShapeKind::Rect]);
        assert!(matches!(events[0], DrawEvent::BeginDocument { .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse(&[1, 2, 3]),
            Err(crate::common::error::Error::Pict(PictError::HeaderMismatch))
        ));
    }
}

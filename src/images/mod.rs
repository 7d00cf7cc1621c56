// Picture decoding and conversion module
//
// This module interprets Macintosh QuickDraw pictures (PICT) and converts
// them to SVG and raster images.
//
// # Architecture
//
// - `pict`: PICT header detection, opcode interpreter, record readers,
//   SVG and raster conversion
// - `svg_utils`: allocation-free number, colour and text formatting for SVG
//
// # Example: Converting PICT to SVG
//
// ```no_run
// use quickpict::images::pict::convert_pict_to_svg;
//
// let pict_data = std::fs::read("image.pict")?;
// let svg = convert_pict_to_svg(&pict_data)?;
// std::fs::write("output.svg", svg)?;
// # Ok::<(), Box<dyn std::error::Error>>(())
// ```
//
// # Error Handling
//
// Real-world pictures are often damaged. The interpreter:
// - drops records whose bytes were read but do not decode (bad runs,
//   empty rectangles, unknown pixel formats)
// - stops at the first read past the end of the input and keeps what was
//   drawn before it
// - fails only when no PICT header is found
pub mod pict;
pub mod svg_utils;

pub use pict::{convert_pict_to_svg, parse};

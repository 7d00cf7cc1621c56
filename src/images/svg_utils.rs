//! Shared SVG utilities for picture conversion
//!
//! All functions write directly into an output buffer instead of returning
//! fresh strings, so a whole document is built in one allocation.
//!
//! - **Numbers**: `itoa` for integral values, `ryu` for the rest, rounded to
//!   two decimals with trailing zeros dropped
//! - **Colours**: `#rrggbb` written straight from an [`Rgb`]
//! - **Text**: XML escaping without an intermediate string

use crate::images::pict::Rgb;

/// Fast number formatter that writes directly to a string buffer.
///
/// # Examples
///
/// ```
/// use quickpict::images::svg_utils::write_num;
///
/// let mut buf = String::new();
/// write_num(&mut buf, 10.0);  // writes "10"
/// buf.push(' ');
/// write_num(&mut buf, 10.123); // writes "10.12"
/// assert_eq!(buf, "10 10.12");
/// ```
#[inline]
pub fn write_num(buf: &mut String, n: f64) {
    let rounded = (n * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        let mut ints = itoa::Buffer::new();
        // -0 prints as 0
        buf.push_str(ints.format(rounded as i64));
        return;
    }
    if !rounded.is_finite() {
        buf.push('0');
        return;
    }

    let mut floats = ryu::Buffer::new();
    let s = floats.format(rounded);
    if s.contains('.') && !s.contains('e') {
        buf.push_str(s.trim_end_matches('0').trim_end_matches('.'));
    } else {
        buf.push_str(s);
    }
}

/// Write a colour in `#rrggbb` form.
///
/// # Examples
///
/// ```
/// use quickpict::images::pict::Rgb;
/// use quickpict::images::svg_utils::write_color_hex;
///
/// let mut buf = String::new();
/// write_color_hex(&mut buf, Rgb::new(0xFF, 0x80, 0x00));
/// assert_eq!(buf, "#ff8000");
/// ```
#[inline]
pub fn write_color_hex(buf: &mut String, color: Rgb) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    buf.push('#');
    for channel in [color.r, color.g, color.b] {
        buf.push(HEX[usize::from(channel >> 4)] as char);
        buf.push(HEX[usize::from(channel & 0x0F)] as char);
    }
}

/// Convert a colour to a `#rrggbb` string.
#[inline]
pub fn color_hex(color: Rgb) -> String {
    let mut s = String::with_capacity(7);
    write_color_hex(&mut s, color);
    s
}

/// Write ` name="value"` for a numeric attribute.
#[inline]
pub fn write_num_attr(buf: &mut String, name: &str, value: f64) {
    buf.push(' ');
    buf.push_str(name);
    buf.push_str("=\"");
    write_num(buf, value);
    buf.push('"');
}

/// Write stroke colour and width; a zero width is drawn one unit wide.
#[inline]
pub fn write_stroke_attrs(buf: &mut String, color: Rgb, width: f64) {
    buf.push_str(" stroke=\"");
    write_color_hex(buf, color);
    buf.push('"');
    let width = if width > 0.0 { width } else { 1.0 };
    if width != 1.0 {
        write_num_attr(buf, "stroke-width", width);
    }
}

/// Write `text` with the five XML special characters escaped.
pub fn write_xml_escaped(buf: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&apos;"),
            // not representable in XML 1.0
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {},
            c => buf.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_num() {
        let mut buf = String::new();
        write_num(&mut buf, 10.0);
        assert_eq!(buf, "10");

        buf.clear();
        write_num(&mut buf, 10.5);
        assert_eq!(buf, "10.5");

        buf.clear();
        write_num(&mut buf, 10.123);
        assert_eq!(buf, "10.12");

        buf.clear();
        write_num(&mut buf, 10.126);
        assert_eq!(buf, "10.13");

        buf.clear();
        write_num(&mut buf, -0.001);
        assert_eq!(buf, "0");

        buf.clear();
        write_num(&mut buf, -2.5);
        assert_eq!(buf, "-2.5");
    }

    #[test]
    fn test_write_color_hex() {
        assert_eq!(color_hex(Rgb::new(0xFF, 0, 0)), "#ff0000");
        assert_eq!(color_hex(Rgb::new(0, 0x0A, 0xB0)), "#000ab0");
        assert_eq!(color_hex(Rgb::WHITE), "#ffffff");
    }

    #[test]
    fn test_stroke_attrs() {
        let mut buf = String::new();
        write_stroke_attrs(&mut buf, Rgb::BLACK, 1.0);
        assert_eq!(buf, " stroke=\"#000000\"");

        buf.clear();
        write_stroke_attrs(&mut buf, Rgb::BLACK, 2.5);
        assert_eq!(buf, " stroke=\"#000000\" stroke-width=\"2.5\"");
    }

    #[test]
    fn test_write_xml_escaped() {
        let mut buf = String::new();
        write_xml_escaped(&mut buf, "Hello <world> & \"friends\"\u{1}");
        assert_eq!(buf, "Hello &lt;world&gt; &amp; &quot;friends&quot;");
    }
}

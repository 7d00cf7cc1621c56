// PICT raster record converter
//
// Turns decoded bitmap, pixmap and QuickTime records into `image` buffers
// and encodes them to modern raster formats (PNG, JPEG, WebP).

use super::sink::{RasterData, RasterImage};
use super::types::Rgb;
use crate::common::error::{Error, Result};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Colour used for pixels a record does not cover
const MISSING_PIXEL: Rgb = Rgb::WHITE;

/// Expand a raster payload to RGBA pixels.
///
/// JPEG payloads are decoded; every other format is already pixels.
pub fn raster_to_rgba(data: &RasterData) -> Result<RgbaImage> {
    if let RasterData::Jpeg(bytes) = data {
        return Ok(image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?.to_rgba8());
    }

    let (width, height) = data.dimensions().unwrap_or((0, 0));
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(Error::InvalidFormat(format!(
            "raster of {}x{} is too large",
            width, height
        )));
    };
    if w == 0 || h == 0 {
        return Err(Error::InvalidFormat("raster has no pixels".into()));
    }

    Ok(ImageBuffer::from_fn(w, h, |x, y| {
        let c = data
            .pixel(x as usize, y as usize)
            .unwrap_or(MISSING_PIXEL);
        Rgba([c.r, c.g, c.b, 255])
    }))
}

/// Encode a raster record in `format`
pub fn convert_raster(image: &RasterImage, format: ImageFormat) -> Result<Vec<u8>> {
    let rgba = raster_to_rgba(&image.data)?;
    let encoded = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };

    let mut buffer = Cursor::new(Vec::new());
    encoded
        .write_to(&mut buffer, format)
        .map_err(|e| Error::ParseError(format!("Failed to encode image: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Encode a raster record as PNG
pub fn convert_raster_to_png(image: &RasterImage) -> Result<Vec<u8>> {
    convert_raster(image, ImageFormat::Png)
}

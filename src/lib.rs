use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};
use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

pub mod assign;
pub mod error;
pub mod normalize;
pub mod palettes;
pub mod pool;
pub mod quantize;
pub mod transform;

pub use error::{ParameterError, Result, TransformError};
pub use normalize::{RawImage, Samples};
pub use palettes::{PALETTE_SIZE, Palette};
pub use quantize::KmeansParams;
pub use transform::{Pixelated, TransformOptions, transform, transform_named, transform_raw};

/// Largest accepted upload, in pixels (a little above 4K).
pub const MAX_PIXELS: u64 = 8_947_360;

/// PNG output of [`pixelate_bytes`] plus the clustering it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelatedPng {
    pub png: Vec<u8>,
    /// Cluster centroids as `RRGGBB`, indexed by label.
    pub centroids: Vec<String>,
    /// Palette color (`RRGGBB`) given to each label.
    pub mapping: Vec<String>,
}

/// Decode an encoded image, convert it to pixel art and encode the result as
/// PNG.
///
/// The size ceiling is checked against the header before any pixel data is
/// decoded.
pub fn pixelate_bytes(
    input: &[u8],
    palette: &Palette,
    options: &TransformOptions,
) -> Result<PixelatedPng> {
    let (width, height) = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(image::ImageError::from)?
        .into_dimensions()?;
    check_size(width, height)?;

    let img = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(image::ImageError::from)?
        .decode()?;

    let result = transform(&img, palette, options)?;
    let png = encode_png(result.image)?;

    Ok(PixelatedPng {
        png,
        centroids: result.centroids.iter().map(|&c| palettes::to_hex(c)).collect(),
        mapping: result.mapping.iter().map(|&c| palettes::to_hex(c)).collect(),
    })
}

fn check_size(width: u32, height: u32) -> Result<()> {
    let pixels = width as u64 * height as u64;
    if pixels > MAX_PIXELS {
        return Err(TransformError::ImageTooLarge {
            pixels,
            max: MAX_PIXELS,
        });
    }
    Ok(())
}

fn encode_png(img: image::RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        DynamicImage::ImageRgb8(img).write_to(&mut cursor, ImageFormat::Png)?;
    }
    Ok(buf)
}

/// Convert an encoded image to 2-bit pixel art with a named palette.
///
/// Resolves to `{ image: Uint8Array, palette: string[] }` where `image` is
/// PNG-encoded and `palette[label]` is the hex color used for each cluster.
#[wasm_bindgen]
pub fn pixelate(
    input: Vec<u8>,
    pixel_size: u32,
    palette_name: &str,
    seed: Option<u32>,
) -> Result<Object, JsValue> {
    let palette =
        palettes::lookup(palette_name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let options = TransformOptions::new(pixel_size).seed(seed.unwrap_or(0) as u64);

    let out = pixelate_bytes(&input, &palette, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let palette_js = Array::new();
    for hex in &out.mapping {
        palette_js.push(&JsValue::from_str(hex));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(out.png.as_slice()))?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;

    Ok(result)
}

/// Names of the built-in palettes.
#[wasm_bindgen]
pub fn palette_names() -> Array {
    palettes::names().map(JsValue::from_str).collect()
}

/// The four hex colors of a built-in palette, in palette order.
#[wasm_bindgen]
pub fn palette_colors(name: &str) -> Result<Array, JsValue> {
    let palette = palettes::lookup(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(palette.to_hex().iter().map(|hex| JsValue::from_str(hex)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_of(img: RgbImage) -> Vec<u8> {
        encode_png(img).unwrap()
    }

    #[test]
    fn bytes_round_trip_keeps_dimensions() {
        let input = png_of(RgbImage::from_fn(5, 3, |x, y| {
            Rgb([(x * 50) as u8, (y * 80) as u8, 30])
        }));
        let palette = palettes::lookup("pumpkin_gb").unwrap();
        let out = pixelate_bytes(&input, &palette, &TransformOptions::new(2)).unwrap();

        let decoded = image::load_from_memory(&out.png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(out.mapping.len(), 4);
        for hex in palette.to_hex() {
            assert!(out.mapping.contains(&hex));
        }
    }

    #[test]
    fn centroids_are_reported_by_label() {
        // Two flat colors cluster exactly: label 0 is the first color seen.
        let input = png_of(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([18, 52, 86])
            } else {
                Rgb([171, 205, 239])
            }
        }));
        let palette = palettes::lookup("bicycle").unwrap();
        let out = pixelate_bytes(&input, &palette, &TransformOptions::default()).unwrap();

        assert_eq!(out.centroids.len(), 4);
        assert_eq!(out.centroids[0], "123456");
        assert_eq!(out.centroids[1], "ABCDEF");
    }

    #[test]
    fn oversized_header_is_rejected_before_decoding() {
        // A PNM header promising more pixels than the ceiling, with no data.
        let header = b"P6\n4096 2185\n255\n";
        let palette = palettes::lookup("bicycle").unwrap();
        let result = pixelate_bytes(header, &palette, &TransformOptions::default());
        assert!(matches!(
            result,
            Err(TransformError::ImageTooLarge { pixels: 8_949_760, max: MAX_PIXELS })
        ));
    }

    #[test]
    fn size_ceiling() {
        assert!(check_size(3840, 2160).is_ok());
        assert!(matches!(
            check_size(4096, 2185),
            Err(TransformError::ImageTooLarge { pixels: 8_949_760, max: MAX_PIXELS })
        ));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let palette = palettes::lookup("bicycle").unwrap();
        let result = pixelate_bytes(b"not an image", &palette, &TransformOptions::default());
        assert!(matches!(result, Err(TransformError::Image(_))));
    }
}

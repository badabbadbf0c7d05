//! The pixel-art pipeline: normalize, quantize, pool, assign, recolor.

use image::{DynamicImage, RgbImage};
use palette::Srgb;

use crate::assign::assign;
use crate::error::{ParameterError, Result, TransformError};
use crate::normalize::{RawImage, normalize};
use crate::palettes::{self, PALETTE_SIZE, Palette};
use crate::pool::mode_pool;
use crate::quantize::{KmeansParams, quantize};

/// Pipeline settings. Setters consume and return `self`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOptions {
    pub pixel_size: u32,
    pub kmeans: KmeansParams,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            pixel_size: 1,
            kmeans: KmeansParams::default(),
        }
    }
}

impl TransformOptions {
    pub fn new(pixel_size: u32) -> Self {
        Self {
            pixel_size,
            ..Self::default()
        }
    }

    /// Edge length of the pooling blocks.
    #[inline]
    pub fn pixel_size(mut self, pixel_size: u32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    /// Clustering seed; identical inputs and seed give identical output.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.kmeans.seed = seed;
        self
    }

    #[inline]
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.kmeans.max_iter = max_iter;
        self
    }

    #[inline]
    pub fn converge(mut self, converge: f32) -> Self {
        self.kmeans.converge = converge;
        self
    }

    /// Number of seeded k-means restarts; the lowest score is kept.
    #[inline]
    pub fn runs(mut self, runs: u32) -> Self {
        self.kmeans.runs = runs;
        self
    }

    fn validate(&self) -> Result<(), ParameterError> {
        if self.pixel_size == 0 {
            return Err(ParameterError::PixelSize(self.pixel_size));
        }
        if self.kmeans.runs == 0 {
            return Err(ParameterError::Runs);
        }
        Ok(())
    }
}

/// Output of a transform.
#[derive(Debug, Clone)]
pub struct Pixelated {
    /// Same size as the input, every pixel one of the palette colors.
    pub image: RgbImage,
    /// Cluster centroids indexed by label.
    pub centroids: [Srgb<u8>; PALETTE_SIZE],
    /// Palette color given to each label.
    pub mapping: [Srgb<u8>; PALETTE_SIZE],
}

/// Turn `img` into 4-color pixel art using `palette`.
pub fn transform(
    img: &DynamicImage,
    palette: &Palette,
    options: &TransformOptions,
) -> Result<Pixelated> {
    options.validate()?;
    let rgb = normalize(img)?;
    run(rgb, palette, options)
}

/// [`transform`] with a palette looked up by name and default clustering.
pub fn transform_named(
    img: &DynamicImage,
    pixel_size: u32,
    palette_name: &str,
) -> Result<Pixelated> {
    let palette = palettes::lookup(palette_name)?;
    transform(img, &palette, &TransformOptions::new(pixel_size))
}

/// [`transform`] for a caller-owned interleaved buffer.
pub fn transform_raw(
    img: &RawImage<'_>,
    palette: &Palette,
    options: &TransformOptions,
) -> Result<Pixelated> {
    options.validate()?;
    let rgb = img.to_rgb8()?;
    run(rgb, palette, options)
}

fn run(rgb: RgbImage, palette: &Palette, options: &TransformOptions) -> Result<Pixelated> {
    let (width, height) = rgb.dimensions();
    let span = tracing::debug_span!("transform", width, height, pixel_size = options.pixel_size);
    let _enter = span.enter();

    let clusters = quantize(&rgb, &options.kmeans)?;
    drop(rgb);

    let mut labels = clusters.labels;
    let mut populated = [false; PALETTE_SIZE];
    for &label in &labels {
        populated[label as usize] = true;
    }
    mode_pool(&mut labels, width, height, options.pixel_size);

    let mapping = assign(&clusters.centroids, &populated, palette);

    let mut raw = Vec::with_capacity(labels.len() * 3);
    for &label in &labels {
        let c = mapping[label as usize];
        raw.extend_from_slice(&[c.red, c.green, c.blue]);
    }
    let image = RgbImage::from_raw(width, height, raw)
        .ok_or_else(|| TransformError::Clustering("label grid does not match image size".into()))?;

    Ok(Pixelated {
        image,
        centroids: clusters.centroids,
        mapping,
    })
}

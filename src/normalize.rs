//! Input normalization to 8-bit, 3-channel RGB.
//!
//! Intensity range follows the sample type, never the sample values:
//! 8-bit samples are 0-255, float samples are 0.0-1.0. Gray input is
//! broadcast to three channels and alpha is dropped without compositing.

use image::{DynamicImage, RgbImage};

use crate::error::{Result, TransformError};

/// Interleaved sample storage of a [`RawImage`].
#[derive(Debug, Clone, Copy)]
pub enum Samples<'a> {
    /// Intensities in 0..=255.
    U8(&'a [u8]),
    /// Intensities in 0.0..=1.0; values outside are clamped.
    F32(&'a [f32]),
}

impl Samples<'_> {
    fn len(&self) -> usize {
        match self {
            Samples::U8(s) => s.len(),
            Samples::F32(s) => s.len(),
        }
    }

    #[inline]
    fn get(&self, i: usize) -> u8 {
        match self {
            Samples::U8(s) => s[i],
            Samples::F32(s) => (s[i].clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

/// A row-major `height x width x channels` buffer handed over by a caller
/// that did not go through `image` decoding.
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub samples: Samples<'a>,
}

impl RawImage<'_> {
    pub fn to_rgb8(&self) -> Result<RgbImage> {
        check_dimensions(self.width, self.height)?;
        check_channels(self.channels)?;

        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.channels));
        if expected != Some(self.samples.len()) {
            return Err(TransformError::InvalidShape {
                channels: self.channels,
            });
        }

        let pixels = self.width as usize * self.height as usize;
        let mut raw = Vec::with_capacity(pixels * 3);
        for p in 0..pixels {
            let base = p * self.channels;
            if self.channels == 1 {
                let v = self.samples.get(base);
                raw.extend_from_slice(&[v, v, v]);
            } else {
                raw.extend((base..base + 3).map(|i| self.samples.get(i)));
            }
        }

        RgbImage::from_raw(self.width, self.height, raw).ok_or(TransformError::InvalidShape {
            channels: self.channels,
        })
    }
}

/// Convert a decoded image to 8-bit RGB, letting `image` scale 16-bit and
/// float samples by their declared range.
pub fn normalize(img: &DynamicImage) -> Result<RgbImage> {
    check_dimensions(img.width(), img.height())?;
    check_channels(img.color().channel_count() as usize)?;
    Ok(img.to_rgb8())
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TransformError::EmptyImage { width, height });
    }
    Ok(())
}

fn check_channels(channels: usize) -> Result<()> {
    match channels {
        1 | 3 | 4 => Ok(()),
        _ => Err(TransformError::InvalidShape { channels }),
    }
}

//! Color quantization to exactly [`PALETTE_SIZE`] clusters.

use image::RgbImage;
use kmeans_colors::{Kmeans, get_kmeans};
use palette::Srgb;

use crate::error::{Result, TransformError};
use crate::palettes::PALETTE_SIZE;

/// Seeded k-means settings. Run `i` is seeded with `seed + i` and the run
/// with the lowest score wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KmeansParams {
    pub seed: u64,
    pub max_iter: usize,
    pub converge: f32,
    pub runs: u32,
}

impl Default for KmeansParams {
    fn default() -> Self {
        Self {
            seed: 0,
            max_iter: 300,
            converge: 1e-5,
            runs: 1,
        }
    }
}

/// Cluster centroids plus one label per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Clusters {
    pub centroids: [Srgb<u8>; PALETTE_SIZE],
    pub labels: Vec<u8>,
}

/// Cluster the pixel colors of `img`.
///
/// Images with at most [`PALETTE_SIZE`] distinct colors are clustered
/// exactly without running k-means. Missing slots repeat the last distinct
/// color and own no pixels.
pub fn quantize(img: &RgbImage, params: &KmeansParams) -> Result<Clusters> {
    if let Some(distinct) = distinct_colors(img) {
        tracing::debug!(distinct = distinct.len(), "few distinct colors, exact clustering");
        return Ok(exact_clusters(img, &distinct));
    }

    let buf: Vec<Srgb> = img
        .pixels()
        .map(|p| Srgb::new(p[0], p[1], p[2]).into_format())
        .collect();

    let mut best = Kmeans::<Srgb>::new();
    for run in 0..params.runs {
        let result = get_kmeans(
            PALETTE_SIZE,
            params.max_iter,
            params.converge,
            false,
            &buf,
            params.seed.wrapping_add(run as u64),
        );
        tracing::trace!(run, score = result.score, "k-means run finished");
        if result.score < best.score {
            best = result;
        }
    }

    if best.centroids.len() != PALETTE_SIZE {
        return Err(TransformError::Clustering(format!(
            "expected {PALETTE_SIZE} centroids, got {}",
            best.centroids.len()
        )));
    }
    if best.indices.len() != buf.len() {
        return Err(TransformError::Clustering(format!(
            "expected {} labels, got {}",
            buf.len(),
            best.indices.len()
        )));
    }
    if best.indices.iter().any(|&i| i as usize >= PALETTE_SIZE) {
        return Err(TransformError::Clustering("label out of range".into()));
    }

    let mut centroids = [Srgb::new(0u8, 0, 0); PALETTE_SIZE];
    for (slot, c) in centroids.iter_mut().zip(&best.centroids) {
        *slot = c.into_format::<u8>();
    }
    tracing::debug!(score = best.score, ?centroids, "k-means finished");

    Ok(Clusters {
        centroids,
        labels: best.indices,
    })
}

/// Distinct colors in scan order, or `None` once there are more than
/// [`PALETTE_SIZE`] of them.
fn distinct_colors(img: &RgbImage) -> Option<Vec<[u8; 3]>> {
    let mut seen: Vec<[u8; 3]> = Vec::with_capacity(PALETTE_SIZE);
    for p in img.pixels() {
        if !seen.contains(&p.0) {
            if seen.len() == PALETTE_SIZE {
                return None;
            }
            seen.push(p.0);
        }
    }
    Some(seen)
}

fn exact_clusters(img: &RgbImage, distinct: &[[u8; 3]]) -> Clusters {
    let labels = img
        .pixels()
        .map(|p| distinct.iter().position(|c| *c == p.0).unwrap_or(0) as u8)
        .collect();

    let last = distinct.last().copied().unwrap_or([0, 0, 0]);
    let mut centroids = [Srgb::new(last[0], last[1], last[2]); PALETTE_SIZE];
    for (slot, &[r, g, b]) in centroids.iter_mut().zip(distinct) {
        *slot = Srgb::new(r, g, b);
    }

    Clusters { centroids, labels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_tone_gradient() -> RgbImage {
        // Dark reds on the left half, light blues on the right, 16 distinct
        // colors in total so k-means really runs.
        RgbImage::from_fn(8, 8, |x, y| {
            if x < 4 {
                Rgb([200 + (x * 4 + y % 2) as u8, 10, 10])
            } else {
                Rgb([10, 10, 200 + (x * 4 + y % 2) as u8])
            }
        })
    }

    #[test]
    fn flat_image_pads_with_its_only_color() {
        let img = RgbImage::from_pixel(3, 2, Rgb([128, 128, 128]));
        let clusters = quantize(&img, &KmeansParams::default()).unwrap();
        assert_eq!(clusters.centroids, [Srgb::new(128, 128, 128); 4]);
        assert_eq!(clusters.labels, vec![0; 6]);
    }

    #[test]
    fn few_colors_keep_scan_order() {
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([9, 9, 9]),
            1 => Rgb([1, 2, 3]),
            _ => Rgb([9, 9, 9]),
        });
        let clusters = quantize(&img, &KmeansParams::default()).unwrap();
        assert_eq!(clusters.labels, vec![0, 1, 0]);
        assert_eq!(clusters.centroids[0], Srgb::new(9, 9, 9));
        assert_eq!(clusters.centroids[1], Srgb::new(1, 2, 3));
        assert_eq!(clusters.centroids[3], Srgb::new(1, 2, 3));
    }

    #[test]
    fn kmeans_labels_cover_every_pixel() {
        let img = two_tone_gradient();
        let clusters = quantize(&img, &KmeansParams::default()).unwrap();
        assert_eq!(clusters.labels.len(), 64);
        assert!(clusters.labels.iter().all(|&l| l < 4));
    }

    #[test]
    fn kmeans_never_mixes_separated_groups() {
        let img = two_tone_gradient();
        let clusters = quantize(&img, &KmeansParams::default()).unwrap();
        let (mut left, mut right) = (Vec::new(), Vec::new());
        for (i, &label) in clusters.labels.iter().enumerate() {
            if i % 8 < 4 {
                left.push(label);
            } else {
                right.push(label);
            }
        }
        assert!(left.iter().all(|l| !right.contains(l)));
    }

    #[test]
    fn same_seed_same_clusters() {
        let img = two_tone_gradient();
        let params = KmeansParams {
            seed: 7,
            runs: 3,
            ..KmeansParams::default()
        };
        assert_eq!(quantize(&img, &params).unwrap(), quantize(&img, &params).unwrap());
    }
}

//! Mapping clusters onto a target palette.
//!
//! Centroids are ranked by descending distance from black, then each one in
//! turn takes the nearest palette color still available. This is a greedy
//! walk, not an optimal matching: the ranking decides who wins a contested
//! palette color. Clusters that own no pixels rank after all the others.

use palette::Srgb;

use crate::palettes::{PALETTE_SIZE, Palette};

#[inline]
fn dist_sq(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.red, b.red) + d(a.green, b.green) + d(a.blue, b.blue)
}

/// Cluster indices sorted by descending distance from black, populated
/// clusters first. Equal distances keep centroid order.
pub fn order_centroids(
    centroids: &[Srgb<u8>; PALETTE_SIZE],
    populated: &[bool; PALETTE_SIZE],
) -> [usize; PALETTE_SIZE] {
    let black = Srgb::new(0, 0, 0);
    let mut order = [0, 1, 2, 3];
    // stable
    order.sort_by(|&a, &b| {
        populated[b]
            .cmp(&populated[a])
            .then_with(|| dist_sq(centroids[b], black).cmp(&dist_sq(centroids[a], black)))
    });
    order
}

/// Palette color for every cluster label: `mapping[label]`.
///
/// Walks the centroids in [`order_centroids`] order and greedily gives each
/// the closest remaining palette color, first palette entry winning ties.
pub fn assign(
    centroids: &[Srgb<u8>; PALETTE_SIZE],
    populated: &[bool; PALETTE_SIZE],
    palette: &Palette,
) -> [Srgb<u8>; PALETTE_SIZE] {
    let mut remaining: Vec<Srgb<u8>> = palette.colors().to_vec();
    let mut mapping = [Srgb::new(0, 0, 0); PALETTE_SIZE];

    for label in order_centroids(centroids, populated) {
        let centroid = centroids[label];
        let nearest = remaining
            .iter()
            .enumerate()
            .min_by_key(|&(i, &c)| (dist_sq(c, centroid), i))
            .map(|(i, _)| i)
            .unwrap_or(0);
        mapping[label] = remaining.remove(nearest);
    }

    tracing::debug!(?centroids, ?mapping, "palette assigned");
    mapping
}

//! Block mode pooling over a label grid.

use crate::palettes::PALETTE_SIZE;

/// Most frequent label among `labels`; ties go to the lowest label.
/// Labels outside `0..PALETTE_SIZE` are not counted.
#[inline]
pub fn majority(labels: impl IntoIterator<Item = u8>) -> u8 {
    let mut counts = [0u32; PALETTE_SIZE];
    for l in labels {
        if let Some(count) = counts.get_mut(l as usize) {
            *count += 1;
        }
    }

    let mut best = 0;
    for (label, &count) in counts.iter().enumerate().skip(1) {
        if count > counts[best] {
            best = label;
        }
    }
    best as u8
}

/// Replace every `block x block` tile of the row-major `labels` grid with
/// the tile's majority label. Tiles on the right and bottom edges are
/// clipped to the grid.
pub fn mode_pool(labels: &mut [u8], width: u32, height: u32, block: u32) {
    let (w, h, block) = (width as usize, height as usize, block.max(1) as usize);
    debug_assert_eq!(labels.len(), w * h);

    for y0 in (0..h).step_by(block) {
        let y1 = (y0 + block).min(h);
        for x0 in (0..w).step_by(block) {
            let x1 = (x0 + block).min(w);

            let grid: &[u8] = labels;
            let label = majority(
                (y0..y1).flat_map(move |y| grid[y * w + x0..y * w + x1].iter().copied()),
            );
            for y in y0..y1 {
                labels[y * w + x0..y * w + x1].fill(label);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_the_lowest_label() {
        assert_eq!(majority([1, 0]), 0);
        assert_eq!(majority([3, 2, 2, 3]), 2);
        assert_eq!(majority([3, 1, 3]), 3);
    }

    #[test]
    fn out_of_range_labels_are_ignored() {
        assert_eq!(majority([9, 9, 9, 2]), 2);
        assert_eq!(majority([200, 255]), 0);
    }

    #[test]
    fn two_by_one_block_tie() {
        let mut labels = vec![1, 0];
        mode_pool(&mut labels, 2, 1, 2);
        assert_eq!(labels, vec![0, 0]);
    }

    #[test]
    fn edge_blocks_are_clipped() {
        #[rustfmt::skip]
        let mut labels = vec![
            1, 1, 2,
            1, 3, 2,
            3, 3, 0,
        ];
        mode_pool(&mut labels, 3, 3, 2);
        #[rustfmt::skip]
        assert_eq!(labels, vec![
            1, 1, 2,
            1, 1, 2,
            3, 3, 0,
        ]);
    }

    #[test]
    fn block_of_one_is_identity() {
        let mut labels = vec![0, 1, 2, 3, 3, 2];
        mode_pool(&mut labels, 3, 2, 1);
        assert_eq!(labels, vec![0, 1, 2, 3, 3, 2]);
    }

    #[test]
    fn oversized_block_covers_everything() {
        let mut labels = vec![2, 1, 2, 0, 2, 3];
        mode_pool(&mut labels, 2, 3, 10);
        assert_eq!(labels, vec![2; 6]);
    }
}

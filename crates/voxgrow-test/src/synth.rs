//! Synthetic volumes shared by the regression tests

use voxgrow_core::{Dims, FVolume, LabelVolume, Volume};

/// Background voxel of [`two_label_cube`]
pub const TWO_LABEL_BACKGROUND: (usize, usize, usize) = (2, 4, 4);

/// A 5x5x5 cube split into two 62-voxel labels.
///
/// Label 1 covers the slab `x < 2` plus the first 12 voxels of plane `x == 2`
/// (in `z`-fastest order); label 2 covers the rest, except for the single
/// background voxel [`TWO_LABEL_BACKGROUND`]. Label 1 voxels have intensity
/// 1.0 and label 2 voxels 3.0.
pub fn two_label_cube() -> (LabelVolume, FVolume) {
    let dims = Dims::new(5, 5, 5).unwrap();
    let labels = Volume::from_fn(dims, |x, y, z| {
        if (x, y, z) == TWO_LABEL_BACKGROUND {
            0
        } else if x < 2 || (x == 2 && y * 5 + z < 12) {
            1
        } else {
            2
        }
    });
    let labels = LabelVolume::new(labels);
    let image = intensity_from_labels(&labels, |label| match label {
        1 => 1.0,
        2 => 3.0,
        _ => 0.0,
    });
    (labels, image)
}

/// A row of `count` labels along x, each `width` voxels thick, on a
/// `(count * width) x ny x nz` grid. Label `i` (1-based) only touches
/// labels `i - 1` and `i + 1`.
pub fn label_row(count: usize, width: usize, ny: usize, nz: usize) -> LabelVolume {
    let dims = Dims::new(count * width, ny, nz).unwrap();
    LabelVolume::new(Volume::from_fn(dims, |x, _, _| (x / width) as u32 + 1))
}

/// A grid of cubic blocks, one label per block in scan order (x fastest)
pub fn block_grid(blocks: (usize, usize, usize), block: usize) -> LabelVolume {
    let (bx, by, _) = blocks;
    let dims = Dims::new(blocks.0 * block, blocks.1 * block, blocks.2 * block).unwrap();
    LabelVolume::new(Volume::from_fn(dims, |x, y, z| {
        let (i, j, k) = (x / block, y / block, z / block);
        (i + j * bx + k * bx * by) as u32 + 1
    }))
}

/// Paint an intensity volume from a per-label value
pub fn intensity_from_labels(labels: &LabelVolume, f: impl Fn(u32) -> f32) -> FVolume {
    labels.as_volume().map(f)
}

/// A volume with gaussian bumps of the given heights at the given centers
pub fn gaussian_bumps(
    dims: Dims,
    bumps: &[((f32, f32, f32), f32)],
    width: f32,
) -> FVolume {
    FVolume::from_fn(dims, |x, y, z| {
        bumps
            .iter()
            .map(|&((cx, cy, cz), height)| {
                let d2 = (x as f32 - cx).powi(2)
                    + (y as f32 - cy).powi(2)
                    + (z as f32 - cz).powi(2);
                height * (-d2 / (2.0 * width * width)).exp()
            })
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_label_cube_counts() {
        let (labels, image) = two_label_cube();
        let ones = labels.data().iter().filter(|&&l| l == 1).count();
        let twos = labels.data().iter().filter(|&&l| l == 2).count();
        assert_eq!(ones, 62);
        assert_eq!(twos, 62);
        let (x, y, z) = TWO_LABEL_BACKGROUND;
        assert_eq!(labels.get(x, y, z), Some(0));
        assert_eq!(image.get(0, 0, 0), Some(1.0));
        assert_eq!(image.get(4, 4, 4), Some(3.0));
    }

    #[test]
    fn test_label_row() {
        let labels = label_row(4, 2, 3, 3);
        assert_eq!(labels.labels(), vec![1, 2, 3, 4]);
        assert_eq!(labels.get(0, 0, 0), Some(1));
        assert_eq!(labels.get(7, 2, 2), Some(4));
    }

    #[test]
    fn test_block_grid() {
        let labels = block_grid((2, 2, 2), 3);
        assert_eq!(labels.labels().len(), 8);
        assert_eq!(labels.get(3, 0, 0), Some(2));
        assert_eq!(labels.get(0, 3, 0), Some(3));
        assert_eq!(labels.get(0, 0, 3), Some(5));
    }
}

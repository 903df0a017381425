//! Per-label lookup tables
//!
//! A `RegionIndex` is computed once per (label volume, intensity volume) pair
//! and then shared read-only by every region of a growth run. It holds each
//! label's voxel list, voxel count and intensity sum, so region statistics
//! and frontier updates cost time proportional to the labels involved rather
//! than to the whole volume.
//!
//! Tables are keyed by the sorted distinct labels, so sparse or very large
//! label ids cost nothing beyond the labels actually present.

use std::fmt;

use crate::conncomp::{ConnectivityType, Neighborhood};
use crate::error::{RegionError, RegionResult};
use voxgrow_core::{Dims, FVolume, LabelVolume};

/// Per-label voxel lists and intensity sums
pub struct RegionIndex {
    labels: LabelVolume,
    image: FVolume,
    hood: Neighborhood,
    /// Sorted distinct positive labels; slot `i` of the tables below
    label_ids: Vec<u32>,
    members: Vec<Vec<usize>>,
    sums: Vec<f64>,
}

impl RegionIndex {
    /// Build the index for a label volume over an intensity volume
    ///
    /// # Errors
    ///
    /// Returns `RegionError::Core` if the two volumes differ in shape.
    pub fn new(labels: LabelVolume, image: FVolume) -> RegionResult<Self> {
        labels.ensure_dims(image.dims())?;
        let label_ids = labels.labels();
        let n = label_ids.len();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sums = vec![0.0f64; n];
        let mut last: Option<(u32, usize)> = None;
        for (idx, (&label, &value)) in labels.data().iter().zip(image.data()).enumerate() {
            if label == 0 {
                continue;
            }
            // Runs of one label are common; skip the search for them
            let slot = match last {
                Some((l, slot)) if l == label => slot,
                _ => match label_ids.binary_search(&label) {
                    Ok(slot) => slot,
                    Err(_) => continue,
                },
            };
            last = Some((label, slot));
            members[slot].push(idx);
            sums[slot] += value as f64;
        }
        let hood = Neighborhood::new(labels.dims(), ConnectivityType::SixWay);
        Ok(Self {
            labels,
            image,
            hood,
            label_ids,
            members,
            sums,
        })
    }

    /// The partition
    #[inline]
    pub fn labels(&self) -> &LabelVolume {
        &self.labels
    }

    /// The intensities
    #[inline]
    pub fn image(&self) -> &FVolume {
        &self.image
    }

    /// Shared shape
    #[inline]
    pub fn dims(&self) -> Dims {
        self.labels.dims()
    }

    /// The structuring element used for adjacency (6-connected cross)
    #[inline]
    pub fn neighborhood(&self) -> &Neighborhood {
        &self.hood
    }

    /// Sorted positive labels present in the partition
    #[inline]
    pub fn label_ids(&self) -> &[u32] {
        &self.label_ids
    }

    /// Number of atomic regions
    #[inline]
    pub fn region_count(&self) -> usize {
        self.label_ids.len()
    }

    /// Label of the `index`-th atomic region
    ///
    /// # Errors
    ///
    /// Returns `RegionError::IndexOutOfRange` unless `index < region_count()`.
    pub fn label_at(&self, index: usize) -> RegionResult<u32> {
        self.label_ids
            .get(index)
            .copied()
            .ok_or(RegionError::IndexOutOfRange {
                index,
                len: self.label_ids.len(),
            })
    }

    #[inline]
    fn slot(&self, label: u32) -> Option<usize> {
        self.label_ids.binary_search(&label).ok()
    }

    /// True if `label` is a positive label present in the partition
    #[inline]
    pub fn has_label(&self, label: u32) -> bool {
        label > 0 && self.slot(label).is_some()
    }

    /// Flat voxel indices of a label (empty for unknown labels)
    #[inline]
    pub fn voxels(&self, label: u32) -> &[usize] {
        self.slot(label)
            .map_or(&[][..], |slot| self.members[slot].as_slice())
    }

    /// Voxel count of a label
    #[inline]
    pub fn voxel_count(&self, label: u32) -> usize {
        self.voxels(label).len()
    }

    /// Intensity sum of a label
    #[inline]
    pub fn intensity_sum(&self, label: u32) -> f64 {
        self.slot(label).map_or(0.0, |slot| self.sums[slot])
    }

    /// Mean intensity of a label (0 for unknown labels)
    pub fn label_mean(&self, label: u32) -> f64 {
        let count = self.voxel_count(label);
        if count == 0 {
            0.0
        } else {
            self.intensity_sum(label) / count as f64
        }
    }
}

impl fmt::Debug for RegionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionIndex")
            .field("dims", &self.dims())
            .field("region_count", &self.region_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_stats() {
        let dims = Dims::new(4, 1, 1).unwrap();
        let labels = LabelVolume::from_data(dims, vec![0, 3, 3, 1]).unwrap();
        let image = FVolume::from_data(dims, vec![9.0, 1.0, 2.0, 5.0]).unwrap();
        let index = RegionIndex::new(labels, image).unwrap();

        assert_eq!(index.label_ids(), &[1, 3]);
        assert_eq!(index.voxels(3), &[1, 2]);
        assert_eq!(index.voxel_count(1), 1);
        assert!((index.label_mean(3) - 1.5).abs() < 1e-12);
        assert!(!index.has_label(2));
        assert!(!index.has_label(0));
        assert_eq!(index.voxel_count(42), 0);
    }

    #[test]
    fn test_sparse_large_labels() {
        let dims = Dims::new(4, 1, 1).unwrap();
        let big = 3_000_000_000;
        let labels = LabelVolume::from_data(dims, vec![1, big, big, 0]).unwrap();
        let image = FVolume::from_data(dims, vec![1.0, 2.0, 4.0, 0.0]).unwrap();
        let index = RegionIndex::new(labels, image).unwrap();

        assert_eq!(index.label_ids(), &[1, big]);
        assert_eq!(index.voxels(big), &[1, 2]);
        assert!((index.label_mean(big) - 3.0).abs() < 1e-12);
        assert!(!index.has_label(big - 1));
        assert_eq!(index.intensity_sum(7), 0.0);
    }

    #[test]
    fn test_label_at() {
        let dims = Dims::new(3, 1, 1).unwrap();
        let labels = LabelVolume::from_data(dims, vec![4, 0, 7]).unwrap();
        let image = FVolume::new(dims, 0.0);
        let index = RegionIndex::new(labels, image).unwrap();
        assert_eq!(index.label_at(1).unwrap(), 7);
        assert!(matches!(
            index.label_at(2),
            Err(RegionError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let labels = LabelVolume::from_data(Dims::new(2, 1, 1).unwrap(), vec![1, 1]).unwrap();
        let image = FVolume::new(Dims::new(3, 1, 1).unwrap(), 0.0);
        assert!(matches!(
            RegionIndex::new(labels, image),
            Err(RegionError::Core(_))
        ));
    }
}

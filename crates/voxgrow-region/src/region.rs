//! Region - the unit of seeded region growing
//!
//! A region is a set of absorbed label ids plus the set of adjacent label ids
//! not yet absorbed (its frontier). The two sets are always disjoint. The
//! voxel mask is never stored; it is derived from the ids over the shared
//! [`RegionIndex`].
//!
//! Mean intensity and size are cached together in a [`StatCache`]. Every
//! mutation of the id set goes through `invalidate`, and `refresh_stats` is
//! the only place the cache is filled.
//!
//! Neighbor discovery is incremental: ids absorbed since the last refresh are
//! queued, and [`Region::recompute_neighbors`] only scans the voxels of those
//! labels. A release shrinks the boundary, so the refresh after one falls back
//! to a full pass. Either way the result matches
//! [`Region::recompute_neighbors_full`], which dilates the whole region mask
//! by one 6-connected step.
//!
//! # Examples
//!
//! ```
//! use voxgrow_core::{Dims, FVolume, LabelVolume};
//! use voxgrow_region::{Region, RegionIndex};
//!
//! let dims = Dims::new(3, 1, 1).unwrap();
//! let labels = LabelVolume::from_data(dims, vec![1, 2, 3]).unwrap();
//! let image = FVolume::from_data(dims, vec![1.0, 2.0, 6.0]).unwrap();
//! let index = RegionIndex::new(labels, image).unwrap();
//!
//! let mut region = Region::from_label(&index, 1).unwrap();
//! region.recompute_neighbors();
//! assert_eq!(region.neighbor_ids().to_vec(), vec![2]);
//!
//! region.absorb_label(2);
//! region.recompute_neighbors();
//! assert_eq!(region.mean(), 1.5);
//! assert_eq!(region.neighbor_ids().to_vec(), vec![3]);
//! ```

use std::fmt;

use crate::error::{RegionError, RegionResult};
use crate::idset::IdSet;
use crate::index::RegionIndex;
use voxgrow_core::MaskVolume;

/// Summary statistics of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    /// Mean intensity over the region's voxels (0 for an empty region)
    pub mean: f64,
    /// Number of voxels
    pub size: usize,
}

/// Lazily filled statistics; `None` means dirty
#[derive(Debug, Clone, Default)]
pub struct StatCache {
    value: Option<RegionStats>,
}

impl StatCache {
    /// True if the cached value may be returned as is
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    fn get(&self) -> Option<RegionStats> {
        self.value
    }

    #[inline]
    fn store(&mut self, stats: RegionStats) {
        self.value = Some(stats);
    }

    #[inline]
    fn invalidate(&mut self) {
        self.value = None;
    }
}

/// A growing region over a shared [`RegionIndex`]
#[derive(Clone)]
pub struct Region<'a> {
    index: &'a RegionIndex,
    ids: IdSet,
    neighbors: IdSet,
    cache: StatCache,
    /// Ids absorbed since the last neighbor refresh
    pending: Vec<u32>,
    /// Set by `release`; the next refresh rebuilds the frontier
    frontier_stale: bool,
    recomputations: usize,
}

impl<'a> Region<'a> {
    /// Create a region from a set of label ids
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidArgument` if any id is not a label of the
    /// partition.
    pub fn from_ids(index: &'a RegionIndex, ids: IdSet) -> RegionResult<Self> {
        if let Some(bad) = ids.iter().find(|&id| !index.has_label(id)) {
            return Err(RegionError::InvalidArgument(format!(
                "label {bad} is not part of the partition"
            )));
        }
        Ok(Self {
            index,
            pending: ids.to_vec(),
            ids,
            neighbors: IdSet::new(),
            cache: StatCache::default(),
            frontier_stale: false,
            recomputations: 0,
        })
    }

    /// Create an atomic region holding a single label
    pub fn from_label(index: &'a RegionIndex, label: u32) -> RegionResult<Self> {
        Self::from_ids(index, std::iter::once(label).collect())
    }

    /// The index this region reads from
    #[inline]
    pub fn index(&self) -> &'a RegionIndex {
        self.index
    }

    /// Absorbed label ids
    #[inline]
    pub fn ids(&self) -> &IdSet {
        &self.ids
    }

    /// Adjacent label ids not yet absorbed
    #[inline]
    pub fn neighbor_ids(&self) -> &IdSet {
        &self.neighbors
    }

    /// True if `label` has been absorbed
    #[inline]
    pub fn contains(&self, label: u32) -> bool {
        self.ids.contains(label)
    }

    /// Number of absorbed labels
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.ids.len()
    }

    /// True if the cached statistics are current
    #[inline]
    pub fn is_cache_valid(&self) -> bool {
        self.cache.is_valid()
    }

    /// How many times statistics have been recomputed
    #[inline]
    pub fn stat_recomputations(&self) -> usize {
        self.recomputations
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    fn refresh_stats(&mut self) -> RegionStats {
        if let Some(stats) = self.cache.get() {
            return stats;
        }
        let (sum, size) = self.ids.iter().fold((0.0f64, 0usize), |(sum, size), id| {
            (
                sum + self.index.intensity_sum(id),
                size + self.index.voxel_count(id),
            )
        });
        let stats = RegionStats {
            mean: if size == 0 { 0.0 } else { sum / size as f64 },
            size,
        };
        self.cache.store(stats);
        self.recomputations += 1;
        stats
    }

    /// Mean intensity and voxel count
    pub fn stats(&mut self) -> RegionStats {
        self.refresh_stats()
    }

    /// Mean intensity over the region's voxels
    pub fn mean(&mut self) -> f64 {
        self.refresh_stats().mean
    }

    /// Number of voxels in the region
    pub fn size(&mut self) -> usize {
        self.refresh_stats().size
    }

    /// Number of voxels whose label is in the neighbor set
    pub fn neighbor_size(&self) -> usize {
        self.neighbors
            .iter()
            .map(|id| self.index.voxel_count(id))
            .sum()
    }

    /// Merge another region into this one
    ///
    /// Ids are united, the other region's neighbors are added, and then every
    /// id now inside the region is dropped from the neighbor set. Both
    /// regions must read from the same index.
    pub fn absorb(&mut self, other: &Region<'a>) {
        debug_assert!(
            std::ptr::eq(self.index, other.index),
            "absorbing a region built over another index"
        );
        self.pending
            .extend(other.ids.iter().filter(|&id| !self.ids.contains(id)));
        self.ids.union_with(&other.ids);
        self.invalidate();
        self.neighbors.union_with(&other.neighbors);
        self.neighbors.subtract(&self.ids);
    }

    /// Merge a single atomic label into this region
    pub fn absorb_label(&mut self, label: u32) {
        if self.ids.insert(label) {
            self.pending.push(label);
        }
        self.invalidate();
        self.neighbors.remove(label);
    }

    /// Remove another region's ids from this one
    ///
    /// Only ids present in `other` are removed; ids `other` holds that this
    /// region lacks are ignored. The next neighbor refresh is a full pass.
    pub fn release(&mut self, other: &Region<'a>) {
        debug_assert!(
            std::ptr::eq(self.index, other.index),
            "releasing a region built over another index"
        );
        self.ids.subtract(&other.ids);
        self.pending.retain(|&id| !other.ids.contains(id));
        self.frontier_stale = true;
        self.invalidate();
    }

    fn collect_neighbors(&mut self, labels: impl IntoIterator<Item = u32>) {
        let Self {
            index,
            ids,
            neighbors,
            ..
        } = self;
        let hood = index.neighborhood();
        let volume = index.labels();
        for label in labels {
            for &voxel in index.voxels(label) {
                hood.for_each(voxel, |n| {
                    let other = volume.get_index(n);
                    if other != 0 && !ids.contains(other) {
                        neighbors.insert(other);
                    }
                });
            }
        }
    }

    /// Refresh the neighbor set from the ids absorbed since the last refresh
    pub fn recompute_neighbors(&mut self) {
        if self.frontier_stale {
            self.recompute_neighbors_full();
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        let live: Vec<u32> = pending
            .into_iter()
            .filter(|&id| self.ids.contains(id))
            .collect();
        self.collect_neighbors(live);
    }

    /// Refresh the neighbor set by dilating the whole region mask
    ///
    /// Costs a full pass over the volume; [`Region::recompute_neighbors`]
    /// gives the same neighbor set after any sequence of absorbs and releases.
    pub fn recompute_neighbors_full(&mut self) {
        self.pending.clear();
        self.frontier_stale = false;
        let mask = self.mask();
        let hood = self.index.neighborhood();
        let volume = self.index.labels();
        let mut found = IdSet::new();
        for (idx, &inside) in mask.data().iter().enumerate() {
            if inside {
                continue;
            }
            let mut touches = false;
            hood.for_each(idx, |n| touches |= mask.data()[n]);
            let label = volume.get_index(idx);
            if touches && label != 0 {
                found.insert(label);
            }
        }
        self.neighbors = found;
    }

    /// Voxel mask of the region over the partition's grid
    pub fn mask(&self) -> MaskVolume {
        self.mask_of(&self.ids)
    }

    /// Voxel mask of the neighbor labels
    pub fn neighbor_mask(&self) -> MaskVolume {
        self.mask_of(&self.neighbors)
    }

    fn mask_of(&self, ids: &IdSet) -> MaskVolume {
        let mut mask = self.index.labels().as_volume().map(|_| false);
        let data = mask.data_mut();
        for id in ids.iter() {
            for &voxel in self.index.voxels(id) {
                data[voxel] = true;
            }
        }
        mask
    }

    /// Coordinates of every voxel in the region, in label then scan order
    pub fn voxel_coords(&self) -> Vec<(usize, usize, usize)> {
        let dims = self.index.dims();
        self.ids
            .iter()
            .flat_map(|id| self.index.voxels(id).iter().map(move |&v| dims.coords(v)))
            .collect()
    }
}

impl fmt::Debug for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("ids", &self.ids.to_vec())
            .field("neighbors", &self.neighbors.to_vec())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxgrow_core::{Dims, FVolume, LabelVolume};

    /// 2x2x1 blocks along x: labels 1..=4, intensities 1, 2, 3, 4
    fn row_index() -> RegionIndex {
        let dims = Dims::new(8, 2, 1).unwrap();
        let labels =
            LabelVolume::new(voxgrow_core::Volume::from_fn(dims, |x, _, _| (x / 2) as u32 + 1));
        let image = labels.as_volume().map(|l| l as f32);
        RegionIndex::new(labels, image).unwrap()
    }

    #[test]
    fn test_absorb_keeps_sets_disjoint() {
        let index = row_index();
        let mut a = Region::from_label(&index, 1).unwrap();
        a.recompute_neighbors();
        let mut b = Region::from_label(&index, 2).unwrap();
        b.recompute_neighbors();
        assert_eq!(b.neighbor_ids().to_vec(), vec![1, 3]);

        a.absorb(&b);
        assert_eq!(a.ids().to_vec(), vec![1, 2]);
        assert_eq!(a.neighbor_ids().to_vec(), vec![3]);
        assert!(a.ids().is_disjoint(a.neighbor_ids()));
    }

    #[test]
    fn test_absorb_idempotent() {
        let index = row_index();
        let mut a = Region::from_ids(&index, [1, 2].into_iter().collect()).unwrap();
        a.recompute_neighbors();
        let b = Region::from_label(&index, 2).unwrap();
        a.absorb(&b);
        assert_eq!(a.ids().to_vec(), vec![1, 2]);
        assert_eq!(a.neighbor_ids().to_vec(), vec![3]);
    }

    #[test]
    fn test_release_then_absorb_roundtrip() {
        let index = row_index();
        let mut a = Region::from_ids(&index, [1, 2, 3].into_iter().collect()).unwrap();
        let b = Region::from_ids(&index, [3, 4].into_iter().collect()).unwrap();
        let before = a.ids().clone();

        // 4 isn't in `a`; subtraction must not add it
        a.release(&b);
        assert_eq!(a.ids().to_vec(), vec![1, 2]);

        let c = Region::from_label(&index, 3).unwrap();
        a.absorb(&c);
        assert_eq!(a.ids(), &before);
    }

    #[test]
    fn test_cache_invalidation() {
        let index = row_index();
        let mut a = Region::from_label(&index, 1).unwrap();
        assert!(!a.is_cache_valid());
        assert_eq!(a.mean(), 1.0);
        assert!(a.is_cache_valid());
        assert_eq!(a.mean(), 1.0);
        assert_eq!(a.stat_recomputations(), 1);

        a.absorb_label(3);
        assert!(!a.is_cache_valid());
        assert_eq!(a.mean(), 2.0);
        assert_eq!(a.size(), 8);
        assert_eq!(a.stat_recomputations(), 2);

        let three = Region::from_label(&index, 3).unwrap();
        a.release(&three);
        assert!(!a.is_cache_valid());
        assert_eq!(a.mean(), 1.0);
    }

    #[test]
    fn test_incremental_matches_full() {
        let index = row_index();
        let mut inc = Region::from_label(&index, 2).unwrap();
        let mut full = inc.clone();
        inc.recompute_neighbors();
        full.recompute_neighbors_full();
        assert_eq!(inc.neighbor_ids(), full.neighbor_ids());

        inc.absorb_label(3);
        full.absorb_label(3);
        inc.recompute_neighbors();
        full.recompute_neighbors_full();
        assert_eq!(inc.neighbor_ids().to_vec(), vec![1, 4]);
        assert_eq!(inc.neighbor_ids(), full.neighbor_ids());
    }

    #[test]
    fn test_release_refreshes_frontier() {
        let index = row_index();
        let mut inc = Region::from_ids(&index, [1, 2].into_iter().collect()).unwrap();
        inc.recompute_neighbors();
        assert_eq!(inc.neighbor_ids().to_vec(), vec![3]);

        // 2 still touches 1 and comes back; 3 no longer touches the region
        inc.release(&Region::from_label(&index, 2).unwrap());
        inc.recompute_neighbors();
        assert_eq!(inc.neighbor_ids().to_vec(), vec![2]);

        let mut full = inc.clone();
        full.recompute_neighbors_full();
        assert_eq!(inc.neighbor_ids(), full.neighbor_ids());

        // Incremental refreshes resume after the full pass
        inc.absorb_label(2);
        inc.absorb_label(3);
        inc.recompute_neighbors();
        assert_eq!(inc.neighbor_ids().to_vec(), vec![4]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "another index")]
    fn test_absorb_across_indices_panics() {
        let first = row_index();
        let second = row_index();
        let mut a = Region::from_label(&first, 1).unwrap();
        let b = Region::from_label(&second, 2).unwrap();
        a.absorb(&b);
    }

    #[test]
    fn test_neighbor_size_and_mask() {
        let index = row_index();
        let mut a = Region::from_label(&index, 2).unwrap();
        a.recompute_neighbors();
        assert_eq!(a.neighbor_size(), 8);
        assert_eq!(a.mask().count(), 4);
        assert_eq!(a.neighbor_mask().count(), 8);
        assert_eq!(a.voxel_coords().len(), 4);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let index = row_index();
        assert!(matches!(
            Region::from_label(&index, 9),
            Err(RegionError::InvalidArgument(_))
        ));
        assert!(Region::from_label(&index, 0).is_err());
    }
}

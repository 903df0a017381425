//! Connected component analysis
//!
//! This module provides 3D neighborhoods and the component labelling used to
//! enforce the partitioner post-condition that every positive label is one
//! spatially connected unit.

use std::collections::{BTreeMap, VecDeque};

use voxgrow_core::{Dims, LabelVolume, MaskVolume, Volume};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// Face neighbors only (the cross structuring element)
    #[default]
    SixWay,
    /// Faces and edges
    EighteenWay,
    /// Faces, edges and corners
    TwentySixWay,
}

impl ConnectivityType {
    /// Neighbor offsets for this connectivity, faces first
    pub fn offsets(self) -> Vec<(i64, i64, i64)> {
        let mut offsets = Vec::with_capacity(26);
        for order in 1..=3 {
            for dz in -1i64..=1 {
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        let nonzero = (dx != 0) as i32 + (dy != 0) as i32 + (dz != 0) as i32;
                        if nonzero == order {
                            offsets.push((dx, dy, dz));
                        }
                    }
                }
            }
            if order == self.max_order() {
                break;
            }
        }
        offsets
    }

    fn max_order(self) -> i32 {
        match self {
            ConnectivityType::SixWay => 1,
            ConnectivityType::EighteenWay => 2,
            ConnectivityType::TwentySixWay => 3,
        }
    }
}

/// Precomputed neighbor walk over a fixed grid
#[derive(Debug, Clone)]
pub struct Neighborhood {
    dims: Dims,
    offsets: Vec<(i64, i64, i64)>,
}

impl Neighborhood {
    /// Create a neighborhood for the given grid
    pub fn new(dims: Dims, connectivity: ConnectivityType) -> Self {
        Self {
            dims,
            offsets: connectivity.offsets(),
        }
    }

    /// Call `f` with the flat index of every in-bounds neighbor of `index`
    #[inline]
    pub fn for_each(&self, index: usize, mut f: impl FnMut(usize)) {
        let (x, y, z) = self.dims.coords(index);
        for &(dx, dy, dz) in &self.offsets {
            if let Some(n) = self
                .dims
                .checked_index(x as i64 + dx, y as i64 + dy, z as i64 + dz)
            {
                f(n);
            }
        }
    }
}

/// Label the connected components of a mask
///
/// Returns a label volume where each component gets a label `1..=n` in scan
/// order, and unset voxels are 0.
pub fn label_connected_components(
    mask: &MaskVolume,
    connectivity: ConnectivityType,
) -> LabelVolume {
    let dims = mask.dims();
    let hood = Neighborhood::new(dims, connectivity);
    let mut labels = vec![0u32; dims.len()];
    let mut next = 0u32;
    let mut queue = VecDeque::new();

    for start in 0..dims.len() {
        if !mask.data()[start] || labels[start] != 0 {
            continue;
        }
        next += 1;
        labels[start] = next;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            hood.for_each(idx, |n| {
                if mask.data()[n] && labels[n] == 0 {
                    labels[n] = next;
                    queue.push_back(n);
                }
            });
        }
    }

    LabelVolume::new(volume_like(mask, labels))
}

/// Split every label into its connected components
///
/// Each component of each positive label receives its own label `1..=n`, in
/// scan order of the component's first voxel. Label 0 stays 0.
pub fn split_disconnected(labels: &Volume<u32>, connectivity: ConnectivityType) -> LabelVolume {
    let dims = labels.dims();
    let src = labels.data();
    let hood = Neighborhood::new(dims, connectivity);
    let mut out = vec![0u32; dims.len()];
    let mut next = 0u32;
    let mut queue = VecDeque::new();

    for start in 0..dims.len() {
        let label = src[start];
        if label == 0 || out[start] != 0 {
            continue;
        }
        next += 1;
        out[start] = next;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            hood.for_each(idx, |n| {
                if src[n] == label && out[n] == 0 {
                    out[n] = next;
                    queue.push_back(n);
                }
            });
        }
    }

    LabelVolume::new(volume_like(labels, out))
}

/// Renumber positive labels to `1..=n` in order of first appearance
pub fn relabel_sequential(labels: &Volume<u32>) -> LabelVolume {
    let mut remap: BTreeMap<u32, u32> = BTreeMap::new();
    let mut next = 0u32;
    let data = labels
        .data()
        .iter()
        .map(|&label| {
            if label == 0 {
                return 0;
            }
            *remap.entry(label).or_insert_with(|| {
                next += 1;
                next
            })
        })
        .collect();
    LabelVolume::new(volume_like(labels, data))
}

pub(crate) fn volume_like<T: Copy>(like: &Volume<T>, data: Vec<u32>) -> Volume<u32> {
    let mut out = like.map(|_| 0u32);
    out.data_mut().copy_from_slice(&data);
    out
}

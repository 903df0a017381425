//! LabelVolume - Read-only integer partition of a volume
//!
//! Label 0 marks background or masked-out voxels. Every positive label is one
//! atomic unit of the partition. A `LabelVolume` has no mutating API: once a
//! partitioner produces it, growth runs may share it freely.

use crate::error::{Error, Result};
use crate::volume::{Affine, Dims, MaskVolume, Volume};

/// Immutable integer label volume
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    inner: Volume<u32>,
    max_label: u32,
}

impl LabelVolume {
    /// Wrap a label volume
    pub fn new(volume: Volume<u32>) -> Self {
        let max_label = volume.data().iter().copied().max().unwrap_or(0);
        Self {
            inner: volume,
            max_label,
        }
    }

    /// Build a label volume from column-major data
    ///
    /// # Examples
    ///
    /// ```
    /// use voxgrow_core::{Dims, LabelVolume};
    ///
    /// let dims = Dims::new(2, 2, 1).unwrap();
    /// let labels = LabelVolume::from_data(dims, vec![0, 1, 1, 2]).unwrap();
    /// assert_eq!(labels.labels(), vec![1, 2]);
    /// assert_eq!(labels.max_label(), 2);
    /// ```
    pub fn from_data(dims: Dims, data: Vec<u32>) -> Result<Self> {
        Ok(Self::new(Volume::from_data(dims, data)?))
    }

    /// Get the shape
    #[inline]
    pub fn dims(&self) -> Dims {
        self.inner.dims()
    }

    /// Get the spatial metadata
    #[inline]
    pub fn affine(&self) -> &Affine {
        self.inner.affine()
    }

    /// Label at a voxel, or `None` if out of bounds
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<u32> {
        self.inner.get(x, y, z)
    }

    /// Label at a flat index
    #[inline]
    pub fn get_index(&self, index: usize) -> u32 {
        self.inner.data()[index]
    }

    /// Raw column-major labels
    #[inline]
    pub fn data(&self) -> &[u32] {
        self.inner.data()
    }

    /// Largest label present (0 for an all-background volume)
    #[inline]
    pub fn max_label(&self) -> u32 {
        self.max_label
    }

    /// Sorted distinct positive labels
    pub fn labels(&self) -> Vec<u32> {
        let mut labels: Vec<u32> = self
            .inner
            .data()
            .iter()
            .copied()
            .filter(|&label| label > 0)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Mask of all foreground voxels
    pub fn foreground(&self) -> MaskVolume {
        self.inner.map(|label| label > 0)
    }

    /// Check that another shape matches this one
    pub fn ensure_dims(&self, dims: Dims) -> Result<()> {
        if self.dims() != dims {
            return Err(Error::DimensionMismatch {
                expected: self.dims().as_tuple(),
                actual: dims.as_tuple(),
            });
        }
        Ok(())
    }

    /// Borrow the underlying volume
    pub fn as_volume(&self) -> &Volume<u32> {
        &self.inner
    }
}

//! Volume - Dense 3D array with spatial metadata
//!
//! `Volume<T>` stores one value per voxel in column-major order, so the
//! voxel at (x, y, z) lives at index `x + y * nx + z * nx * ny`. This is the
//! layout NIfTI data arrives in, which keeps conversions at the I/O boundary
//! free of copies.
//!
//! # Examples
//!
//! ```
//! use voxgrow_core::{Dims, FVolume};
//!
//! let dims = Dims::new(4, 4, 4).unwrap();
//! let mut vol = FVolume::new(dims, 0.0);
//! vol.set(1, 2, 3, 5.0).unwrap();
//! assert_eq!(vol.get(1, 2, 3), Some(5.0));
//! assert_eq!(vol.len(), 64);
//! ```

pub mod affine;

use crate::error::{Error, Result};
pub use affine::Affine;

/// Shape of a 3D volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl Dims {
    /// Create a new shape
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any extent is 0.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(Error::InvalidDimension { nx, ny, nz });
        }
        Ok(Self { nx, ny, nz })
    }

    /// Total number of voxels
    #[inline]
    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Always false for a validated shape
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape as a tuple
    #[inline]
    pub fn as_tuple(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Flat index of an in-bounds voxel
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.nx + z * self.nx * self.ny
    }

    /// Flat index of a possibly out-of-bounds signed coordinate
    #[inline]
    pub fn checked_index(&self, x: i64, y: i64, z: i64) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= self.nx || y >= self.ny || z >= self.nz {
            return None;
        }
        Some(self.index(x, y, z))
    }

    /// Voxel coordinates of a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize, usize) {
        let plane = self.nx * self.ny;
        let z = index / plane;
        let rem = index % plane;
        (rem % self.nx, rem / self.nx, z)
    }

    /// Check that another shape matches this one
    pub fn ensure_same(&self, other: &Dims) -> Result<()> {
        if self != other {
            return Err(Error::DimensionMismatch {
                expected: self.as_tuple(),
                actual: other.as_tuple(),
            });
        }
        Ok(())
    }
}

/// Dense 3D volume
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    dims: Dims,
    data: Vec<T>,
    affine: Affine,
}

/// Floating-point intensity volume
pub type FVolume = Volume<f32>;

/// Boolean voxel mask
pub type MaskVolume = Volume<bool>;

impl<T: Copy> Volume<T> {
    /// Create a volume with every voxel set to `value`
    pub fn new(dims: Dims, value: T) -> Self {
        Self {
            dims,
            data: vec![value; dims.len()],
            affine: Affine::identity(),
        }
    }

    /// Create a volume from column-major data
    ///
    /// # Errors
    ///
    /// Returns an error if the data length doesn't match the shape.
    pub fn from_data(dims: Dims, data: Vec<T>) -> Result<Self> {
        if data.len() != dims.len() {
            return Err(Error::InvalidParameter(format!(
                "data length {} doesn't match {}x{}x{} = {}",
                data.len(),
                dims.nx,
                dims.ny,
                dims.nz,
                dims.len()
            )));
        }
        Ok(Self {
            dims,
            data,
            affine: Affine::identity(),
        })
    }

    /// Build a volume by evaluating `f` at every voxel
    pub fn from_fn(dims: Dims, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let data = (0..dims.len())
            .map(|i| {
                let (x, y, z) = dims.coords(i);
                f(x, y, z)
            })
            .collect();
        Self {
            dims,
            data,
            affine: Affine::identity(),
        }
    }

    /// Replace the spatial metadata
    pub fn with_affine(mut self, affine: Affine) -> Self {
        self.affine = affine;
        self
    }

    /// Get the shape
    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Get the spatial metadata
    #[inline]
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Number of voxels
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the volume holds no voxels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a voxel value, or `None` if out of bounds
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<T> {
        if x >= self.dims.nx || y >= self.dims.ny || z >= self.dims.nz {
            return None;
        }
        Some(self.data[self.dims.index(x, y, z)])
    }

    /// Set a voxel value
    ///
    /// # Errors
    ///
    /// Returns `Error::VoxelOutOfBounds` if the coordinate is outside the volume.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) -> Result<()> {
        if x >= self.dims.nx || y >= self.dims.ny || z >= self.dims.nz {
            return Err(Error::VoxelOutOfBounds {
                voxel: (x, y, z),
                dims: self.dims.as_tuple(),
            });
        }
        let idx = self.dims.index(x, y, z);
        self.data[idx] = value;
        Ok(())
    }

    /// Raw column-major data
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable raw column-major data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the volume and return its data
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every voxel, keeping shape and spatial metadata
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Volume<U> {
        Volume {
            dims: self.dims,
            data: self.data.iter().copied().map(f).collect(),
            affine: self.affine,
        }
    }
}

impl Volume<f32> {
    /// Minimum and maximum finite values, or `None` if there are none
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Mean over all voxels
    pub fn mean(&self) -> f64 {
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        sum / self.data.len() as f64
    }
}

impl Volume<bool> {
    /// Number of set voxels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_rejects_zero() {
        assert!(Dims::new(0, 3, 3).is_err());
        assert!(Dims::new(3, 3, 0).is_err());
    }

    #[test]
    fn test_index_coords_roundtrip() {
        let dims = Dims::new(3, 4, 5).unwrap();
        assert_eq!(dims.index(1, 0, 0), 1);
        assert_eq!(dims.index(0, 1, 0), 3);
        assert_eq!(dims.index(0, 0, 1), 12);
        assert_eq!(dims.coords(dims.index(2, 3, 4)), (2, 3, 4));
    }

    #[test]
    fn test_checked_index() {
        let dims = Dims::new(2, 2, 2).unwrap();
        assert_eq!(dims.checked_index(-1, 0, 0), None);
        assert_eq!(dims.checked_index(0, 2, 0), None);
        assert_eq!(dims.checked_index(1, 1, 1), Some(7));
    }

    #[test]
    fn test_from_data_length_mismatch() {
        let dims = Dims::new(2, 2, 2).unwrap();
        assert!(FVolume::from_data(dims, vec![0.0; 7]).is_err());
        assert!(FVolume::from_data(dims, vec![0.0; 8]).is_ok());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let dims = Dims::new(2, 2, 2).unwrap();
        let mut vol = FVolume::new(dims, 0.0);
        assert!(vol.set(2, 0, 0, 1.0).is_err());
    }

    #[test]
    fn test_map_keeps_affine() {
        let dims = Dims::new(2, 1, 1).unwrap();
        let affine = Affine::from_zooms([2.0, 2.0, 2.0], [0.0, 0.0, 0.0]);
        let vol = FVolume::from_data(dims, vec![1.0, 3.0])
            .unwrap()
            .with_affine(affine);
        let mask = vol.map(|v| v > 2.0);
        assert_eq!(mask.data(), &[false, true]);
        assert_eq!(mask.affine(), &affine);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn test_min_max_skips_nan() {
        let dims = Dims::new(3, 1, 1).unwrap();
        let vol = FVolume::from_data(dims, vec![f32::NAN, -2.0, 4.0]).unwrap();
        assert_eq!(vol.min_max(), Some((-2.0, 4.0)));
    }
}

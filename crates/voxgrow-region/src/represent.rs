//! Image representation as atomic regions
//!
//! `ImageRepresent` bridges an intensity volume and its partition: it owns
//! the [`RegionIndex`] and hands out regions by index or by seed voxel.

use crate::error::{RegionError, RegionResult};
use crate::idset::IdSet;
use crate::index::RegionIndex;
use crate::partition::{PartitionOptions, partition};
use crate::region::Region;
use voxgrow_core::{FVolume, LabelVolume, MaskVolume};

/// Validated N x 3 array of voxel coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedCoords {
    coords: Vec<[i64; 3]>,
}

impl SeedCoords {
    /// Build from rows, each of which must hold exactly three coordinates
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidArgument` for an empty array or any row
    /// whose length isn't 3.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxgrow_region::SeedCoords;
    ///
    /// assert!(SeedCoords::from_rows(&[vec![28, 29, 29]]).is_ok());
    /// assert!(SeedCoords::from_rows(&[vec![28, 29]]).is_err());
    /// ```
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> RegionResult<Self> {
        if rows.is_empty() {
            return Err(RegionError::InvalidArgument(
                "seed array is empty, expected shape (N, 3)".to_string(),
            ));
        }
        let coords = rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row.as_ref() {
                &[x, y, z] => Ok([x, y, z]),
                other => Err(RegionError::InvalidArgument(format!(
                    "seed row {i} has {} coordinates, expected shape (N, 3)",
                    other.len()
                ))),
            })
            .collect::<RegionResult<Vec<_>>>()?;
        Ok(Self { coords })
    }

    /// Build from a flat row-major buffer with an explicit shape
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidArgument` unless `shape` is `(N, 3)` with
    /// `N >= 1` and the buffer holds `N * 3` values.
    pub fn from_flat(data: &[i64], shape: (usize, usize)) -> RegionResult<Self> {
        let (rows, cols) = shape;
        if cols != 3 || rows == 0 || data.len() != rows * cols {
            return Err(RegionError::InvalidArgument(format!(
                "seed array of shape ({rows}, {cols}) with {} values, expected shape (N, 3)",
                data.len()
            )));
        }
        Self::from_rows(&data.chunks(3).collect::<Vec<_>>())
    }

    /// Number of seeds
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always false for a validated array
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Seed coordinates
    pub fn iter(&self) -> impl Iterator<Item = [i64; 3]> + '_ {
        self.coords.iter().copied()
    }
}

/// An intensity volume represented by its partition's atomic regions
#[derive(Debug)]
pub struct ImageRepresent {
    index: RegionIndex,
}

impl ImageRepresent {
    /// Represent an image by an existing partition
    pub fn new(image: FVolume, labels: LabelVolume) -> RegionResult<Self> {
        Ok(Self {
            index: RegionIndex::new(labels, image)?,
        })
    }

    /// Partition an image and represent it by the result
    pub fn from_partition(
        image: FVolume,
        mask: Option<&MaskVolume>,
        options: &PartitionOptions,
    ) -> RegionResult<Self> {
        let labels = partition(&image, mask, options)?;
        Self::new(image, labels)
    }

    /// The shared per-label index
    #[inline]
    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    /// The partition
    #[inline]
    pub fn labels(&self) -> &LabelVolume {
        self.index.labels()
    }

    /// Number of atomic regions
    #[inline]
    pub fn region_count(&self) -> usize {
        self.index.region_count()
    }

    /// The `index`-th atomic region, neighbors computed
    ///
    /// # Errors
    ///
    /// Returns `RegionError::IndexOutOfRange` unless `index < region_count()`.
    pub fn region(&self, index: usize) -> RegionResult<Region<'_>> {
        let label = self.index.label_at(index)?;
        let mut region = Region::from_label(&self.index, label)?;
        region.recompute_neighbors();
        Ok(region)
    }

    /// Every atomic region in label order, neighbors computed
    pub fn regions(&self) -> Vec<Region<'_>> {
        (0..self.region_count())
            .filter_map(|i| self.region(i).ok())
            .collect()
    }

    /// The region under one or more seed voxels
    ///
    /// When seeds fall on several labels the atomic regions are merged into
    /// one region spanning all of them.
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidArgument` if a seed lies outside the
    /// volume or on background.
    pub fn region_from_seeds(&self, seeds: &SeedCoords) -> RegionResult<Region<'_>> {
        let dims = self.index.dims();
        let labels = self.index.labels();
        let mut ids = IdSet::new();
        for [x, y, z] in seeds.iter() {
            let idx = dims.checked_index(x, y, z).ok_or_else(|| {
                RegionError::InvalidArgument(format!(
                    "seed ({x}, {y}, {z}) outside volume {:?}",
                    dims.as_tuple()
                ))
            })?;
            let label = labels.get_index(idx);
            if label == 0 {
                return Err(RegionError::InvalidArgument(format!(
                    "seed ({x}, {y}, {z}) lies on background"
                )));
            }
            ids.insert(label);
        }

        let mut labels_iter = ids.iter();
        let first = labels_iter.next().ok_or_else(|| {
            RegionError::InvalidArgument("seed array is empty".to_string())
        })?;
        let mut region = Region::from_label(&self.index, first)?;
        region.recompute_neighbors();
        for label in labels_iter {
            let mut unit = Region::from_label(&self.index, label)?;
            unit.recompute_neighbors();
            region.absorb(&unit);
        }
        region.recompute_neighbors();
        log::debug!(
            "seed region: {} seeds -> labels {:?}",
            seeds.len(),
            region.ids().to_vec()
        );
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxgrow_core::Dims;

    fn represent() -> ImageRepresent {
        let dims = Dims::new(6, 1, 1).unwrap();
        let labels = LabelVolume::from_data(dims, vec![1, 1, 2, 0, 3, 3]).unwrap();
        let image = FVolume::from_data(dims, vec![1.0, 1.0, 2.0, 0.0, 3.0, 3.0]).unwrap();
        ImageRepresent::new(image, labels).unwrap()
    }

    #[test]
    fn test_seed_shape_validation() {
        assert!(SeedCoords::from_rows::<Vec<i64>>(&[]).is_err());
        assert!(SeedCoords::from_rows(&[vec![0, 0, 0], vec![1, 0]]).is_err());
        assert!(SeedCoords::from_flat(&[0, 0, 0, 1, 0, 0], (2, 3)).is_ok());
        assert!(matches!(
            SeedCoords::from_flat(&[0, 0, 0, 1], (2, 2)),
            Err(RegionError::InvalidArgument(_))
        ));
        assert!(SeedCoords::from_flat(&[0, 0, 0], (2, 3)).is_err());
    }

    #[test]
    fn test_region_by_index() {
        let rep = represent();
        assert_eq!(rep.region_count(), 3);
        let region = rep.region(1).unwrap();
        assert_eq!(region.ids().to_vec(), vec![2]);
        assert_eq!(region.neighbor_ids().to_vec(), vec![1]);
        assert!(matches!(
            rep.region(3),
            Err(RegionError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert_eq!(rep.regions().len(), 3);
    }

    #[test]
    fn test_single_seed() {
        let rep = represent();
        let seeds = SeedCoords::from_rows(&[vec![0, 0, 0], vec![1, 0, 0]]).unwrap();
        let region = rep.region_from_seeds(&seeds).unwrap();
        assert_eq!(region.ids().to_vec(), vec![1]);
        assert_eq!(region.neighbor_ids().to_vec(), vec![2]);
    }

    #[test]
    fn test_multi_seed_union() {
        let rep = represent();
        let seeds = SeedCoords::from_rows(&[vec![0, 0, 0], vec![5, 0, 0]]).unwrap();
        let mut region = rep.region_from_seeds(&seeds).unwrap();
        assert_eq!(region.ids().to_vec(), vec![1, 3]);
        assert_eq!(region.neighbor_ids().to_vec(), vec![2]);
        assert_eq!(region.size(), 4);
    }

    #[test]
    fn test_bad_seeds() {
        let rep = represent();
        let outside = SeedCoords::from_rows(&[vec![6, 0, 0]]).unwrap();
        assert!(matches!(
            rep.region_from_seeds(&outside),
            Err(RegionError::InvalidArgument(_))
        ));
        let background = SeedCoords::from_rows(&[vec![3, 0, 0]]).unwrap();
        assert!(rep.region_from_seeds(&background).is_err());
        let negative = SeedCoords::from_rows(&[vec![-1, 0, 0]]).unwrap();
        assert!(rep.region_from_seeds(&negative).is_err());
    }
}

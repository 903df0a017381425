//! voxgrow-region - Partitioning and region bookkeeping
//!
//! This crate provides the region side of seeded region growing:
//!
//! - **Connected component analysis** - 3D neighborhoods and labelling
//! - **Watershed segmentation** - Marker-based flooding of inverted intensities
//! - **SLIC supervoxels** - Grid-seeded intensity/space clustering
//! - **Partitioning** - Method selection and the label volume post-conditions
//! - **Regions** - Id-set bookkeeping, cached statistics and frontier upkeep
//!
//! # Examples
//!
//! ## Partitioning a volume
//!
//! ```
//! use voxgrow_core::{Dims, FVolume};
//! use voxgrow_region::{PartitionOptions, SlicOptions, partition};
//!
//! let dims = Dims::new(8, 4, 4).unwrap();
//! let vol = FVolume::from_fn(dims, |x, _, _| if x < 4 { 0.0 } else { 10.0 });
//! let options = PartitionOptions::from_name("supervoxel")
//!     .unwrap()
//!     .with_slic(SlicOptions::new().with_n_segments(2).with_sigma(0.0));
//! let labels = partition(&vol, None, &options).unwrap();
//! assert_eq!(labels.max_label(), 2);
//! ```
//!
//! ## Seeding a region
//!
//! ```
//! use voxgrow_core::{Dims, FVolume, LabelVolume};
//! use voxgrow_region::{ImageRepresent, SeedCoords};
//!
//! let dims = Dims::new(4, 1, 1).unwrap();
//! let labels = LabelVolume::from_data(dims, vec![1, 1, 2, 2]).unwrap();
//! let image = FVolume::from_data(dims, vec![1.0, 1.0, 3.0, 3.0]).unwrap();
//! let rep = ImageRepresent::new(image, labels).unwrap();
//!
//! let seeds = SeedCoords::from_rows(&[vec![0, 0, 0]]).unwrap();
//! let mut region = rep.region_from_seeds(&seeds).unwrap();
//! assert_eq!(region.mean(), 1.0);
//! assert_eq!(region.neighbor_ids().to_vec(), vec![2]);
//! ```

pub mod conncomp;
pub mod error;
pub mod idset;
pub mod index;
pub mod partition;
pub mod region;
pub mod represent;
pub mod slic;
pub mod variant;
pub mod watershed;

// Re-export core types
pub use voxgrow_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

pub use conncomp::{
    ConnectivityType, Neighborhood, label_connected_components, relabel_sequential,
    split_disconnected,
};
pub use idset::IdSet;
pub use index::RegionIndex;
pub use partition::{PartitionMethod, PartitionOptions, partition};
pub use region::{Region, RegionStats, StatCache};
pub use represent::{ImageRepresent, SeedCoords};
pub use slic::{SlicOptions, slic_segmentation};
pub use variant::parse_variant;
pub use watershed::{
    WatershedOptions, find_regional_minima, flood_from_markers, inverse_transform,
    watershed_segmentation,
};

//! voxgrow - Seeded region growing for 3D volumes
//!
//! # Overview
//!
//! voxgrow grows a region from one or more seed voxels over an
//! over-segmented partition of a scalar volume:
//!
//! - Partitioning (watershed or SLIC supervoxels)
//! - Region bookkeeping with cached statistics and an incremental frontier
//! - Multi-threshold growth with pluggable similarity and stop policies
//! - Objective-based selection among the grown regions
//!
//! # Example
//!
//! ```
//! use voxgrow::{Dims, FVolume, SrgConfig, run_pipeline};
//! use voxgrow::region::{PartitionOptions, SeedCoords, WatershedOptions};
//!
//! let dims = Dims::new(8, 8, 8).unwrap();
//! let image = FVolume::from_fn(dims, |x, y, z| {
//!     let d2 = (x as f32 - 3.0).powi(2) + (y as f32 - 3.0).powi(2) + (z as f32 - 3.0).powi(2);
//!     (-d2 / 8.0).exp()
//! });
//! let config = SrgConfig::new("watershed", "euclidean", "size", "ac", vec![1.0, 8.0]).unwrap();
//! let partition = PartitionOptions::default()
//!     .with_watershed(WatershedOptions::new().with_sigma(0.0));
//! let seeds = SeedCoords::from_rows(&[vec![3, 3, 3]]).unwrap();
//!
//! let output = run_pipeline(&image, None, &seeds, &config, &partition).unwrap();
//! assert_eq!(output.masks.len(), 2);
//! ```

pub mod pipeline;

// Re-export core types (primary data structures used everywhere)
pub use voxgrow_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use voxgrow_grow as grow;
pub use voxgrow_region as region;

pub use pipeline::{PipelineOutput, run_pipeline};
pub use voxgrow_grow::{GrowError, GrowResult, SrgConfig};

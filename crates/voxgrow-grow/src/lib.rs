//! voxgrow-grow - Seeded region growing engine
//!
//! This crate grows seed regions over a partition and ranks the results:
//!
//! - **Similarity** - Scoring frontier labels against a region
//! - **Stop criteria** - Deciding when a threshold is met
//! - **Growing** - The multi-threshold growth loop
//! - **Optimizer** - Scoring and selecting grown regions
//! - **Configuration** - Name-keyed run settings validated up front
//!
//! # Examples
//!
//! ```
//! use voxgrow_core::{Dims, FVolume, LabelVolume};
//! use voxgrow_grow::{Optimizer, RegionGrower, SrgConfig};
//! use voxgrow_region::{ImageRepresent, SeedCoords};
//!
//! let dims = Dims::new(6, 1, 1).unwrap();
//! let labels = LabelVolume::from_data(dims, vec![1, 1, 2, 2, 3, 3]).unwrap();
//! let image = FVolume::from_data(dims, vec![8.0, 8.0, 7.0, 7.0, 1.0, 1.0]).unwrap();
//! let rep = ImageRepresent::new(image, labels).unwrap();
//!
//! let config = SrgConfig::new("slic", "euclidean", "size", "ac", vec![2.0, 4.0, 6.0]).unwrap();
//! let seed = rep
//!     .region_from_seeds(&SeedCoords::from_rows(&[vec![0, 0, 0]]).unwrap())
//!     .unwrap();
//! let result = RegionGrower::from_config(&config).grow(seed, &config.thresholds);
//!
//! let optimizer = Optimizer::new(config.objective);
//! let scores = optimizer
//!     .compute(&[result.regions], rep.index().image())
//!     .unwrap();
//! let best = Optimizer::select(&scores).unwrap();
//! assert_eq!(best.index, 1);
//! ```

pub mod config;
pub mod error;
pub mod growing;
pub mod optimizer;
pub mod similarity;
pub mod stop;
pub mod threshold;

// Re-export dependent crates
pub use voxgrow_core;
pub use voxgrow_region;

// Re-export error types
pub use error::{GrowError, GrowResult};

pub use config::{GrowthOptions, SrgConfig};
pub use growing::{GrowthResult, GrowthState, RegionGrower};
pub use optimizer::{Objective, Optimizer, Selection};
pub use similarity::{SimilarityCriterion, SimilarityMetric};
pub use stop::{StopCriterion, StopPolicy};
pub use threshold::ThresholdSeries;

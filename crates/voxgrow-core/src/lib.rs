//! voxgrow Core - Basic data structures for volumetric region growing
//!
//! This crate provides the fundamental data structures used throughout
//! the voxgrow workspace:
//!
//! - [`Volume`] / [`FVolume`] / [`MaskVolume`] - Dense 3D arrays
//! - [`Dims`] - Volume shape and index arithmetic
//! - [`Affine`] - Voxel-to-world spatial metadata
//! - [`LabelVolume`] - Read-only integer partition of a volume
//! - [`filter`] - Masking, gaussian smoothing and intensity rescaling

pub mod error;
pub mod filter;
pub mod label;
pub mod volume;

pub use error::{Error, Result};
pub use filter::{apply_mask, gaussian_smooth, rescale_intensity};
pub use label::LabelVolume;
pub use volume::{Affine, Dims, FVolume, MaskVolume, Volume};

//! Error types for voxgrow-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// voxgrow core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid volume dimensions
    #[error("invalid volume dimensions: {nx}x{ny}x{nz}")]
    InvalidDimension { nx: usize, ny: usize, nz: usize },

    /// Two volumes that must share a grid do not
    #[error("dimension mismatch: expected {}x{}x{}, got {}x{}x{}", .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2)]
    DimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    /// Voxel coordinate outside the volume
    #[error("voxel {voxel:?} outside volume {dims:?}")]
    VoxelOutOfBounds {
        voxel: (usize, usize, usize),
        dims: (usize, usize, usize),
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for voxgrow core operations
pub type Result<T> = std::result::Result<T, Error>;

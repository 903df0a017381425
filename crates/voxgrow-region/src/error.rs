//! Error types for voxgrow-region

use thiserror::Error;

/// Errors that can occur during partitioning and region bookkeeping
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxgrow_core::Error),

    /// Unknown method name or unusable option value
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed caller input (seed array shape, coordinates)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Region lookup by an index outside `[0, len)`
    #[error("region index out of range: {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

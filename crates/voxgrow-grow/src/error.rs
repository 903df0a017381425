//! Error types for voxgrow-grow

use thiserror::Error;

/// Errors that can occur while configuring or running region growing
#[derive(Debug, Error)]
pub enum GrowError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] voxgrow_core::Error),

    /// Region bookkeeping error
    #[error("region error: {0}")]
    Region(#[from] voxgrow_region::RegionError),

    /// Unknown similarity, stop or objective name, or unusable option value
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Malformed caller input (threshold series, candidate lists)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for growing operations
pub type GrowResult<T> = Result<T, GrowError>;

//! Label volume construction
//!
//! Turns an intensity volume (plus optional mask) into the over-segmented
//! partition that region growing works on. Both methods guarantee that label
//! 0 is reserved for masked or background voxels and that every positive
//! label is one 6-connected unit numbered `1..=n`.

use std::fmt;
use std::str::FromStr;

use strum_macros::{Display, EnumIter};

use crate::conncomp::{ConnectivityType, relabel_sequential, split_disconnected};
use crate::error::{RegionError, RegionResult};
use crate::slic::{SlicOptions, slic_segmentation};
use crate::variant::parse_variant;
use crate::watershed::{WatershedOptions, watershed_segmentation};
use voxgrow_core::{FVolume, LabelVolume, MaskVolume};

/// Partitioning method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PartitionMethod {
    /// Marker-based watershed on the inverted intensities
    Watershed,
    /// SLIC supervoxels
    #[default]
    Supervoxel,
}

impl FromStr for PartitionMethod {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("slic") {
            return Ok(PartitionMethod::Supervoxel);
        }
        parse_variant("partition method", s)
    }
}

/// Options for partitioning
#[derive(Debug, Clone, Default)]
pub struct PartitionOptions {
    /// Which partitioner to run
    pub method: PartitionMethod,
    /// Watershed settings
    pub watershed: WatershedOptions,
    /// Supervoxel settings
    pub slic: SlicOptions,
}

impl PartitionOptions {
    /// Create options for the given method with default settings
    pub fn new(method: PartitionMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Create options from a method name
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidConfiguration` for an unknown name.
    pub fn from_name(method: &str) -> RegionResult<Self> {
        Ok(Self::new(method.parse()?))
    }

    /// Set watershed settings
    pub fn with_watershed(mut self, watershed: WatershedOptions) -> Self {
        self.watershed = watershed;
        self
    }

    /// Set supervoxel settings
    pub fn with_slic(mut self, slic: SlicOptions) -> Self {
        self.slic = slic;
        self
    }
}

impl fmt::Display for PartitionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            PartitionMethod::Watershed => write!(
                f,
                "watershed(sigma={}, threshold={:?})",
                self.watershed.sigma, self.watershed.threshold
            ),
            PartitionMethod::Supervoxel => write!(
                f,
                "supervoxel(n_segments={}, compactness={})",
                self.slic.n_segments, self.slic.compactness
            ),
        }
    }
}

/// Partition a volume into a label volume
///
/// # Errors
///
/// Returns an error if the mask shape differs from the volume or if the
/// method settings are unusable.
pub fn partition(
    volume: &FVolume,
    mask: Option<&MaskVolume>,
    options: &PartitionOptions,
) -> RegionResult<LabelVolume> {
    if let Some(mask) = mask {
        volume.dims().ensure_same(&mask.dims())?;
    }

    let labels = match options.method {
        PartitionMethod::Watershed => watershed_segmentation(volume, mask, &options.watershed)?,
        PartitionMethod::Supervoxel => slic_segmentation(volume, mask, &options.slic)?,
    };

    // Watershed basins flooded through 18/26 neighbors may only be connected
    // diagonally; split them so the 6-connected post-condition holds.
    let labels = split_disconnected(labels.as_volume(), ConnectivityType::SixWay);
    let mut data = labels.as_volume().clone();
    if let Some(mask) = mask {
        for (label, &keep) in data.data_mut().iter_mut().zip(mask.data()) {
            if !keep {
                *label = 0;
            }
        }
    }
    let labels = relabel_sequential(&data.with_affine(*volume.affine()));

    log::debug!("partition {}: {} labels", options, labels.max_label());
    Ok(labels)
}

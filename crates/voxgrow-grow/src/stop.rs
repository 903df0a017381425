//! Stop policies
//!
//! A stop policy decides whether a region has grown far enough for one
//! threshold of the series.

use std::str::FromStr;

use strum_macros::{Display, EnumIter};

use crate::config::parse_name;
use crate::error::GrowError;
use voxgrow_region::Region;

/// Decides when growth for a threshold is complete
pub trait StopPolicy {
    /// True once `region` satisfies `threshold`
    fn is_met(&self, region: &mut Region<'_>, threshold: f64) -> bool;
}

/// Built-in stop criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StopCriterion {
    /// Region voxel count reaches the threshold
    #[default]
    Size,
    /// Number of absorbed labels reaches the threshold
    Units,
}

impl StopPolicy for StopCriterion {
    fn is_met(&self, region: &mut Region<'_>, threshold: f64) -> bool {
        match self {
            StopCriterion::Size => region.size() as f64 >= threshold,
            StopCriterion::Units => region.unit_count() as f64 >= threshold,
        }
    }
}

impl FromStr for StopCriterion {
    type Err = GrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("stop criterion", s)
    }
}

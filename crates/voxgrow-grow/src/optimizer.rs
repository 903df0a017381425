//! Region hypothesis selection
//!
//! Scores grown regions against the intensity volume and picks the best
//! one. Candidates come in families (typically one family per growth run,
//! one region per threshold); the selection reports both coordinates.

use std::str::FromStr;

use strum_macros::{Display, EnumIter};

use crate::config::parse_name;
use crate::error::{GrowError, GrowResult};
use voxgrow_core::{FVolume, MaskVolume};
use voxgrow_region::Region;

/// Objective functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Objective {
    /// Activation concentration: mean inside minus mean of every voxel outside
    /// (0 when either side is empty)
    #[default]
    Ac,
    /// Peripheral contrast: mean inside minus mean over the neighbor labels
    Pc,
}

impl FromStr for Objective {
    type Err = GrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("objective", s)
    }
}

/// Position and value of the best candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Family the candidate belongs to
    pub family: usize,
    /// Position within the family (the threshold index for a growth run)
    pub index: usize,
    /// Objective value
    pub value: f64,
}

/// Scores candidate regions with one objective
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimizer {
    objective: Objective,
}

/// Running sum/count pair
#[derive(Default)]
struct Accum {
    sum: f64,
    count: usize,
}

impl Accum {
    fn add(&mut self, v: f32) {
        self.sum += v as f64;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn masked_mean(image: &FVolume, mask: &MaskVolume) -> Option<f64> {
    let mut acc = Accum::default();
    for (&v, &m) in image.data().iter().zip(mask.data()) {
        if m {
            acc.add(v);
        }
    }
    acc.mean()
}

impl Optimizer {
    /// Create an optimizer for an objective
    pub fn new(objective: Objective) -> Self {
        Self { objective }
    }

    /// Create an optimizer from an objective name
    ///
    /// # Errors
    ///
    /// Returns `GrowError::InvalidConfiguration` for an unknown name.
    pub fn from_name(name: &str) -> GrowResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// The objective in use
    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Objective value of one region
    ///
    /// # Errors
    ///
    /// Returns `GrowError::Core` if `image` doesn't match the partition's
    /// dimensions.
    pub fn score(&self, region: &Region<'_>, image: &FVolume) -> GrowResult<f64> {
        region.index().dims().ensure_same(&image.dims())?;
        let mask = region.mask();
        let value = match self.objective {
            Objective::Ac => {
                let mut inside = Accum::default();
                let mut outside = Accum::default();
                for (&v, &m) in image.data().iter().zip(mask.data()) {
                    if m {
                        inside.add(v);
                    } else {
                        outside.add(v);
                    }
                }
                match (inside.mean(), outside.mean()) {
                    (Some(inside), Some(outside)) => inside - outside,
                    _ => 0.0,
                }
            }
            Objective::Pc => {
                let ring = region.neighbor_mask();
                match masked_mean(image, &ring) {
                    Some(ring_mean) => masked_mean(image, &mask).unwrap_or(0.0) - ring_mean,
                    None => 0.0,
                }
            }
        };
        Ok(value)
    }

    /// Score every candidate, one row per family
    pub fn compute(
        &self,
        families: &[Vec<Region<'_>>],
        image: &FVolume,
    ) -> GrowResult<Vec<Vec<f64>>> {
        families
            .iter()
            .map(|family| {
                family
                    .iter()
                    .map(|region| self.score(region, image))
                    .collect()
            })
            .collect()
    }

    /// The maximum of a score matrix; the first candidate wins ties
    ///
    /// # Errors
    ///
    /// Returns `GrowError::InvalidArgument` if there are no candidates.
    pub fn select(scores: &[Vec<f64>]) -> GrowResult<Selection> {
        let mut best: Option<Selection> = None;
        for (family, row) in scores.iter().enumerate() {
            for (index, &value) in row.iter().enumerate() {
                let better = match best {
                    None => true,
                    Some(b) => value > b.value || (b.value.is_nan() && !value.is_nan()),
                };
                if better {
                    best = Some(Selection {
                        family,
                        index,
                        value,
                    });
                }
            }
        }
        best.ok_or_else(|| {
            GrowError::InvalidArgument("no candidate regions to select from".to_string())
        })
    }
}

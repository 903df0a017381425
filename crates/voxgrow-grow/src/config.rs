//! Run configuration
//!
//! Every name-keyed choice of a run is parsed here, together with the
//! threshold series, so a bad configuration fails before any partitioning
//! work starts.

use std::fmt::{self, Display};

use strum::IntoEnumIterator;

use crate::error::{GrowError, GrowResult};
use crate::optimizer::Objective;
use crate::similarity::SimilarityMetric;
use crate::stop::StopCriterion;
use crate::threshold::ThresholdSeries;
use voxgrow_region::{PartitionMethod, RegionError, parse_variant};

/// Parse a case-insensitive variant name into a grow-level error
pub(crate) fn parse_name<E>(kind: &str, name: &str) -> GrowResult<E>
where
    E: IntoEnumIterator + Display,
{
    parse_variant(kind, name).map_err(lift_config_error)
}

/// Keep configuration failures classified as such at this level
fn lift_config_error(err: RegionError) -> GrowError {
    match err {
        RegionError::InvalidConfiguration(msg) => GrowError::InvalidConfiguration(msg),
        other => GrowError::Region(other),
    }
}

/// Options for a growth run
#[derive(Debug, Clone, Default)]
pub struct GrowthOptions {
    /// Maximum number of absorb steps; `None` grows until every threshold
    /// is met or the frontier is empty
    pub max_steps: Option<usize>,
}

impl GrowthOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of absorb steps
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}

/// Validated configuration of one seeded region growing run
#[derive(Debug, Clone)]
pub struct SrgConfig {
    /// Partitioner used to build the label volume
    pub method: PartitionMethod,
    /// Ranks frontier labels
    pub similarity: SimilarityMetric,
    /// Decides when a threshold is met
    pub stop: StopCriterion,
    /// Scores the grown regions
    pub objective: Objective,
    /// Ordered stop values
    pub thresholds: ThresholdSeries,
    /// Engine limits
    pub growth: GrowthOptions,
}

impl SrgConfig {
    /// Parse every name and validate the thresholds
    ///
    /// # Errors
    ///
    /// Returns `GrowError::InvalidConfiguration` for an unknown method,
    /// similarity, stop or objective name, and `GrowError::InvalidArgument`
    /// for a bad threshold series.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxgrow_grow::SrgConfig;
    ///
    /// let config = SrgConfig::new("slic", "euclidean", "size", "ac", vec![8.0, 16.0]).unwrap();
    /// assert_eq!(config.thresholds.len(), 2);
    /// assert!(SrgConfig::new("slic", "cosine", "size", "ac", vec![8.0]).is_err());
    /// ```
    pub fn new(
        method: &str,
        similarity: &str,
        stop: &str,
        objective: &str,
        thresholds: Vec<f64>,
    ) -> GrowResult<Self> {
        Ok(Self {
            method: method
                .parse::<PartitionMethod>()
                .map_err(lift_config_error)?,
            similarity: similarity.parse()?,
            stop: stop.parse()?,
            objective: objective.parse()?,
            thresholds: ThresholdSeries::new(thresholds)?,
            growth: GrowthOptions::default(),
        })
    }

    /// Set engine limits
    pub fn with_growth(mut self, growth: GrowthOptions) -> Self {
        self.growth = growth;
        self
    }
}

impl fmt::Display for SrgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "method={} similarity={} stop={} objective={} thresholds={}",
            self.method,
            self.similarity,
            self.stop,
            self.objective,
            self.thresholds.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_names() {
        let config =
            SrgConfig::new("Watershed", "intensity", "units", "PC", vec![1.0, 2.0]).unwrap();
        assert_eq!(config.method, PartitionMethod::Watershed);
        assert_eq!(config.similarity, SimilarityMetric::Intensity);
        assert_eq!(config.stop, StopCriterion::Units);
        assert_eq!(config.objective, Objective::Pc);
        assert!(config.growth.max_steps.is_none());
        assert_eq!(
            config.to_string(),
            "method=watershed similarity=intensity stop=units objective=pc thresholds=2"
        );
    }

    #[test]
    fn test_config_fails_fast() {
        for (method, sim, stop, obj) in [
            ("felzenszwalb", "euclidean", "size", "ac"),
            ("slic", "cosine", "size", "ac"),
            ("slic", "euclidean", "volume", "ac"),
            ("slic", "euclidean", "size", "dice"),
        ] {
            assert!(matches!(
                SrgConfig::new(method, sim, stop, obj, vec![1.0]),
                Err(GrowError::InvalidConfiguration(_))
            ));
        }
        assert!(matches!(
            SrgConfig::new("slic", "euclidean", "size", "ac", vec![]),
            Err(GrowError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_growth_options() {
        let config = SrgConfig::new("slic", "euclidean", "size", "ac", vec![1.0])
            .unwrap()
            .with_growth(GrowthOptions::new().with_max_steps(3));
        assert_eq!(config.growth.max_steps, Some(3));
    }
}

//! Seeded region growing
//!
//! The engine grows one seed region over a threshold series. Before the
//! first absorb and after every absorb it records a snapshot for each
//! threshold the stop policy reports as met. Otherwise it absorbs the most
//! similar frontier label and refreshes the frontier. State carries across
//! thresholds, so the recorded regions are nested.
//!
//! When the frontier empties (or the step cap is hit) before the last
//! threshold is met, the current region is recorded for every remaining
//! threshold.
//!
//! # Examples
//!
//! ```
//! use voxgrow_core::{Dims, FVolume, LabelVolume};
//! use voxgrow_grow::{
//!     GrowthState, RegionGrower, SimilarityMetric, StopCriterion, ThresholdSeries,
//! };
//! use voxgrow_region::{Region, RegionIndex};
//!
//! let dims = Dims::new(4, 1, 1).unwrap();
//! let labels = LabelVolume::from_data(dims, vec![1, 2, 3, 4]).unwrap();
//! let image = FVolume::from_data(dims, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let index = RegionIndex::new(labels, image).unwrap();
//!
//! let grower = RegionGrower::new(SimilarityMetric::Euclidean, StopCriterion::Size);
//! let seed = Region::from_label(&index, 1).unwrap();
//! let thresholds = ThresholdSeries::new(vec![2.0, 3.0]).unwrap();
//! let result = grower.grow(seed, &thresholds);
//!
//! assert_eq!(result.regions[0].ids().to_vec(), vec![1, 2]);
//! assert_eq!(result.regions[1].ids().to_vec(), vec![1, 2, 3]);
//! assert_eq!(result.final_state, GrowthState::Halted(1));
//! ```

use log::{debug, trace, warn};

use crate::config::{GrowthOptions, SrgConfig};
use crate::similarity::{SimilarityCriterion, SimilarityMetric};
use crate::stop::{StopCriterion, StopPolicy};
use crate::threshold::ThresholdSeries;
use voxgrow_region::Region;

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthState {
    /// Absorbing frontier labels toward the current threshold
    Growing,
    /// The threshold at this position of the series was met
    Halted(usize),
    /// The frontier emptied or the step cap was hit before the last threshold
    Exhausted,
}

/// Output of one growth run
#[derive(Debug, Clone)]
pub struct GrowthResult<'a> {
    /// One region per threshold, nested in series order
    pub regions: Vec<Region<'a>>,
    /// State the engine stopped in
    pub final_state: GrowthState,
    /// Number of absorb steps taken
    pub steps: usize,
}

impl GrowthResult<'_> {
    /// True if growth ran out of frontier before the last threshold
    pub fn is_exhausted(&self) -> bool {
        self.final_state == GrowthState::Exhausted
    }
}

/// Seeded region growing engine
#[derive(Debug, Clone)]
pub struct RegionGrower<S, P> {
    similarity: S,
    stop: P,
    options: GrowthOptions,
}

impl RegionGrower<SimilarityMetric, StopCriterion> {
    /// Engine with the similarity, stop policy and limits of a configuration
    pub fn from_config(config: &SrgConfig) -> Self {
        Self::new(config.similarity, config.stop).with_options(config.growth.clone())
    }
}

impl<S: SimilarityCriterion, P: StopPolicy> RegionGrower<S, P> {
    /// Create an engine with default options
    pub fn new(similarity: S, stop: P) -> Self {
        Self {
            similarity,
            stop,
            options: GrowthOptions::default(),
        }
    }

    /// Set engine limits
    pub fn with_options(mut self, options: GrowthOptions) -> Self {
        self.options = options;
        self
    }

    /// Engine limits
    pub fn options(&self) -> &GrowthOptions {
        &self.options
    }

    /// Grow `seed` through every threshold of the series
    ///
    /// Returns exactly one region per threshold; the id set of each is a
    /// superset of the previous one.
    pub fn grow<'a>(&self, seed: Region<'a>, thresholds: &ThresholdSeries) -> GrowthResult<'a> {
        let values = thresholds.values();
        let mut region = seed;
        region.recompute_neighbors();

        let mut regions = Vec::with_capacity(values.len());
        let mut state = GrowthState::Growing;
        let mut steps = 0;

        loop {
            while let Some(&threshold) = values.get(regions.len()) {
                if !self.stop.is_met(&mut region, threshold) {
                    break;
                }
                state = GrowthState::Halted(regions.len());
                trace!(
                    "threshold {threshold} met after {steps} steps ({} labels)",
                    region.unit_count()
                );
                regions.push(region.clone());
            }
            if regions.len() == values.len() {
                break;
            }

            let capped = self.options.max_steps.is_some_and(|max| steps >= max);
            let best = if capped {
                None
            } else {
                self.similarity.best(&mut region)
            };
            let Some((label, score)) = best else {
                warn!(
                    "growth exhausted after {steps} steps at threshold {} of {}{}",
                    regions.len() + 1,
                    values.len(),
                    if capped { " (step cap)" } else { "" }
                );
                state = GrowthState::Exhausted;
                while regions.len() < values.len() {
                    regions.push(region.clone());
                }
                break;
            };

            region.absorb_label(label);
            region.recompute_neighbors();
            steps += 1;
            state = GrowthState::Growing;
            trace!(
                "step {steps}: absorbed label {label} (score {score:.4}), {} frontier labels",
                region.neighbor_ids().len()
            );
        }

        debug!(
            "grew {} regions in {steps} steps, final state {state:?}",
            regions.len()
        );
        GrowthResult {
            regions,
            final_state: state,
            steps,
        }
    }
}

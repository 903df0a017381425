//! Similarity policies
//!
//! A similarity policy scores every frontier label against the current
//! region; lower scores are more similar. Ranking sorts by `(score, label)`,
//! so equal scores always resolve to the lowest label id.

use std::str::FromStr;

use strum_macros::{Display, EnumIter};

use crate::config::parse_name;
use crate::error::GrowError;
use voxgrow_region::Region;

/// Scores frontier labels against a region
pub trait SimilarityCriterion {
    /// Dissimilarity of `label` to `region`; lower is more similar
    fn score(&self, region: &mut Region<'_>, label: u32) -> f64;

    /// Every neighbor id with its score, most similar first
    fn rank(&self, region: &mut Region<'_>) -> Vec<(u32, f64)> {
        let neighbors = region.neighbor_ids().to_vec();
        let mut ranked: Vec<(u32, f64)> = neighbors
            .into_iter()
            .map(|label| (label, self.score(region, label)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// The most similar neighbor id, or `None` for an empty frontier
    fn best(&self, region: &mut Region<'_>) -> Option<(u32, f64)> {
        let neighbors = region.neighbor_ids().to_vec();
        neighbors
            .into_iter()
            .map(|label| (label, self.score(region, label)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }
}

/// Built-in similarity metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SimilarityMetric {
    /// Absolute difference between the label's mean and the region mean
    #[default]
    Euclidean,
    /// Negated label mean, so the brightest neighbor is absorbed first
    Intensity,
}

impl SimilarityCriterion for SimilarityMetric {
    fn score(&self, region: &mut Region<'_>, label: u32) -> f64 {
        let label_mean = region.index().label_mean(label);
        match self {
            SimilarityMetric::Euclidean => (label_mean - region.mean()).abs(),
            SimilarityMetric::Intensity => -label_mean,
        }
    }
}

impl FromStr for SimilarityMetric {
    type Err = GrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name("similarity metric", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxgrow_core::{Dims, FVolume, LabelVolume};
    use voxgrow_region::RegionIndex;

    /// Labels 1..=4 along x with intensities 5, 4, 6, 4
    fn index() -> RegionIndex {
        let dims = Dims::new(4, 1, 1).unwrap();
        let labels = LabelVolume::from_data(dims, vec![1, 2, 3, 4]).unwrap();
        let image = FVolume::from_data(dims, vec![5.0, 4.0, 6.0, 4.0]).unwrap();
        RegionIndex::new(labels, image).unwrap()
    }

    #[test]
    fn test_euclidean_tie_breaks_on_label() {
        let index = index();
        let mut region = Region::from_label(&index, 1).unwrap();
        region.absorb_label(3);
        region.recompute_neighbors();
        // region mean 5.5; neighbors 2 (4.0) and 4 (4.0) tie at 1.5
        assert_eq!(region.neighbor_ids().to_vec(), vec![2, 4]);
        let best = SimilarityMetric::Euclidean.best(&mut region).unwrap();
        assert_eq!(best.0, 2);
        assert!((best.1 - 1.5).abs() < 1e-12);

        let ranked = SimilarityMetric::Euclidean.rank(&mut region);
        assert_eq!(ranked.iter().map(|r| r.0).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_intensity_prefers_brightest() {
        let index = index();
        let mut region = Region::from_label(&index, 2).unwrap();
        region.recompute_neighbors();
        let best = SimilarityMetric::Intensity.best(&mut region).unwrap();
        assert_eq!(best.0, 3);
    }

    #[test]
    fn test_empty_frontier() {
        let index = index();
        let mut region = Region::from_label(&index, 1).unwrap();
        assert!(SimilarityMetric::Euclidean.best(&mut region).is_none());
    }

    #[test]
    fn test_names() {
        assert_eq!(
            "euclidean".parse::<SimilarityMetric>().unwrap(),
            SimilarityMetric::Euclidean
        );
        assert!(matches!(
            "cosine".parse::<SimilarityMetric>(),
            Err(GrowError::InvalidConfiguration(_))
        ));
    }
}

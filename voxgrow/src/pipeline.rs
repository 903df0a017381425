//! End-to-end seeded region growing
//!
//! Partition, seed, grow through the threshold series and select the best
//! threshold, in one call.

use log::debug;

use voxgrow_core::{FVolume, LabelVolume, MaskVolume};
use voxgrow_grow::{GrowResult, GrowthState, Optimizer, RegionGrower, Selection, SrgConfig};
use voxgrow_region::{ImageRepresent, PartitionOptions, SeedCoords};

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The partition growth ran over
    pub labels: LabelVolume,
    /// One region mask per threshold, carrying the input affine
    pub masks: Vec<MaskVolume>,
    /// Label ids of each grown region
    pub region_ids: Vec<Vec<u32>>,
    /// Objective value of each grown region
    pub scores: Vec<f64>,
    /// The best threshold; `family` is always 0
    pub selection: Selection,
    /// State growth stopped in
    pub final_state: GrowthState,
}

impl PipelineOutput {
    /// Mask of the selected region
    pub fn selected_mask(&self) -> Option<&MaskVolume> {
        self.masks.get(self.selection.index)
    }
}

/// Run seeded region growing on an image
///
/// The partition method is taken from `config`; the remaining partition
/// settings come from `partition`.
///
/// # Errors
///
/// Fails if the mask shape differs from the image, a seed lies outside the
/// volume or on background, or the partition settings are unusable.
pub fn run_pipeline(
    image: &FVolume,
    mask: Option<&MaskVolume>,
    seeds: &SeedCoords,
    config: &SrgConfig,
    partition: &PartitionOptions,
) -> GrowResult<PipelineOutput> {
    let options = PartitionOptions {
        method: config.method,
        ..partition.clone()
    };
    debug!("srg run: {config}, partition {options}");

    let rep = ImageRepresent::from_partition(image.clone(), mask, &options)?;
    let seed = rep.region_from_seeds(seeds)?;
    let result = RegionGrower::from_config(config).grow(seed, &config.thresholds);

    let optimizer = Optimizer::new(config.objective);
    let scores = optimizer.compute(std::slice::from_ref(&result.regions), image)?;
    let selection = Optimizer::select(&scores)?;
    debug!(
        "selected threshold {} of {} (value {:.4})",
        selection.index + 1,
        result.regions.len(),
        selection.value
    );

    let affine = *image.affine();
    let masks = result
        .regions
        .iter()
        .map(|region| region.mask().with_affine(affine))
        .collect();
    let region_ids = result.regions.iter().map(|r| r.ids().to_vec()).collect();

    Ok(PipelineOutput {
        labels: rep.labels().clone(),
        masks,
        region_ids,
        scores: scores.into_iter().next().unwrap_or_default(),
        selection,
        final_state: result.final_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxgrow_core::{Affine, Dims};
    use voxgrow_grow::GrowError;
    use voxgrow_region::RegionError;

    fn slab() -> FVolume {
        let dims = Dims::new(8, 4, 4).unwrap();
        FVolume::from_fn(dims, |x, _, _| if x < 4 { 1.0 } else { 3.0 })
    }

    fn slic_partition() -> PartitionOptions {
        PartitionOptions::default().with_slic(
            voxgrow_region::SlicOptions::new()
                .with_n_segments(2)
                .with_sigma(0.0),
        )
    }

    #[test]
    fn test_pipeline_masks_follow_thresholds() {
        let config = SrgConfig::new("supervoxel", "euclidean", "size", "ac", vec![64.0, 128.0])
            .unwrap();
        let seeds = SeedCoords::from_rows(&[vec![7, 3, 3]]).unwrap();
        let affine = Affine::from_zooms([2.0, 2.0, 2.0], [0.0, 0.0, 0.0]);
        let image = slab().with_affine(affine);

        let output = run_pipeline(&image, None, &seeds, &config, &slic_partition()).unwrap();
        assert_eq!(output.labels.max_label(), 2);
        assert_eq!(output.masks.len(), 2);
        assert_eq!(output.masks[0].count(), 64);
        assert_eq!(output.masks[1].count(), 128);
        assert!(output.masks.iter().all(|m| *m.affine() == affine));
        assert_eq!(output.region_ids[1].len(), 2);
        // The bright half alone concentrates the signal; the whole volume scores 0
        assert_eq!(output.selection.index, 0);
        assert_eq!(output.selected_mask(), Some(&output.masks[0]));
        assert_eq!(output.final_state, GrowthState::Halted(1));
    }

    #[test]
    fn test_pipeline_rejects_background_seed() {
        let config = SrgConfig::new("slic", "euclidean", "size", "ac", vec![64.0]).unwrap();
        let image = slab();
        let mut mask = image.map(|_| true);
        mask.set(0, 0, 0, false).unwrap();
        let seeds = SeedCoords::from_rows(&[vec![0, 0, 0]]).unwrap();
        let err = run_pipeline(&image, Some(&mask), &seeds, &config, &slic_partition())
            .unwrap_err();
        assert!(matches!(
            err,
            GrowError::Region(RegionError::InvalidArgument(_))
        ));
    }
}

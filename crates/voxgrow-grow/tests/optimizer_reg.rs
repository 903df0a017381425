//! Optimizer regression test
//!
//! Grows a bright cube inside a dim shell, scores the nested family with
//! both objectives and checks that selection lands on the threshold whose
//! region matches the cube.
//!
//! Run with:
//! ```
//! cargo test -p voxgrow-grow --test optimizer_reg
//! ```

use voxgrow_grow::{
    Objective, Optimizer, RegionGrower, SimilarityMetric, StopCriterion, ThresholdSeries,
};
use voxgrow_region::{ImageRepresent, SeedCoords};
use voxgrow_test::{RegParams, synth};

#[test]
fn optimizer_reg() {
    let mut rp = RegParams::new("optimizer");

    // 4x4x4 blocks of 2 voxels; the central 2x2x2 blocks are bright
    let labels = synth::block_grid((4, 4, 4), 2);
    let image = synth::intensity_from_labels(&labels, |l| {
        let i = (l - 1) as usize;
        let (x, y, z) = (i % 4, (i / 4) % 4, i / 16);
        let inner = |c: usize| (1..=2).contains(&c);
        if inner(x) && inner(y) && inner(z) { 10.0 } else { 1.0 }
    });
    let rep = ImageRepresent::new(image, labels).expect("represent");
    let image = rep.index().image();

    let seeds = SeedCoords::from_rows(&[vec![2, 2, 2]]).expect("seeds");
    let thresholds = ThresholdSeries::new(vec![8.0, 32.0, 64.0, 128.0, 256.0]).expect("series");
    let grower = RegionGrower::new(SimilarityMetric::Euclidean, StopCriterion::Size);
    let euclidean = grower.grow(rep.region_from_seeds(&seeds).expect("seed"), &thresholds);

    // --- Test 1: activation concentration peaks at the bright cube ---
    let ac = Optimizer::from_name("ac").expect("ac");
    let scores = ac
        .compute(std::slice::from_ref(&euclidean.regions), image)
        .expect("ac scores");
    rp.compare_values(5.0, scores[0].len() as f64, 0.0);
    let best = Optimizer::select(&scores).expect("selection");
    rp.compare_values(0.0, best.family as f64, 0.0);
    rp.compare_values(2.0, best.index as f64, 0.0);
    rp.compare_values(9.0, best.value, 1e-9);
    rp.compare_values(
        64.0,
        euclidean.regions[best.index].clone().size() as f64,
        0.0,
    );

    // --- Test 2: peripheral contrast agrees ---
    let pc = Optimizer::new(Objective::Pc);
    let scores = pc
        .compute(std::slice::from_ref(&euclidean.regions), image)
        .expect("pc scores");
    let best = Optimizer::select(&scores).expect("selection");
    rp.compare_values(2.0, best.index as f64, 0.0);
    rp.compare_values(9.0, best.value, 1e-9);

    // --- Test 3: several families ---
    let intensity = RegionGrower::new(SimilarityMetric::Intensity, StopCriterion::Size)
        .grow(rep.region_from_seeds(&seeds).expect("seed"), &thresholds);
    let families = vec![intensity.regions, euclidean.regions];
    let scores = ac.compute(&families, image).expect("family scores");
    rp.compare_values(2.0, scores.len() as f64, 0.0);
    let best = Optimizer::select(&scores).expect("selection");
    // Both families reach the bright cube at the same threshold; the first wins
    rp.compare_values(0.0, best.family as f64, 0.0);
    rp.compare_values(2.0, best.index as f64, 0.0);

    // --- Test 4: empty candidates ---
    rp.check(Optimizer::select(&[]).is_err(), "empty selection rejected");

    assert!(rp.cleanup(), "optimizer regression test failed");
}

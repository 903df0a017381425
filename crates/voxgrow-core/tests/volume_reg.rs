//! Volume regression test
//!
//! Checks column-major indexing, spatial metadata and the preprocessing
//! filters on small synthetic volumes.
//!
//! Run with:
//! ```
//! cargo test -p voxgrow-core --test volume_reg
//! ```

use voxgrow_core::{
    Affine, Dims, Error, FVolume, LabelVolume, MaskVolume, apply_mask, gaussian_smooth,
    rescale_intensity,
};
use voxgrow_test::RegParams;

#[test]
fn volume_reg() {
    let mut rp = RegParams::new("volume");

    // --- Test 1: indexing ---
    let dims = Dims::new(4, 3, 2).expect("dims");
    rp.compare_values(24.0, dims.len() as f64, 0.0);
    rp.compare_values(1.0 + 2.0 * 4.0 + 12.0, dims.index(1, 2, 1) as f64, 0.0);
    rp.check(dims.coords(21) == (1, 2, 1), "coords invert index");
    rp.check(dims.checked_index(-1, 0, 0).is_none(), "negative rejected");
    rp.check(dims.checked_index(0, 3, 0).is_none(), "overflow rejected");
    rp.check(
        matches!(Dims::new(0, 3, 2), Err(Error::InvalidDimension { .. })),
        "zero dimension rejected",
    );

    let vol = FVolume::from_fn(dims, |x, y, z| (x + 10 * y + 100 * z) as f32);
    rp.compare_values(121.0, vol.get(1, 2, 1).unwrap_or(-1.0) as f64, 0.0);
    rp.compare_values(121.0, vol.data()[21] as f64, 0.0);

    // --- Test 2: affine ---
    let affine = Affine::from_zooms([2.0, 3.0, 4.0], [-10.0, 0.0, 5.0]);
    let vol = vol.with_affine(affine);
    let world = vol.affine().voxel_to_world(1, 1, 1);
    rp.compare_values(-8.0, world[0], 1e-12);
    rp.compare_values(3.0, world[1], 1e-12);
    rp.compare_values(9.0, world[2], 1e-12);
    rp.check(*vol.map(|v| v > 50.0).affine() == affine, "map keeps affine");

    // --- Test 3: masking and rescaling ---
    let mask = MaskVolume::from_fn(dims, |x, _, _| x < 2);
    let masked = apply_mask(&vol, &mask).expect("mask");
    rp.compare_values(0.0, masked.get(3, 0, 0).unwrap_or(-1.0) as f64, 0.0);
    rp.compare_values(1.0, masked.get(1, 0, 0).unwrap_or(-1.0) as f64, 0.0);
    let wrong = MaskVolume::new(Dims::new(4, 3, 1).expect("dims"), true);
    rp.check(apply_mask(&vol, &wrong).is_err(), "mask shape checked");

    let scaled = rescale_intensity(&vol, 0.0, 255.0).expect("rescale");
    let (lo, hi) = scaled.min_max().unwrap_or((f32::NAN, f32::NAN));
    rp.compare_values(0.0, lo as f64, 1e-4);
    rp.compare_values(255.0, hi as f64, 1e-4);

    // --- Test 4: smoothing ---
    let flat = FVolume::new(Dims::new(6, 6, 6).expect("dims"), 7.0);
    let smoothed = gaussian_smooth(&flat, 1.5).expect("smooth");
    rp.check(
        smoothed.data().iter().all(|&v| (v - 7.0).abs() < 1e-4),
        "constant volume unchanged",
    );
    let spike = FVolume::from_fn(Dims::new(9, 9, 9).expect("dims"), |x, y, z| {
        if (x, y, z) == (4, 4, 4) { 1.0 } else { 0.0 }
    });
    let blurred = gaussian_smooth(&spike, 1.0).expect("smooth");
    rp.compare_values(spike.mean(), blurred.mean(), 1e-5);
    let center = blurred.get(4, 4, 4).unwrap_or(0.0);
    rp.check(center < 1.0 && center > blurred.get(5, 4, 4).unwrap_or(1.0), "peak spreads");
    rp.check(gaussian_smooth(&spike, -1.0).is_err(), "negative sigma rejected");

    // --- Test 5: labels ---
    let labels = LabelVolume::from_data(Dims::new(4, 1, 1).expect("dims"), vec![0, 3, 3, 1])
        .expect("labels");
    rp.compare_ids(&[1, 3], &labels.labels());
    rp.compare_values(3.0, labels.max_label() as f64, 0.0);
    rp.compare_values(3.0, labels.foreground().count() as f64, 0.0);

    assert!(rp.cleanup(), "volume regression test failed");
}

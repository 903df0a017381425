//! Intensity preprocessing shared by the partitioners
//!
//! - [`apply_mask`] zeroes voxels outside a mask
//! - [`gaussian_smooth`] separable gaussian blur with reflective borders
//! - [`rescale_intensity`] linear stretch to a target range

use crate::error::{Error, Result};
use crate::volume::{Dims, FVolume, MaskVolume};

/// Kernel half-width in units of sigma
const TRUNCATE: f64 = 4.0;

/// Zero every voxel outside the mask
///
/// # Errors
///
/// Returns `Error::DimensionMismatch` if the mask shape differs from the volume.
pub fn apply_mask(volume: &FVolume, mask: &MaskVolume) -> Result<FVolume> {
    volume.dims().ensure_same(&mask.dims())?;
    let mut out = volume.clone();
    for (v, &keep) in out.data_mut().iter_mut().zip(mask.data()) {
        if !keep {
            *v = 0.0;
        }
    }
    Ok(out)
}

/// Linearly stretch intensities to `[lo, hi]`
///
/// A constant volume maps to `lo` everywhere.
pub fn rescale_intensity(volume: &FVolume, lo: f32, hi: f32) -> Result<FVolume> {
    if !(lo < hi) {
        return Err(Error::InvalidParameter(format!(
            "rescale range [{lo}, {hi}] is empty"
        )));
    }
    let Some((min, max)) = volume.min_max() else {
        return Ok(volume.map(|_| lo));
    };
    let span = max - min;
    if span <= 0.0 {
        return Ok(volume.map(|_| lo));
    }
    Ok(volume.map(|v| {
        if v.is_finite() {
            lo + (v - min) * (hi - lo) / span
        } else {
            lo
        }
    }))
}

fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| (-0.5 * (i as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Reflect an out-of-range index back into `[0, n)` (d c b a | a b c d | d c b a)
#[inline]
fn reflect(i: i64, n: usize) -> usize {
    let n = n as i64;
    let period = 2 * n;
    let mut m = i.rem_euclid(period);
    if m >= n {
        m = period - 1 - m;
    }
    m as usize
}

fn convolve_axis(data: &[f32], dims: Dims, axis: usize, kernel: &[f64]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i64;
    let extent = match axis {
        0 => dims.nx,
        1 => dims.ny,
        _ => dims.nz,
    };
    let mut out = vec![0.0f32; data.len()];
    for (idx, o) in out.iter_mut().enumerate() {
        let (x, y, z) = dims.coords(idx);
        let pos = [x, y, z][axis] as i64;
        let mut acc = 0.0f64;
        for (k, &w) in kernel.iter().enumerate() {
            let p = reflect(pos + k as i64 - radius, extent);
            let src = match axis {
                0 => dims.index(p, y, z),
                1 => dims.index(x, p, z),
                _ => dims.index(x, y, p),
            };
            acc += w * data[src] as f64;
        }
        *o = acc as f32;
    }
    out
}

/// Separable 3D gaussian smoothing
///
/// `sigma` is in voxels; 0 returns an unchanged copy.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` for a negative or non-finite sigma.
pub fn gaussian_smooth(volume: &FVolume, sigma: f64) -> Result<FVolume> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "gaussian sigma must be >= 0, got {sigma}"
        )));
    }
    if sigma == 0.0 {
        return Ok(volume.clone());
    }
    let kernel = gaussian_kernel(sigma);
    let dims = volume.dims();
    let mut data = volume.data().to_vec();
    for axis in 0..3 {
        data = convolve_axis(&data, dims, axis, &kernel);
    }
    Ok(FVolume::from_data(dims, data)?.with_affine(*volume.affine()))
}

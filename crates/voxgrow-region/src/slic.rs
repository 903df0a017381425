//! SLIC supervoxels
//!
//! Simple linear iterative clustering on a single-channel volume. Cluster
//! centers start on a regular grid with spacing `S = cbrt(N / n_segments)`,
//! and each iteration assigns every voxel within `2S` of a center to the
//! closest center under a combined intensity/space distance, then moves the
//! centers to the mean of their voxels. Connectivity is enforced afterwards,
//! so every output label is one 6-connected unit.

use crate::conncomp::{
    ConnectivityType, Neighborhood, relabel_sequential, split_disconnected, volume_like,
};
use crate::error::{RegionError, RegionResult};
use voxgrow_core::{
    Dims, FVolume, LabelVolume, MaskVolume, apply_mask, gaussian_smooth, rescale_intensity,
};

/// Options for SLIC supervoxel segmentation
#[derive(Debug, Clone)]
pub struct SlicOptions {
    /// Approximate number of supervoxels
    pub n_segments: usize,
    /// Intensity scale against which spatial distance is traded off
    pub compactness: f64,
    /// Adapt the intensity scale per cluster to its largest observed distance
    pub slic_zero: bool,
    /// Gaussian smoothing applied after rescaling (voxels, 0 disables)
    pub sigma: f64,
    /// Number of assignment/update iterations
    pub max_iterations: usize,
    /// Components smaller than `min_size_factor * S^3` are merged away
    pub min_size_factor: f64,
}

impl Default for SlicOptions {
    fn default() -> Self {
        Self {
            n_segments: 10_000,
            compactness: 10.0,
            slic_zero: true,
            sigma: 2.0,
            max_iterations: 10,
            min_size_factor: 0.5,
        }
    }
}

impl SlicOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target supervoxel count
    pub fn with_n_segments(mut self, n_segments: usize) -> Self {
        self.n_segments = n_segments;
        self
    }

    /// Set compactness
    pub fn with_compactness(mut self, compactness: f64) -> Self {
        self.compactness = compactness;
        self
    }

    /// Enable or disable SLIC-zero
    pub fn with_slic_zero(mut self, slic_zero: bool) -> Self {
        self.slic_zero = slic_zero;
        self
    }

    /// Set smoothing width
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set iteration count
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> RegionResult<()> {
        if self.n_segments == 0 {
            return Err(RegionError::InvalidConfiguration(
                "slic n_segments must be > 0".to_string(),
            ));
        }
        if !(self.compactness > 0.0) {
            return Err(RegionError::InvalidConfiguration(format!(
                "slic compactness must be > 0, got {}",
                self.compactness
            )));
        }
        if !(self.min_size_factor >= 0.0) {
            return Err(RegionError::InvalidConfiguration(format!(
                "slic min_size_factor must be >= 0, got {}",
                self.min_size_factor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Center {
    pos: [f64; 3],
    value: f64,
    /// Intensity scale for this cluster
    scale: f64,
}

/// Place initial centers on a regular grid, keeping those on the foreground
fn grid_centers(
    dims: Dims,
    step: f64,
    values: &[f32],
    fg: &[bool],
    compactness: f64,
) -> Vec<Center> {
    let axis = |n: usize| -> Vec<usize> {
        let mut out = Vec::new();
        let mut p = step / 2.0;
        while (p as usize) < n {
            out.push(p as usize);
            p += step;
        }
        out
    };
    let (xs, ys, zs) = (axis(dims.nx), axis(dims.ny), axis(dims.nz));

    let mut centers = Vec::new();
    for &z in &zs {
        for &y in &ys {
            for &x in &xs {
                let idx = dims.index(x, y, z);
                if fg[idx] {
                    centers.push(Center {
                        pos: [x as f64, y as f64, z as f64],
                        value: values[idx] as f64,
                        scale: compactness,
                    });
                }
            }
        }
    }

    if centers.is_empty() {
        if let Some(idx) = fg.iter().position(|&f| f) {
            let (x, y, z) = dims.coords(idx);
            centers.push(Center {
                pos: [x as f64, y as f64, z as f64],
                value: values[idx] as f64,
                scale: compactness,
            });
        }
    }
    centers
}

fn window(center: f64, radius: f64, n: usize) -> std::ops::Range<usize> {
    let lo = (center - radius).floor().max(0.0) as usize;
    let hi = ((center + radius).ceil() as usize + 1).min(n);
    lo..hi
}

/// Run the SLIC iterations, returning a 1-based cluster id per voxel (0 = background)
fn cluster(dims: Dims, values: &[f32], fg: &[bool], step: f64, options: &SlicOptions) -> Vec<u32> {
    let mut centers = grid_centers(dims, step, values, fg, options.compactness);
    let mut assignment = vec![0u32; dims.len()];
    if centers.is_empty() {
        return assignment;
    }
    let mut distance = vec![f64::INFINITY; dims.len()];
    let radius = 2.0 * step;
    let iterations = options.max_iterations.max(1);

    for _ in 0..iterations {
        distance.iter_mut().for_each(|d| *d = f64::INFINITY);
        for (c, center) in centers.iter().enumerate() {
            for z in window(center.pos[2], radius, dims.nz) {
                for y in window(center.pos[1], radius, dims.ny) {
                    for x in window(center.pos[0], radius, dims.nx) {
                        let idx = dims.index(x, y, z);
                        if !fg[idx] {
                            continue;
                        }
                        let dc = (values[idx] as f64 - center.value) / center.scale;
                        let ds2 = (x as f64 - center.pos[0]).powi(2)
                            + (y as f64 - center.pos[1]).powi(2)
                            + (z as f64 - center.pos[2]).powi(2);
                        let d = dc * dc + ds2 / (step * step);
                        if d < distance[idx] {
                            distance[idx] = d;
                            assignment[idx] = c as u32 + 1;
                        }
                    }
                }
            }
        }

        let mut sums = vec![[0.0f64; 5]; centers.len()];
        for (idx, &a) in assignment.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let (x, y, z) = dims.coords(idx);
            let s = &mut sums[a as usize - 1];
            s[0] += x as f64;
            s[1] += y as f64;
            s[2] += z as f64;
            s[3] += values[idx] as f64;
            s[4] += 1.0;
        }
        for (c, center) in centers.iter_mut().enumerate() {
            let s = sums[c];
            if s[4] > 0.0 {
                center.pos = [s[0] / s[4], s[1] / s[4], s[2] / s[4]];
                center.value = s[3] / s[4];
            }
        }
        if options.slic_zero {
            let mut max_dc = vec![0.0f64; centers.len()];
            for (idx, &a) in assignment.iter().enumerate() {
                if a > 0 {
                    let c = a as usize - 1;
                    let dc = (values[idx] as f64 - centers[c].value).abs();
                    max_dc[c] = max_dc[c].max(dc);
                }
            }
            for (center, &m) in centers.iter_mut().zip(&max_dc) {
                center.scale = if m > 0.0 { m } else { options.compactness };
            }
        }
    }

    // Foreground voxels no window reached go to the spatially closest center
    for idx in 0..dims.len() {
        if fg[idx] && assignment[idx] == 0 {
            let (x, y, z) = dims.coords(idx);
            let nearest = centers
                .iter()
                .enumerate()
                .map(|(c, center)| {
                    let d = (x as f64 - center.pos[0]).powi(2)
                        + (y as f64 - center.pos[1]).powi(2)
                        + (z as f64 - center.pos[2]).powi(2);
                    (c, d)
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map_or(0, |(c, _)| c);
            assignment[idx] = nearest as u32 + 1;
        }
    }
    assignment
}

fn find(parent: &mut [u32], mut c: u32) -> u32 {
    while parent[c as usize] != c {
        let grand = parent[parent[c as usize] as usize];
        parent[c as usize] = grand;
        c = grand;
    }
    c
}

/// Split clusters into connected pieces and merge pieces below `min_size`
/// into their largest adjacent piece
fn enforce_connectivity(components: &LabelVolume, min_size: usize) -> Vec<u32> {
    let dims = components.dims();
    let hood = Neighborhood::new(dims, ConnectivityType::SixWay);
    let data = components.data();
    let n = components.max_label() as usize;

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n + 1];
    for (idx, &c) in data.iter().enumerate() {
        if c > 0 {
            members[c as usize].push(idx);
        }
    }
    let mut size: Vec<usize> = members.iter().map(Vec::len).collect();
    let mut parent: Vec<u32> = (0..=n as u32).collect();

    for c in 1..=n as u32 {
        if size[find(&mut parent, c) as usize] >= min_size {
            continue;
        }
        let root = find(&mut parent, c);
        let mut best: Option<(usize, u32)> = None;
        for &idx in &members[c as usize] {
            hood.for_each(idx, |nb| {
                let other = data[nb];
                if other == 0 {
                    return;
                }
                let other_root = find(&mut parent, other);
                if other_root == root {
                    return;
                }
                let candidate = (size[other_root as usize], other_root);
                let better = match best {
                    None => true,
                    Some((s, r)) => candidate.0 > s || (candidate.0 == s && candidate.1 < r),
                };
                if better {
                    best = Some(candidate);
                }
            });
        }
        if let Some((_, target)) = best {
            parent[root as usize] = target;
            size[target as usize] += size[root as usize];
        }
    }

    data.iter()
        .map(|&c| if c == 0 { 0 } else { find(&mut parent, c) })
        .collect()
}

/// Partition a volume into SLIC supervoxels
///
/// Intensities outside the mask are zeroed, the volume is rescaled to
/// `[0, 255]` and optionally smoothed before clustering. Masked voxels map to
/// label 0; supervoxels are numbered `1..=n` in scan order.
pub fn slic_segmentation(
    volume: &FVolume,
    mask: Option<&MaskVolume>,
    options: &SlicOptions,
) -> RegionResult<LabelVolume> {
    options.validate()?;
    let dims = volume.dims();
    let masked = match mask {
        Some(mask) => apply_mask(volume, mask)?,
        None => volume.clone(),
    };
    let gray = rescale_intensity(&masked, 0.0, 255.0)?;
    let smoothed = gaussian_smooth(&gray, options.sigma)
        .map_err(|e| RegionError::InvalidConfiguration(e.to_string()))?;

    let fg: Vec<bool> = match mask {
        Some(mask) => mask.data().to_vec(),
        None => vec![true; dims.len()],
    };
    let n_fg = fg.iter().filter(|&&f| f).count();
    let step = (n_fg as f64 / options.n_segments as f64).cbrt().max(1.0);

    let assignment = cluster(dims, smoothed.data(), &fg, step, options);
    let components =
        split_disconnected(&volume_like(volume, assignment), ConnectivityType::SixWay);
    let min_size = (options.min_size_factor * step.powi(3)) as usize;
    let merged = enforce_connectivity(&components, min_size.max(1));

    let labels = relabel_sequential(&volume_like(volume, merged));
    log::debug!(
        "slic: step {:.2}, {} pieces before merge, {} supervoxels",
        step,
        components.max_label(),
        labels.max_label()
    );
    Ok(labels)
}

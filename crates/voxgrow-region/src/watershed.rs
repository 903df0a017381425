//! Watershed segmentation
//!
//! This module provides a marker-based watershed for 3D volumes. Bright
//! structures are the objects of interest, so the smoothed intensities are
//! turned upside down (`max - v`) and every regional minimum plateau of the
//! inverted surface seeds one basin. Basins then grow by priority flooding,
//! lowest surface first, until every foreground voxel belongs to one.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use crate::conncomp::{ConnectivityType, Neighborhood, relabel_sequential, volume_like};
use crate::error::{RegionError, RegionResult};
use voxgrow_core::{FVolume, LabelVolume, MaskVolume, apply_mask, gaussian_smooth};

/// Options for watershed segmentation
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Gaussian smoothing applied before flooding (voxels, 0 disables)
    pub sigma: f64,
    /// Voxels whose smoothed intensity is at or below this value are background
    pub threshold: Option<f32>,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            threshold: None,
            connectivity: ConnectivityType::SixWay,
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set smoothing width
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set foreground threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Total order over f32 for the flooding queue
#[derive(Debug, Clone, Copy, PartialEq)]
struct Level(f32);

impl Eq for Level {}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Map intensities to the flooding surface (`max - v` over the foreground)
pub fn inverse_transform(volume: &FVolume, foreground: &MaskVolume) -> FVolume {
    let max = volume
        .data()
        .iter()
        .zip(foreground.data())
        .filter(|&(v, &fg)| fg && v.is_finite())
        .map(|(&v, _)| v)
        .fold(f32::NEG_INFINITY, f32::max);
    volume.map(|v| if v.is_finite() { max - v } else { f32::INFINITY })
}

/// Find regional minimum plateaus inside the foreground
///
/// A plateau is a connected set of equal-valued foreground voxels; it is a
/// regional minimum when no voxel of it has a strictly lower foreground
/// neighbor. Each such plateau gets a marker label `1..=n` in scan order.
pub fn find_regional_minima(
    surface: &FVolume,
    foreground: &MaskVolume,
    connectivity: ConnectivityType,
) -> RegionResult<LabelVolume> {
    let dims = surface.dims();
    dims.ensure_same(&foreground.dims())?;
    let hood = Neighborhood::new(dims, connectivity);
    let values = surface.data();
    let fg = foreground.data();

    let mut visited = vec![false; dims.len()];
    let mut markers = vec![0u32; dims.len()];
    let mut plateau = Vec::new();
    let mut queue = VecDeque::new();
    let mut next = 0u32;

    for start in 0..dims.len() {
        if !fg[start] || visited[start] {
            continue;
        }
        let level = values[start];
        plateau.clear();
        visited[start] = true;
        queue.push_back(start);
        let mut is_minimum = true;
        while let Some(idx) = queue.pop_front() {
            plateau.push(idx);
            hood.for_each(idx, |n| {
                if !fg[n] {
                    return;
                }
                if values[n] < level {
                    is_minimum = false;
                } else if values[n] == level && !visited[n] {
                    visited[n] = true;
                    queue.push_back(n);
                }
            });
        }
        if is_minimum {
            next += 1;
            for &idx in &plateau {
                markers[idx] = next;
            }
        }
    }

    Ok(LabelVolume::new(volume_like(surface, markers)))
}

/// Flood a surface from markers
///
/// Every foreground voxel reachable from a marker receives that marker's
/// label; ties in surface height are resolved in queue insertion order.
pub fn flood_from_markers(
    surface: &FVolume,
    markers: &LabelVolume,
    foreground: &MaskVolume,
    connectivity: ConnectivityType,
) -> RegionResult<LabelVolume> {
    let dims = surface.dims();
    dims.ensure_same(&foreground.dims())?;
    markers.ensure_dims(dims)?;
    let hood = Neighborhood::new(dims, connectivity);
    let values = surface.data();
    let fg = foreground.data();

    let mut labels = markers.data().to_vec();
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    for (idx, &label) in labels.iter().enumerate() {
        if label > 0 {
            heap.push(Reverse((Level(values[idx]), seq, idx)));
            seq += 1;
        }
    }

    while let Some(Reverse((_, _, idx))) = heap.pop() {
        let label = labels[idx];
        hood.for_each(idx, |n| {
            if fg[n] && labels[n] == 0 {
                labels[n] = label;
                heap.push(Reverse((Level(values[n]), seq, n)));
                seq += 1;
            }
        });
    }

    Ok(LabelVolume::new(volume_like(surface, labels)))
}

/// Perform watershed segmentation on an intensity volume
///
/// Returns a label volume where 0 marks masked or sub-threshold voxels and
/// positive values are basins numbered `1..=n` in scan order.
pub fn watershed_segmentation(
    volume: &FVolume,
    mask: Option<&MaskVolume>,
    options: &WatershedOptions,
) -> RegionResult<LabelVolume> {
    let masked = match mask {
        Some(mask) => apply_mask(volume, mask)?,
        None => volume.clone(),
    };
    let smoothed = gaussian_smooth(&masked, options.sigma)
        .map_err(|e| RegionError::InvalidConfiguration(e.to_string()))?;

    let foreground = smoothed.map(|v| v.is_finite());
    let mut foreground = match mask {
        Some(mask) => {
            let mut fg = foreground;
            for (f, &m) in fg.data_mut().iter_mut().zip(mask.data()) {
                *f &= m;
            }
            fg
        }
        None => foreground,
    };
    if let Some(threshold) = options.threshold {
        for (f, &v) in foreground.data_mut().iter_mut().zip(smoothed.data()) {
            *f &= v > threshold;
        }
    }

    let surface = inverse_transform(&smoothed, &foreground);
    let markers = find_regional_minima(&surface, &foreground, options.connectivity)?;
    let flooded = flood_from_markers(&surface, &markers, &foreground, options.connectivity)?;

    let labels = relabel_sequential(flooded.as_volume());
    log::debug!(
        "watershed: {} markers, {} basins over {} foreground voxels",
        markers.max_label(),
        labels.max_label(),
        foreground.count()
    );
    Ok(labels)
}

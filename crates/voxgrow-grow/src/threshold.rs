//! Threshold series
//!
//! The ordered stop values one growth run walks through. Each threshold
//! yields one recorded region, and since growth never restarts, the regions
//! come out nested.

use crate::error::{GrowError, GrowResult};

/// Tolerance for treating `(stop - start) / step` as a whole number
const LINSPACE_EPS: f64 = 1e-9;

/// Non-empty, non-decreasing sequence of finite thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSeries {
    values: Vec<f64>,
}

impl ThresholdSeries {
    /// Validate a threshold sequence
    ///
    /// # Errors
    ///
    /// Returns `GrowError::InvalidArgument` for an empty sequence, a
    /// non-finite value, or a value smaller than its predecessor.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxgrow_grow::ThresholdSeries;
    ///
    /// let series = ThresholdSeries::new(vec![2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
    /// assert_eq!(series.len(), 5);
    /// assert!(ThresholdSeries::new(vec![4.0, 2.0]).is_err());
    /// ```
    pub fn new(values: Vec<f64>) -> GrowResult<Self> {
        if values.is_empty() {
            return Err(GrowError::InvalidArgument(
                "threshold series is empty".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(GrowError::InvalidArgument(format!(
                "threshold {bad} is not finite"
            )));
        }
        if let Some(i) = values.windows(2).position(|w| w[1] < w[0]) {
            return Err(GrowError::InvalidArgument(format!(
                "thresholds must ascend: {} follows {} at position {}",
                values[i + 1],
                values[i],
                i + 1
            )));
        }
        Ok(Self { values })
    }

    /// Evenly spaced series `start, start + step, ...` up to and including `stop`
    ///
    /// A `stop` that lies on the grid up to rounding error is kept, and no
    /// value exceeds `stop`.
    pub fn linspace(start: f64, stop: f64, step: f64) -> GrowResult<Self> {
        if !(step > 0.0) {
            return Err(GrowError::InvalidArgument(format!(
                "threshold step must be > 0, got {step}"
            )));
        }
        let q = (stop - start) / step;
        let count = if (q - q.round()).abs() < LINSPACE_EPS {
            q.round()
        } else {
            q.floor()
        };
        if !(count >= 0.0) {
            return Err(GrowError::InvalidArgument(format!(
                "empty threshold range {start}..={stop}"
            )));
        }
        Self::new(
            (0..=count as usize)
                .map(|i| (start + i as f64 * step).min(stop))
                .collect(),
        )
    }

    /// Number of thresholds
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated series
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Threshold values in order
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Threshold at a position
    #[inline]
    pub fn get(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(ThresholdSeries::new(vec![]).is_err());
        assert!(ThresholdSeries::new(vec![1.0, f64::NAN]).is_err());
        assert!(ThresholdSeries::new(vec![1.0, 0.5]).is_err());
        // Repeated values are allowed; they record the same region twice
        assert!(ThresholdSeries::new(vec![1.0, 1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_linspace() {
        let series = ThresholdSeries::linspace(2.0, 10.0, 2.0).unwrap();
        assert_eq!(series.values(), &[2.0, 4.0, 6.0, 8.0, 10.0]);
        assert!(ThresholdSeries::linspace(2.0, 1.0, 1.0).is_err());
        assert!(ThresholdSeries::linspace(0.0, 1.0, 0.0).is_err());

        // (0.3 - 0.1) / 0.1 falls just short of 2 in floating point
        let series = ThresholdSeries::linspace(0.1, 0.3, 0.1).unwrap();
        assert_eq!(series.values(), &[0.1, 0.2, 0.3]);
        let series = ThresholdSeries::linspace(1.0, 2.0, 0.3).unwrap();
        assert_eq!(series.len(), 4);
        assert!(series.values()[3] < 2.0);
    }
}

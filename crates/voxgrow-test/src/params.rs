//! Regression test parameters and comparisons

use voxgrow_core::{LabelVolume, MaskVolume};

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "growing")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    pub fn new(test_name: &str) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two label id lists for exact equality
    pub fn compare_ids(&mut self, expected: &[u32], actual: &[u32]) -> bool {
        self.index += 1;

        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: id comparison for index {}\n\
                 expected = {:?}, actual = {:?}",
                self.test_name, self.index, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two label volumes voxel by voxel
    pub fn compare_labels(&mut self, expected: &LabelVolume, actual: &LabelVolume) -> bool {
        self.index += 1;

        if expected.dims() != actual.dims() {
            let msg = format!(
                "Failure in {}_reg: label comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            return self.fail(msg);
        }

        let dims = expected.dims();
        if let Some(idx) = (0..dims.len()).find(|&i| expected.get_index(i) != actual.get_index(i))
        {
            let msg = format!(
                "Failure in {}_reg: label comparison for index {} - mismatch at {:?}",
                self.test_name,
                self.index,
                dims.coords(idx)
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two masks voxel by voxel
    pub fn compare_masks(&mut self, expected: &MaskVolume, actual: &MaskVolume) -> bool {
        self.index += 1;

        if expected.dims() != actual.dims() {
            let msg = format!(
                "Failure in {}_reg: mask comparison for index {} - dimension mismatch",
                self.test_name, self.index
            );
            return self.fail(msg);
        }

        let mismatches = expected
            .data()
            .iter()
            .zip(actual.data())
            .filter(|(a, b)| a != b)
            .count();
        if mismatches > 0 {
            let msg = format!(
                "Failure in {}_reg: mask comparison for index {} - {} voxels differ",
                self.test_name, self.index, mismatches
            );
            return self.fail(msg);
        }

        true
    }

    /// Record a boolean check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if condition {
            true
        } else {
            let msg = format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            );
            self.fail(msg)
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all checks passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

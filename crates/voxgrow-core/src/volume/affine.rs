//! Voxel-to-world spatial metadata
//!
//! Every volume carries the 4x4 homogeneous matrix that maps voxel indices
//! to scanner/world coordinates. The matrix is never interpreted by the
//! growing algorithms; it travels with the data so that grown masks can be
//! written back next to the source image by an I/O layer.

/// Homogeneous 4x4 voxel-to-world transform (row-major)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    matrix: [[f64; 4]; 4],
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    /// The identity transform
    pub fn identity() -> Self {
        let mut matrix = [[0.0; 4]; 4];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { matrix }
    }

    /// Create an affine from a row-major matrix
    pub fn from_matrix(matrix: [[f64; 4]; 4]) -> Self {
        Self { matrix }
    }

    /// Create a diagonal affine with the given voxel sizes and origin
    ///
    /// # Examples
    ///
    /// ```
    /// use voxgrow_core::Affine;
    ///
    /// let affine = Affine::from_zooms([2.0, 2.0, 2.0], [-90.0, -126.0, -72.0]);
    /// assert_eq!(affine.voxel_to_world(1, 0, 0), [-88.0, -126.0, -72.0]);
    /// ```
    pub fn from_zooms(zooms: [f64; 3], origin: [f64; 3]) -> Self {
        let mut affine = Self::identity();
        for axis in 0..3 {
            affine.matrix[axis][axis] = zooms[axis];
            affine.matrix[axis][3] = origin[axis];
        }
        affine
    }

    /// Get the underlying matrix
    #[inline]
    pub fn matrix(&self) -> &[[f64; 4]; 4] {
        &self.matrix
    }

    /// Voxel sizes along each axis (column norms of the linear part)
    pub fn zooms(&self) -> [f64; 3] {
        let mut zooms = [0.0; 3];
        for (axis, zoom) in zooms.iter_mut().enumerate() {
            *zoom = (0..3)
                .map(|row| self.matrix[row][axis].powi(2))
                .sum::<f64>()
                .sqrt();
        }
        zooms
    }

    /// Map a voxel index to world coordinates
    pub fn voxel_to_world(&self, x: usize, y: usize, z: usize) -> [f64; 3] {
        let v = [x as f64, y as f64, z as f64, 1.0];
        let mut out = [0.0; 3];
        for (row, o) in out.iter_mut().enumerate() {
            *o = (0..4).map(|col| self.matrix[row][col] * v[col]).sum();
        }
        out
    }
}

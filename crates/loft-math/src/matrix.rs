//! Small dense matrices for collocation solves.
//!
//! The surface fitter only ever inverts collocation matrices whose size is
//! the control-point count of one parametric direction, so everything here
//! is written for small dense systems: row-major storage, Gaussian
//! elimination with partial pivoting, and an explicit failure signal on
//! singular input.

use loft_core::{LoftError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Pivot magnitude below which elimination treats the matrix as singular.
const PIVOT_EPS: f64 = 1e-12;

/// A dense row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create an identity matrix of size `n`.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Create a matrix from nested rows.
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == ncols));
        Self {
            rows: nrows,
            cols: ncols,
            data: rows.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Dense matrix product `self * other`.
    ///
    /// Panics if the inner dimensions disagree; dimension mismatches here
    /// are programming errors, not data errors.
    pub fn mul(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "matrix product dimension mismatch: {}x{} * {}x{}",
            self.rows, self.cols, other.rows, other.cols
        );
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self[(i, k)];
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out[(i, j)] += a * other[(k, j)];
                }
            }
        }
        out
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }

    /// Determinant via LU factorization with partial pivoting.
    ///
    /// Returns 0.0 when elimination encounters a vanishing pivot.
    pub fn determinant(&self) -> f64 {
        assert!(self.is_square(), "determinant of non-square matrix");
        let n = self.rows;
        let mut lu = self.clone();
        let mut det = 1.0;

        for col in 0..n {
            let pivot_row = match lu.pivot_row(col, col) {
                Some(r) => r,
                None => return 0.0,
            };
            if pivot_row != col {
                lu.swap_rows(pivot_row, col);
                det = -det;
            }
            let pivot = lu[(col, col)];
            det *= pivot;
            for row in col + 1..n {
                let factor = lu[(row, col)] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in col..n {
                    let v = lu[(col, j)];
                    lu[(row, j)] -= factor * v;
                }
            }
        }
        det
    }

    /// Solve `self * X = rhs` for `X` by Gaussian elimination with partial
    /// pivoting.
    ///
    /// Fails with [`LoftError::SingularMatrix`] when no usable pivot exists;
    /// callers must treat that as a real outcome (degenerate collocation
    /// systems reach this path).
    pub fn solve(&self, rhs: &Matrix) -> Result<Matrix> {
        assert!(self.is_square(), "solve requires a square system");
        assert_eq!(
            self.rows, rhs.rows,
            "right-hand side row count must match system size"
        );
        let n = self.rows;
        let mut a = self.clone();
        let mut x = rhs.clone();

        // Forward elimination
        for col in 0..n {
            let pivot_row = a.pivot_row(col, col).ok_or_else(|| {
                LoftError::SingularMatrix(format!(
                    "no pivot in column {col} of a {n}x{n} system"
                ))
            })?;
            if pivot_row != col {
                a.swap_rows(pivot_row, col);
                x.swap_rows(pivot_row, col);
            }
            let pivot = a[(col, col)];
            for row in col + 1..n {
                let factor = a[(row, col)] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in col..n {
                    let v = a[(col, j)];
                    a[(row, j)] -= factor * v;
                }
                for j in 0..x.cols {
                    let v = x[(col, j)];
                    x[(row, j)] -= factor * v;
                }
            }
        }

        // Back substitution
        for col in (0..n).rev() {
            let pivot = a[(col, col)];
            for j in 0..x.cols {
                let mut sum = x[(col, j)];
                for k in col + 1..n {
                    sum -= a[(col, k)] * x[(k, j)];
                }
                x[(col, j)] = sum / pivot;
            }
        }
        Ok(x)
    }

    /// Matrix inverse, or [`LoftError::SingularMatrix`] when the matrix has
    /// no inverse.
    pub fn inverse(&self) -> Result<Matrix> {
        self.solve(&Matrix::identity(self.rows))
    }

    /// Row with the largest absolute value in `col`, at or below `start`.
    /// `None` when the whole column segment is numerically zero.
    fn pivot_row(&self, start: usize, col: usize) -> Option<usize> {
        let mut best = start;
        let mut best_mag = self[(start, col)].abs();
        for row in start + 1..self.rows {
            let mag = self[(row, col)].abs();
            if mag > best_mag {
                best = row;
                best_mag = mag;
            }
        }
        (best_mag > PIVOT_EPS).then_some(best)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

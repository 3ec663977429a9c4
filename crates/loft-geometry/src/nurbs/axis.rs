//! One parametric axis of a curve or surface: degree plus knot vector,
//! without control points.

use serde::{Deserialize, Serialize};

use super::basis::{basis, BasisMemo};
use super::knot;

/// Basis- and nodal-value queries for a single axis.
///
/// A surface owns one of these per direction; the nodal fitter builds them
/// for its collocation matrices. The knot vector is immutable once built,
/// so `last_span` is computed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisModel {
    degree: usize,
    knots: Vec<f64>,
    last_span: usize,
}

impl AxisModel {
    pub fn new(degree: usize, knots: Vec<f64>) -> Self {
        let last_span = knot::last_span(&knots);
        Self {
            degree,
            knots,
            last_span,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Number of control points this axis supports.
    pub fn control_count(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    pub fn domain(&self) -> (f64, f64) {
        knot::domain(&self.knots, self.degree)
    }

    /// Basis function `N_{i,degree}(t)`.
    pub fn basis(&self, i: usize, t: f64, memo: &mut BasisMemo) -> f64 {
        basis(&self.knots, self.last_span, i, self.degree, t, memo)
    }

    /// Greville abscissa for control index `i`: the mean of the `degree`
    /// knots `knot[i+1] ..= knot[i+degree]`.
    pub fn nodal_value(&self, i: usize) -> f64 {
        assert!(
            i + self.degree < self.knots.len(),
            "nodal value index {i} out of range for {} knots of degree {}",
            self.knots.len(),
            self.degree
        );
        if self.degree == 0 {
            return self.knots[i];
        }
        let sum: f64 = self.knots[i + 1..=i + self.degree].iter().sum();
        sum / self.degree as f64
    }

    /// Nodal abscissae for every control index.
    pub fn nodal_values(&self) -> Vec<f64> {
        (0..self.control_count()).map(|i| self.nodal_value(i)).collect()
    }

    /// Distinct knot values lying within the domain.
    pub fn distinct_knots(&self) -> Vec<f64> {
        let (lo, hi) = self.domain();
        let mut out: Vec<f64> = Vec::new();
        for &k in &self.knots {
            if k < lo || k > hi {
                continue;
            }
            if out.last().map_or(true, |&last| last < k) {
                out.push(k);
            }
        }
        out
    }
}

//! Knot vector construction and queries.

use serde::{Deserialize, Serialize};

/// Knot vector generation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KnotPolicy {
    /// Clamped at the lower end (`degree + 1` zeros), unit interior spacing,
    /// an upper run of `degree` knots one past the last interior knot, and a
    /// final knot another half step up. The asymmetric terminal step keeps
    /// the upper domain boundary inside a non-empty span, so half-open basis
    /// evaluation still covers the curve's own endpoint.
    #[default]
    OpenUniformModified,
    /// `knot[i] = i`, no clamping at either end.
    FloatingUniform,
}

/// Required knot count for `control_count` control points of `degree`.
pub fn required_len(degree: usize, control_count: usize) -> usize {
    control_count + degree + 1
}

/// Generate a knot vector for the given policy.
pub fn generate(policy: KnotPolicy, degree: usize, control_count: usize) -> Vec<f64> {
    let len = required_len(degree, control_count);
    match policy {
        KnotPolicy::FloatingUniform => (0..len).map(|i| i as f64).collect(),
        KnotPolicy::OpenUniformModified => {
            let mut knots = vec![0.0; len];
            for i in (degree + 1)..len {
                if i + 1 == len {
                    knots[i] = knots[len - degree - 2] + 1.5;
                } else if i + degree + 1 >= len {
                    // Constant base for the whole upper run, not a running sum
                    knots[i] = knots[len - degree - 2] + 1.0;
                } else {
                    knots[i] = knots[i - 1] + 1.0;
                }
            }
            knots
        }
    }
}

/// Whether a supplied knot vector is too short for `degree`/`control_count`
/// and must be regenerated.
pub fn needs_rebuild(knots: &[f64], degree: usize, control_count: usize) -> bool {
    knots.len() < required_len(degree, control_count)
}

/// Parameter domain `[knot[p], knot[N - p]]` with `N = len - 1`.
pub fn domain(knots: &[f64], degree: usize) -> (f64, f64) {
    (knots[degree], knots[knots.len() - 1 - degree])
}

/// Greatest index `i` with `knot[i] < knot[i+1]`, i.e. the last index before
/// the final multiplicity run. Governs right-endpoint inclusion in the
/// degree-0 basis. Returns 0 for a constant knot vector.
pub fn last_span(knots: &[f64]) -> usize {
    for i in (0..knots.len().saturating_sub(1)).rev() {
        if knots[i] < knots[i + 1] {
            return i;
        }
    }
    0
}

//! Recursive Cox–de Boor basis evaluation.

use std::collections::HashMap;

/// Memo table for one basis-evaluation pass.
///
/// Entries are keyed by `(i, k, t)` and are only meaningful for the knot
/// vector they were computed against: create a fresh table per knot vector
/// per evaluation pass, never a long-lived cross-mutation cache.
#[derive(Debug, Default)]
pub struct BasisMemo {
    cache: HashMap<(usize, usize, u64), f64>,
}

impl BasisMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn get(&self, i: usize, k: usize, t: f64) -> Option<f64> {
        self.cache.get(&(i, k, t.to_bits())).copied()
    }

    fn put(&mut self, i: usize, k: usize, t: f64, value: f64) {
        self.cache.insert((i, k, t.to_bits()), value);
    }
}

/// Evaluate the B-spline basis function `N_{i,k}(t)` over `knots`.
///
/// `last_span` is [`super::knot::last_span`] of the same knot vector; the
/// degree-0 base case treats `t == knots[last_span + 1]` as inside, so the
/// otherwise half-open support `[knot[i], knot[i+1])` does not exclude the
/// upper domain boundary.
///
/// Both recursive terms are dropped when their sub-basis is exactly zero,
/// and every span-length denominator is checked before dividing; repeated
/// knots therefore contribute zero terms instead of NaN.
pub fn basis(knots: &[f64], last_span: usize, i: usize, k: usize, t: f64, memo: &mut BasisMemo) -> f64 {
    if let Some(cached) = memo.get(i, k, t) {
        return cached;
    }

    let value = if k == 0 {
        if t == knots[last_span + 1] || (knots[i] <= t && t < knots[i + 1]) {
            1.0
        } else {
            0.0
        }
    } else if knots[i] >= knots[i + 1 + k] {
        // Entire support collapsed at this level
        0.0
    } else {
        let mut left = 0.0;
        let sub_left = basis(knots, last_span, i, k - 1, t, memo);
        if sub_left != 0.0 {
            let span = knots[i + k] - knots[i];
            if span != 0.0 {
                left = (t - knots[i]) / span * sub_left;
            }
        }

        let mut right = 0.0;
        let sub_right = basis(knots, last_span, i + 1, k - 1, t, memo);
        if sub_right != 0.0 {
            let span = knots[i + 1 + k] - knots[i + 1];
            if span != 0.0 {
                right = (knots[i + 1 + k] - t) / span * sub_right;
            }
        }

        left + right
    };

    memo.put(i, k, t, value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::knot::{self, KnotPolicy};

    fn basis_sum(knots: &[f64], degree: usize, count: usize, t: f64) -> f64 {
        let last = knot::last_span(knots);
        let mut memo = BasisMemo::new();
        (0..count).map(|i| basis(knots, last, i, degree, t, &mut memo)).sum()
    }

    #[test]
    fn test_partition_of_unity_modified_open() {
        let knots = knot::generate(KnotPolicy::OpenUniformModified, 2, 5);
        let (t0, t1) = knot::domain(&knots, 2);
        for step in 0..=40 {
            let t = t0 + (t1 - t0) * step as f64 / 40.0;
            let sum = basis_sum(&knots, 2, 5, t);
            assert!((sum - 1.0).abs() < 1e-12, "sum at t={t}: {sum}");
        }
    }

    #[test]
    fn test_partition_of_unity_floating() {
        let knots = knot::generate(KnotPolicy::FloatingUniform, 3, 7);
        let (t0, t1) = knot::domain(&knots, 3);
        // Strictly inside the domain for a floating knot vector
        for step in 1..40 {
            let t = t0 + (t1 - t0) * step as f64 / 40.0;
            let sum = basis_sum(&knots, 3, 7, t);
            assert!((sum - 1.0).abs() < 1e-12, "sum at t={t}: {sum}");
        }
    }

    #[test]
    fn test_upper_domain_boundary_selects_last_basis() {
        // [0, 0, 0, 1, 1, 1.5]: t = 1 lies in the span [1, 1.5), so the last
        // basis carries everything at the upper domain boundary.
        let knots = knot::generate(KnotPolicy::OpenUniformModified, 2, 3);
        let last = knot::last_span(&knots);
        let mut memo = BasisMemo::new();
        assert!((basis(&knots, last, 2, 2, 1.0, &mut memo) - 1.0).abs() < 1e-12);
        assert_eq!(basis(&knots, last, 0, 2, 1.0, &mut memo), 0.0);
        assert_eq!(basis(&knots, last, 1, 2, 1.0, &mut memo), 0.0);
    }

    #[test]
    fn test_right_boundary_inclusion_for_clamped_vector() {
        // A fully clamped vector from a file has its upper boundary equal to
        // knots[last_span + 1]; the inclusion rule keeps it evaluable.
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let last = knot::last_span(&knots);
        assert_eq!(last, 2);
        let mut memo = BasisMemo::new();
        assert!((basis(&knots, last, 2, 2, 1.0, &mut memo) - 1.0).abs() < 1e-12);
        assert_eq!(basis(&knots, last, 0, 2, 1.0, &mut memo), 0.0);
        assert_eq!(basis(&knots, last, 1, 2, 1.0, &mut memo), 0.0);
    }

    #[test]
    fn test_repeated_interior_knots_stay_finite() {
        // Interior double knot: every denominator is guarded, so values are
        // finite and still sum to one inside the domain.
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 2.5];
        for step in 0..=20 {
            let t = 2.0 * step as f64 / 20.0;
            let sum = basis_sum(&knots, 2, 5, t);
            assert!(sum.is_finite());
            assert!((sum - 1.0).abs() < 1e-12, "sum at t={t}: {sum}");
        }
    }

    #[test]
    fn test_memo_is_consistent_with_recomputation() {
        let knots = knot::generate(KnotPolicy::OpenUniformModified, 3, 6);
        let last = knot::last_span(&knots);
        let t = 1.25;
        let mut shared = BasisMemo::new();
        for i in 0..6 {
            let with_shared = basis(&knots, last, i, 3, t, &mut shared);
            let mut fresh = BasisMemo::new();
            let recomputed = basis(&knots, last, i, 3, t, &mut fresh);
            assert_eq!(with_shared, recomputed);
        }
    }
}

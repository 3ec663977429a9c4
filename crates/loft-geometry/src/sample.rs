//! Sampling utilities for converting curves and surfaces into display
//! polylines and wireframe segments.

use loft_math::Point3;

use crate::curve::Curve;
use crate::surface::Surface;

/// Evenly spaced parameters over `(lo, hi)`: both endpoints plus `interior`
/// values strictly between them.
pub fn uniform_params((lo, hi): (f64, f64), interior: usize) -> Vec<f64> {
    let step = (hi - lo) / (interior + 1) as f64;
    let mut params = Vec::with_capacity(interior + 2);
    params.push(lo);
    for k in 1..=interior {
        params.push(lo + step * k as f64);
    }
    params.push(hi);
    params
}

/// Sample a curve into a polyline of `interior + 2` points: the lower domain
/// endpoint, `interior` evenly spaced interior points, the upper endpoint.
pub fn curve_polyline(curve: &dyn Curve, interior: usize) -> Vec<Point3> {
    uniform_params(curve.domain(), interior)
        .into_iter()
        .map(|t| curve.point_at(t))
        .collect()
}

/// Wireframe segments along fixed-`u` and fixed-`v` isolines.
///
/// Each fixed-`u` isoline is evaluated at exactly the `vs` parameters and
/// vice versa, so the two line families meet at shared surface points.
pub fn isoline_segments(surface: &dyn Surface, us: &[f64], vs: &[f64]) -> Vec<[Point3; 2]> {
    let mut segments = Vec::new();
    for &u in us {
        for pair in vs.windows(2) {
            segments.push([surface.point_at(u, pair[0]), surface.point_at(u, pair[1])]);
        }
    }
    for &v in vs {
        for pair in us.windows(2) {
            segments.push([surface.point_at(pair[0], v), surface.point_at(pair[1], v)]);
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_uniform_params_layout() {
        let params = uniform_params((0.0, 2.0), 3);
        assert_eq!(params.len(), 5);
        assert_eq!(params[0], 0.0);
        assert_eq!(params[4], 2.0);
        assert_abs_diff_eq!(params[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(params[2], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(params[3], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_params_no_interior() {
        let params = uniform_params((1.0, 3.0), 0);
        assert_eq!(params, vec![1.0, 3.0]);
    }
}

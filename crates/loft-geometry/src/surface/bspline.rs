//! Rational tensor-product B-spline (NURBS) surface.

use loft_core::traits::Validate;
use loft_core::{LoftError, Result};
use loft_math::Point3;
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::nurbs::axis::AxisModel;
use crate::nurbs::basis::BasisMemo;
use crate::sample;

/// Parameter nudge keeping evaluation strictly below the upper domain bound.
/// The 1-D basis handles its right endpoint with an inclusion special case;
/// the surface resolves the same concern by moving the argument instead.
const UPPER_NUDGE: f64 = 1e-6;

/// A weighted surface control point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Point3,
    pub weight: f64,
}

impl ControlPoint {
    pub fn new(position: Point3, weight: f64) -> Self {
        Self { position, weight }
    }

    pub fn unweighted(position: Point3) -> Self {
        Self {
            position,
            weight: 1.0,
        }
    }
}

/// A rational tensor-product B-spline surface.
///
/// The control grid is row-major by `u`: entry `(i, j)` for u-index `i` and
/// v-index `j` lives at `i * count_v + j`. Each axis is served by its own
/// [`AxisModel`]; the grid length must equal `count_u * count_v` where each
/// count is `knot_len - degree - 1` for that axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurbsSurface {
    axis_u: AxisModel,
    axis_v: AxisModel,
    grid: Vec<ControlPoint>,
}

impl NurbsSurface {
    pub fn new(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        grid: Vec<ControlPoint>,
    ) -> Result<Self> {
        let surface = Self {
            axis_u: AxisModel::new(degree_u, knots_u),
            axis_v: AxisModel::new(degree_v, knots_v),
            grid,
        };
        surface.validate()?;
        Ok(surface)
    }

    /// Build a surface from bare positions, all weights 1.
    pub fn from_positions(
        degree_u: usize,
        degree_v: usize,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        positions: Vec<Point3>,
    ) -> Result<Self> {
        Self::new(
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            positions.into_iter().map(ControlPoint::unweighted).collect(),
        )
    }

    pub fn degree_u(&self) -> usize {
        self.axis_u.degree()
    }

    pub fn degree_v(&self) -> usize {
        self.axis_v.degree()
    }

    pub fn knots_u(&self) -> &[f64] {
        self.axis_u.knots()
    }

    pub fn knots_v(&self) -> &[f64] {
        self.axis_v.knots()
    }

    /// Control point count in the u direction.
    pub fn count_u(&self) -> usize {
        self.axis_u.control_count()
    }

    /// Control point count in the v direction.
    pub fn count_v(&self) -> usize {
        self.axis_v.control_count()
    }

    pub fn grid(&self) -> &[ControlPoint] {
        &self.grid
    }

    pub fn control_point(&self, i: usize, j: usize) -> &ControlPoint {
        assert!(
            i < self.count_u() && j < self.count_v(),
            "control grid index ({i}, {j}) out of range for {}x{}",
            self.count_u(),
            self.count_v()
        );
        &self.grid[i * self.count_v() + j]
    }

    /// Nodal abscissae of the u axis, one per u control index.
    pub fn nodal_values_u(&self) -> Vec<f64> {
        self.axis_u.nodal_values()
    }

    /// Nodal abscissae of the v axis, one per v control index.
    pub fn nodal_values_v(&self) -> Vec<f64> {
        self.axis_v.nodal_values()
    }

    /// Rational evaluation with caller-provided per-axis memo tables.
    ///
    /// The parameters are clamped strictly below the upper domain bounds;
    /// the weighted basis products are normalized by their own sum, which
    /// reduces to the plain tensor product when every weight is 1.
    pub fn point_at_with(
        &self,
        u: f64,
        v: f64,
        memo_u: &mut BasisMemo,
        memo_v: &mut BasisMemo,
    ) -> Point3 {
        let u = u.min(self.domain_u().1 - UPPER_NUDGE);
        let v = v.min(self.domain_v().1 - UPPER_NUDGE);

        let count_u = self.count_u();
        let count_v = self.count_v();

        let basis_u: Vec<f64> = (0..count_u).map(|i| self.axis_u.basis(i, u, memo_u)).collect();
        let basis_v: Vec<f64> = (0..count_v).map(|j| self.axis_v.basis(j, v, memo_v)).collect();

        let mut weighted = Point3::ZERO;
        let mut bottom = 0.0;
        for i in 0..count_u {
            if basis_u[i] == 0.0 {
                continue;
            }
            for j in 0..count_v {
                let cp = &self.grid[i * count_v + j];
                let top = cp.weight * basis_u[i] * basis_v[j];
                if top != 0.0 {
                    weighted += top * cp.position;
                    bottom += top;
                }
            }
        }

        if bottom.abs() < 1e-15 {
            weighted
        } else {
            weighted / bottom
        }
    }

    /// Uniform wireframe: `u_divs`/`v_divs` spans per direction.
    pub fn wireframe(&self, u_divs: usize, v_divs: usize) -> Vec<[Point3; 2]> {
        let us = sample::uniform_params(self.domain_u(), u_divs.saturating_sub(1));
        let vs = sample::uniform_params(self.domain_v(), v_divs.saturating_sub(1));
        sample::isoline_segments(self, &us, &vs)
    }

    /// Isolines at the distinct knot values of each axis, cross-sampled with
    /// `divs` uniform spans.
    pub fn knot_isolines(&self, divs: usize) -> Vec<[Point3; 2]> {
        let us = self.axis_u.distinct_knots();
        let vs = sample::uniform_params(self.domain_v(), divs.saturating_sub(1));
        let mut segments = sample::isoline_segments(self, &us, &vs);

        let us = sample::uniform_params(self.domain_u(), divs.saturating_sub(1));
        let vs = self.axis_v.distinct_knots();
        segments.extend(sample::isoline_segments(self, &us, &vs));
        segments
    }

    /// Isolines at the nodal abscissae of each axis, cross-sampled with
    /// `divs` uniform spans.
    pub fn nodal_isolines(&self, divs: usize) -> Vec<[Point3; 2]> {
        let us = self.nodal_values_u();
        let vs = sample::uniform_params(self.domain_v(), divs.saturating_sub(1));
        let mut segments = sample::isoline_segments(self, &us, &vs);

        let us = sample::uniform_params(self.domain_u(), divs.saturating_sub(1));
        let vs = self.nodal_values_v();
        segments.extend(sample::isoline_segments(self, &us, &vs));
        segments
    }
}

impl Validate for NurbsSurface {
    fn validate(&self) -> Result<()> {
        let expected = self.count_u() * self.count_v();
        if self.grid.len() != expected {
            return Err(LoftError::Geometry(format!(
                "control grid has {} entries, expected {} ({}x{})",
                self.grid.len(),
                expected,
                self.count_u(),
                self.count_v()
            )));
        }
        Ok(())
    }
}

impl Surface for NurbsSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let mut memo_u = BasisMemo::new();
        let mut memo_v = BasisMemo::new();
        self.point_at_with(u, v, &mut memo_u, &mut memo_v)
    }

    fn domain_u(&self) -> (f64, f64) {
        self.axis_u.domain()
    }

    fn domain_v(&self) -> (f64, f64) {
        self.axis_v.domain()
    }
}

//! B-spline curve owned by the editor: control points, knot vector, degree,
//! and the dirty/refresh discipline that keeps derived state honest.

use loft_core::{LoftError, Result};
use loft_math::Point3;
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::nurbs::basis::{basis, BasisMemo};
use crate::nurbs::knot::{self, KnotPolicy};
use crate::sample;

/// Coordinate dimension of a curve's control points.
///
/// Planar curves are stored with `z = 0`; the distinction only matters when
/// the curve is written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dimension {
    Two,
    #[default]
    Three,
}

impl Dimension {
    pub fn components(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

fn stale_default() -> bool {
    true
}

/// A B-spline curve.
///
/// Mutations mark the curve dirty; [`BSplineCurve::refresh`] must run before
/// the next evaluation is trusted. Refreshing regenerates the knot vector
/// when it is shorter than `control_count + degree + 1` (a longer externally
/// supplied vector is kept as-is) and drops the cached display polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BSplineCurve {
    degree: usize,
    dimension: Dimension,
    control_points: Vec<Point3>,
    knots: Vec<f64>,
    policy: KnotPolicy,
    /// Display tag round-tripped through the text format as `Green`.
    pub highlighted: bool,
    #[serde(skip, default = "stale_default")]
    dirty: bool,
    #[serde(skip)]
    polyline: Vec<Point3>,
    #[serde(skip)]
    polyline_samples: usize,
}

impl BSplineCurve {
    /// An empty curve of the given degree, knots generated on first refresh.
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            dimension: Dimension::default(),
            control_points: Vec::new(),
            knots: Vec::new(),
            policy: KnotPolicy::default(),
            highlighted: false,
            dirty: true,
            polyline: Vec::new(),
            polyline_samples: 0,
        }
    }

    /// A refreshed curve over the given control points, knots generated from
    /// the default policy.
    pub fn with_control_points(degree: usize, control_points: Vec<Point3>) -> Self {
        let mut curve = Self::new(degree);
        curve.control_points = control_points;
        curve.refresh();
        curve
    }

    /// Rebuild a curve from externally supplied parts (deserialized data).
    ///
    /// A knot vector shorter than required is regenerated silently; this is
    /// the permissive-ingestion rule of the text format.
    pub fn from_parts(
        degree: usize,
        dimension: Dimension,
        control_points: Vec<Point3>,
        knots: Vec<f64>,
        policy: KnotPolicy,
    ) -> Self {
        let mut curve = Self::new(degree);
        curve.dimension = dimension;
        curve.control_points = control_points;
        curve.knots = knots;
        curve.policy = policy;
        curve.refresh();
        curve
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn policy(&self) -> KnotPolicy {
        self.policy
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dimension(&mut self, dimension: Dimension) {
        self.dimension = dimension;
    }

    pub fn set_policy(&mut self, policy: KnotPolicy) {
        self.policy = policy;
        self.dirty = true;
    }

    /// Change the degree. The old knot vector cannot fit the new degree, so
    /// it is dropped and regenerated on refresh.
    pub fn set_degree(&mut self, degree: usize) {
        self.degree = degree;
        self.knots.clear();
        self.dirty = true;
    }

    pub fn add_control_point(&mut self, point: Point3) {
        self.control_points.push(point);
        self.dirty = true;
    }

    pub fn add_control_points(&mut self, points: &[Point3]) {
        self.control_points.extend_from_slice(points);
        self.dirty = true;
    }

    pub fn insert_control_point(&mut self, index: usize, point: Point3) -> Result<()> {
        if index > self.control_points.len() {
            return Err(LoftError::InvalidIndex {
                index,
                context: format!("insert into {} control points", self.control_points.len()),
            });
        }
        self.control_points.insert(index, point);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_control_point(&mut self, index: usize) -> Result<Point3> {
        if index >= self.control_points.len() {
            return Err(LoftError::InvalidIndex {
                index,
                context: format!("remove from {} control points", self.control_points.len()),
            });
        }
        self.dirty = true;
        Ok(self.control_points.remove(index))
    }

    pub fn set_control_point(&mut self, index: usize, point: Point3) -> Result<()> {
        if index >= self.control_points.len() {
            return Err(LoftError::InvalidIndex {
                index,
                context: format!("move within {} control points", self.control_points.len()),
            });
        }
        self.control_points[index] = point;
        self.dirty = true;
        Ok(())
    }

    /// Replace the knot vector wholesale. Kept verbatim if long enough,
    /// regenerated on refresh otherwise.
    pub fn set_knots(&mut self, knots: Vec<f64>) {
        self.knots = knots;
        self.dirty = true;
    }

    /// Append one knot value (streaming deserialization).
    pub fn push_knot(&mut self, value: f64) {
        self.knots.push(value);
        self.dirty = true;
    }

    /// Force a rebuild of the knot vector from the active policy.
    pub fn regenerate_knots(&mut self) {
        self.knots = knot::generate(self.policy, self.degree, self.control_points.len());
        self.polyline.clear();
        self.dirty = false;
    }

    /// Bring derived state up to date after mutations.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        if knot::needs_rebuild(&self.knots, self.degree, self.control_points.len()) {
            self.knots = knot::generate(self.policy, self.degree, self.control_points.len());
        }
        self.polyline.clear();
        self.dirty = false;
    }

    /// Greville abscissa for control index `i`.
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

    /// Last strictly increasing knot index; see [`knot::last_span`].
    pub fn last_span(&self) -> usize {
        knot::last_span(&self.knots)
    }

    /// Evaluate with a caller-provided memo table (one table per curve per
    /// evaluation pass).
    pub fn point_at_with(&self, t: f64, memo: &mut BasisMemo) -> Point3 {
        debug_assert!(!self.dirty, "evaluating a dirty curve; call refresh first");
        let last = self.last_span();
        let mut point = Point3::ZERO;
        for (i, cp) in self.control_points.iter().enumerate() {
            let b = basis(&self.knots, last, i, self.degree, t, memo);
            if b != 0.0 {
                point += b * *cp;
            }
        }
        point
    }

    /// Sampled polyline: both domain endpoints plus `interior` evenly spaced
    /// parameters between them, `interior + 2` points total.
    pub fn sample(&self, interior: usize) -> Vec<Point3> {
        sample::curve_polyline(self, interior)
    }

    /// Cached display polyline, recomputed when the curve is dirty or the
    /// requested resolution changed.
    pub fn update_polyline(&mut self, interior: usize) -> &[Point3] {
        self.refresh();
        if self.polyline.is_empty() || self.polyline_samples != interior {
            self.polyline = self.sample(interior);
            self.polyline_samples = interior;
        }
        &self.polyline
    }
}

impl Curve for BSplineCurve {
    fn point_at(&self, t: f64) -> Point3 {
        let mut memo = BasisMemo::new();
        self.point_at_with(t, &mut memo)
    }

    fn domain(&self) -> (f64, f64) {
        knot::domain(&self.knots, self.degree)
    }
}

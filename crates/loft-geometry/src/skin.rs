//! Surface skinning: fit a tensor-product surface through an ordered
//! network of cross-section curves so that the surface reproduces each
//! section's control points at the nodal parameters.
//!
//! The interpolation problem is separable, so it is solved as two small 1-D
//! collocation systems per coordinate axis instead of one large 2-D system:
//! `C = F⁻¹ · H · (Gᵀ)⁻¹` with `F` the u-basis collocation matrix at the
//! u nodal abscissae and `Gᵀ` its v counterpart.

use log::debug;
use loft_core::traits::Validate;
use loft_core::{LoftError, Result, Tolerance};
use loft_math::{DVec3, Matrix};

use crate::curve::BSplineCurve;
use crate::nurbs::axis::AxisModel;
use crate::nurbs::basis::BasisMemo;
use crate::nurbs::knot::{self, KnotPolicy};
use crate::surface::{ControlPoint, NurbsSurface};

/// Degree of the fitted surface across the cross sections.
pub const SKIN_DEGREE_V: usize = 2;

/// An ordered network of cross-section curves sharing degree and knots,
/// consumed once to fit a surface.
#[derive(Debug, Clone)]
pub struct NodalNetwork {
    sections: Vec<BSplineCurve>,
    tolerance: Tolerance,
}

impl NodalNetwork {
    /// Wrap and validate a list of cross sections. Every curve is refreshed
    /// so its knot vector is authoritative before validation.
    pub fn new(mut sections: Vec<BSplineCurve>) -> Result<Self> {
        for section in &mut sections {
            section.refresh();
        }
        let network = Self {
            sections,
            tolerance: Tolerance::default_precision(),
        };
        network.validate()?;
        Ok(network)
    }

    pub fn sections(&self) -> &[BSplineCurve] {
        &self.sections
    }

    /// Fit the interpolating surface through the network.
    ///
    /// The sections' shared knot vector and degree define the u direction;
    /// the v direction is degree [`SKIN_DEGREE_V`] with a modified-open knot
    /// vector sized to the section count. A singular collocation matrix
    /// (degenerate nodal configuration) fails the whole fit.
    pub fn skin(&self) -> Result<NurbsSurface> {
        let sections = &self.sections;
        let across = sections.len(); // m + 1 cross sections
        let along = sections[0].control_points().len(); // n + 1 points each
        let degree_u = sections[0].degree();

        let knots_u = sections[0].knots().to_vec();
        let knots_v = knot::generate(KnotPolicy::OpenUniformModified, SKIN_DEGREE_V, across);
        let axis_u = AxisModel::new(degree_u, knots_u.clone());
        let axis_v = AxisModel::new(SKIN_DEGREE_V, knots_v.clone());

        debug!(
            "skinning {across} sections of {along} points, degree {degree_u} x {SKIN_DEGREE_V}"
        );

        // Collocation matrix of the u basis at the u nodal abscissae
        let mut f = Matrix::zeros(along, along);
        let mut memo_u = BasisMemo::new();
        for j in 0..along {
            let t = axis_u.nodal_value(j);
            for i in 0..along {
                f[(j, i)] = axis_u.basis(i, t, &mut memo_u);
            }
        }

        // Transposed v collocation matrix: Gᵀ[i][j] = Bv_i(nodal_v(j))
        let mut gt = Matrix::zeros(across, across);
        let mut memo_v = BasisMemo::new();
        for j in 0..across {
            let t = axis_v.nodal_value(j);
            for i in 0..across {
                gt[(i, j)] = axis_v.basis(i, t, &mut memo_v);
            }
        }

        let f_inv = f.inverse()?;
        let gt_inv = gt.inverse()?;

        // One interpolation solve per coordinate: C = F⁻¹ · H · (Gᵀ)⁻¹,
        // where H[j][i] is coordinate of point j on section i
        let mut solved = Vec::with_capacity(3);
        for axis in 0..3 {
            let mut h = Matrix::zeros(along, across);
            for (i, section) in sections.iter().enumerate() {
                for (j, cp) in section.control_points().iter().enumerate() {
                    h[(j, i)] = cp[axis];
                }
            }
            solved.push(f_inv.mul(&h).mul(&gt_inv));
        }

        // Control grid, u index along the sections, v index across them
        let mut grid = Vec::with_capacity(along * across);
        for j in 0..along {
            for i in 0..across {
                let position = DVec3::new(
                    solved[0][(j, i)],
                    solved[1][(j, i)],
                    solved[2][(j, i)],
                );
                grid.push(ControlPoint::unweighted(position));
            }
        }

        NurbsSurface::new(degree_u, SKIN_DEGREE_V, knots_u, knots_v, grid)
    }
}

impl Validate for NodalNetwork {
    fn validate(&self) -> Result<()> {
        if self.sections.len() <= SKIN_DEGREE_V {
            return Err(LoftError::Geometry(format!(
                "nodal network needs at least {} cross sections, got {}",
                SKIN_DEGREE_V + 1,
                self.sections.len()
            )));
        }

        let first = &self.sections[0];
        if first.control_points().len() <= first.degree() {
            return Err(LoftError::Geometry(format!(
                "cross sections need more than degree {} control points, got {}",
                first.degree(),
                first.control_points().len()
            )));
        }

        for (index, section) in self.sections.iter().enumerate().skip(1) {
            if section.degree() != first.degree() {
                return Err(LoftError::Geometry(format!(
                    "section {index} has degree {}, expected {}",
                    section.degree(),
                    first.degree()
                )));
            }
            if section.control_points().len() != first.control_points().len() {
                return Err(LoftError::Geometry(format!(
                    "section {index} has {} control points, expected {}",
                    section.control_points().len(),
                    first.control_points().len()
                )));
            }
            let same_knots = section.knots().len() == first.knots().len()
                && section
                    .knots()
                    .iter()
                    .zip(first.knots())
                    .all(|(&a, &b)| self.tolerance.parametric_eq(a, b));
            if !same_knots {
                return Err(LoftError::Geometry(format!(
                    "section {index} does not share the network knot vector"
                )));
            }
        }
        Ok(())
    }
}

/// Convenience wrapper: validate and skin in one call.
pub fn skin_curves(sections: Vec<BSplineCurve>) -> Result<NurbsSurface> {
    NodalNetwork::new(sections)?.skin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    fn section(z: f64, lift: f64) -> BSplineCurve {
        BSplineCurve::with_control_points(
            2,
            vec![
                dvec3(0.0, 0.0, z),
                dvec3(1.0, lift, z),
                dvec3(2.0, lift, z),
                dvec3(3.0, 0.0, z),
            ],
        )
    }

    #[test]
    fn test_too_few_sections_rejected() {
        let result = NodalNetwork::new(vec![section(0.0, 1.0), section(1.0, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_point_counts_rejected() {
        let short = BSplineCurve::with_control_points(
            2,
            vec![dvec3(0.0, 0.0, 2.0), dvec3(1.0, 1.0, 2.0), dvec3(2.0, 0.0, 2.0)],
        );
        let result = NodalNetwork::new(vec![section(0.0, 1.0), section(1.0, 2.0), short]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mismatched_knots_rejected() {
        let mut skewed = section(2.0, 1.0);
        skewed.set_knots(vec![0.0, 0.0, 0.0, 1.5, 2.0, 2.0, 2.5]);
        skewed.refresh();
        let result = NodalNetwork::new(vec![section(0.0, 1.0), section(1.0, 2.0), skewed]);
        assert!(result.is_err());
    }

    #[test]
    fn test_skinned_surface_shape() {
        let surface =
            skin_curves(vec![section(0.0, 1.0), section(1.0, 2.0), section(2.0, 1.0)]).unwrap();
        assert_eq!(surface.degree_u(), 2);
        assert_eq!(surface.degree_v(), SKIN_DEGREE_V);
        assert_eq!(surface.count_u(), 4);
        assert_eq!(surface.count_v(), 3);
        assert_eq!(surface.knots_v(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.5]);
    }
}

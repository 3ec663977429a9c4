//! Nodal curve-network text format.
//!
//! ```text
//! <curveCount> <degree> <pointsPerCurve>
//! <shared knot vector, pointsPerCurve + degree + 1 values>
//! <x> <y> <z>            (curveCount blocks of pointsPerCurve lines)
//! ```
//!
//! Every curve in the network shares the one knot vector and degree; the
//! parsed list feeds the nodal surface fitter directly.

use std::fmt::Write as _;
use std::path::Path;

use log::debug;
use loft_core::{LoftError, Result};
use loft_geometry::nurbs::KnotPolicy;
use loft_geometry::{BSplineCurve, Dimension};
use loft_math::DVec3;

use crate::reader::{self, LineReader};

/// Serialize a nodal network. The sections are assumed validated (equal
/// sizes, shared knots); the first section provides the header data.
pub fn serialize_network(sections: &[BSplineCurve]) -> String {
    let mut out = String::new();
    let Some(first) = sections.first() else {
        let _ = writeln!(out, "0 0 0");
        return out;
    };

    let _ = writeln!(
        out,
        "{} {} {}",
        sections.len(),
        first.degree(),
        first.control_points().len()
    );
    let knots: Vec<String> = first.knots().iter().map(f64::to_string).collect();
    let _ = writeln!(out, "{}", knots.join(" "));

    for section in sections {
        for point in section.control_points() {
            let _ = writeln!(out, "{} {} {}", point.x, point.y, point.z);
        }
    }
    out
}

/// Parse a nodal network document into its cross-section curves.
pub fn parse_network(input: &str) -> Result<Vec<BSplineCurve>> {
    let mut reader = LineReader::new(input);

    let header = reader.expect_line("network header")?;
    if header.len() < 3 {
        return Err(LoftError::Parse(
            "network header needs curve count, degree, and points per curve".into(),
        ));
    }
    let curve_count = reader::count(header[0])?;
    let degree = reader::count(header[1])?;
    let points_per_curve = reader::count(header[2])?;
    debug!("network of {curve_count} sections, degree {degree}, {points_per_curve} points each");

    // A shared knot vector shorter than required is regenerated by the
    // curves themselves on refresh
    let knots = reader::reals(reader.expect_line("shared knot vector")?)?;

    let mut sections = Vec::with_capacity(curve_count);
    for _ in 0..curve_count {
        let mut points = Vec::with_capacity(points_per_curve);
        for _ in 0..points_per_curve {
            let tokens = reader.expect_line("network control point")?;
            if tokens.len() < 3 {
                return Err(LoftError::Parse(format!(
                    "network control point line has {} tokens, expected 3",
                    tokens.len()
                )));
            }
            points.push(DVec3::new(
                reader::real(tokens[0])?,
                reader::real(tokens[1])?,
                reader::real(tokens[2])?,
            ));
        }
        sections.push(BSplineCurve::from_parts(
            degree,
            Dimension::Three,
            points,
            knots.clone(),
            KnotPolicy::OpenUniformModified,
        ));
    }
    Ok(sections)
}

/// Read a nodal network from a file.
pub fn load_network(path: impl AsRef<Path>) -> Result<Vec<BSplineCurve>> {
    parse_network(&std::fs::read_to_string(path)?)
}

/// Write a nodal network to a file.
pub fn save_network(path: impl AsRef<Path>, sections: &[BSplineCurve]) -> Result<()> {
    std::fs::write(path, serialize_network(sections))?;
    Ok(())
}

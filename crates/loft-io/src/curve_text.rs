//! Curve-group text format.
//!
//! ```text
//! <curveCount> <minX> <maxX> <minY> <maxY>
//! <degree> [Green]
//! <pointCount>
//! <x> <y> [<z>]          (pointCount lines)
//! 1                      (knot vector follows)
//! <k0> <k1> ... <kN>
//! ```
//!
//! A knot flag of `0` means "derive the knot vector from the modified-open
//! policy". The header's bounding box is the group's extents rescaled to a
//! fixed physical width, centered on the origin.

use std::fmt::Write as _;
use std::path::Path;

use log::debug;
use loft_core::{LoftError, Result};
use loft_geometry::nurbs::KnotPolicy;
use loft_geometry::{BSplineCurve, Dimension};
use loft_math::{Aabb2, DVec2, DVec3};

use crate::reader::{self, LineReader};

/// Physical sheet width the serialized bounding box is scaled to.
const SHEET_WIDTH: f64 = 3.6;

/// Serialize a curve group.
pub fn serialize_curves(curves: &[BSplineCurve]) -> String {
    let mut out = String::new();

    let planar: Vec<DVec2> = curves
        .iter()
        .flat_map(|c| c.control_points().iter().map(|p| DVec2::new(p.x, p.y)))
        .collect();
    let bounds = Aabb2::from_points(&planar)
        .unwrap_or_else(|| Aabb2::new(DVec2::ZERO, DVec2::ZERO));

    let w = SHEET_WIDTH;
    let h = if bounds.width() > 0.0 {
        w * bounds.height() / bounds.width()
    } else {
        w
    };
    let _ = writeln!(
        out,
        "{} {} {} {} {}",
        curves.len(),
        -0.5 * w,
        0.5 * w,
        -0.5 * h,
        0.5 * h
    );

    for curve in curves {
        if curve.highlighted {
            let _ = writeln!(out, "{} Green", curve.degree());
        } else {
            let _ = writeln!(out, "{}", curve.degree());
        }
        let _ = writeln!(out, "{}", curve.control_points().len());
        for point in curve.control_points() {
            match curve.dimension() {
                Dimension::Two => {
                    let _ = writeln!(out, "{}  {}", point.x, point.y);
                }
                Dimension::Three => {
                    let _ = writeln!(out, "{}  {}  {}", point.x, point.y, point.z);
                }
            }
        }
        let _ = writeln!(out, "1");
        let knots: Vec<String> = curve.knots().iter().map(f64::to_string).collect();
        let _ = writeln!(out, "{}", knots.join(" "));
    }

    out
}

/// Parse a curve group document.
pub fn parse_curves(input: &str) -> Result<Vec<BSplineCurve>> {
    let mut reader = LineReader::new(input);

    // Header: curve count plus the sheet bounding box, which only matters
    // to consumers of the physical layout
    let header = reader.expect_line("curve group header")?;
    let declared = reader::count(header[0])?;
    debug!("curve group declares {declared} curves");

    let mut curves = Vec::with_capacity(declared);
    while !reader.is_empty() {
        curves.push(parse_one_curve(&mut reader)?);
    }

    if curves.len() != declared {
        debug!(
            "curve group declared {declared} curves but contained {}",
            curves.len()
        );
    }
    Ok(curves)
}

fn parse_one_curve(reader: &mut LineReader<'_>) -> Result<BSplineCurve> {
    let degree_line = reader.expect_line("curve degree")?;
    let degree = reader::count(degree_line[0])?;
    let highlighted = degree_line.get(1).is_some_and(|&tag| tag == "Green");

    let count_line = reader.expect_line("control point count")?;
    let point_count = reader::count(count_line[0])?;

    let mut dimension = Dimension::default();
    let mut points = Vec::with_capacity(point_count);
    for _ in 0..point_count {
        let tokens = reader.expect_line("control point")?;
        match tokens.len() {
            2 => {
                dimension = Dimension::Two;
                points.push(DVec3::new(reader::real(tokens[0])?, reader::real(tokens[1])?, 0.0));
            }
            3 => {
                dimension = Dimension::Three;
                points.push(DVec3::new(
                    reader::real(tokens[0])?,
                    reader::real(tokens[1])?,
                    reader::real(tokens[2])?,
                ));
            }
            n => {
                return Err(LoftError::Parse(format!(
                    "control point line has {n} tokens, expected 2 or 3"
                )));
            }
        }
    }

    let flag_line = reader.expect_line("knot vector flag")?;
    let knots = if reader::count(flag_line[0])? == 1 {
        reader::reals(reader.expect_line("knot vector")?)?
    } else {
        // Derive from policy on refresh
        Vec::new()
    };

    let mut curve = BSplineCurve::from_parts(
        degree,
        dimension,
        points,
        knots,
        KnotPolicy::OpenUniformModified,
    );
    curve.highlighted = highlighted;
    Ok(curve)
}

/// Read a curve group from a file.
pub fn load_curves(path: impl AsRef<Path>) -> Result<Vec<BSplineCurve>> {
    parse_curves(&std::fs::read_to_string(path)?)
}

/// Write a curve group to a file.
pub fn save_curves(path: impl AsRef<Path>, curves: &[BSplineCurve]) -> Result<()> {
    std::fs::write(path, serialize_curves(curves))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;

    #[test]
    fn test_parse_two_dimensional_group() {
        let input = "\
# a comment
2 -1.8 1.8 -1.8 1.8
2
3
0 0
1 2
2 0
0
3 Green
4
0 0 1
1 1 1
2 1 1
3 0 1
1
0 0 0 0 1 1 1 1.5
";
        let curves = parse_curves(input).unwrap();
        assert_eq!(curves.len(), 2);

        let first = &curves[0];
        assert_eq!(first.degree(), 2);
        assert_eq!(first.dimension(), Dimension::Two);
        assert!(!first.highlighted);
        // Flag 0: knots derived from the modified-open policy
        assert_eq!(first.knots(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.5]);

        let second = &curves[1];
        assert_eq!(second.degree(), 3);
        assert_eq!(second.dimension(), Dimension::Three);
        assert!(second.highlighted);
        assert_eq!(second.knots(), &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.5]);
    }

    #[test]
    fn test_short_supplied_knots_are_regenerated() {
        let input = "\
1 -1.8 1.8 -1.8 1.8
2
3
0 0
1 2
2 0
1
0 1
";
        let curves = parse_curves(input).unwrap();
        assert_eq!(curves[0].knots(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.5]);
    }

    #[test]
    fn test_header_box_is_sheet_scaled() {
        let curve = BSplineCurve::with_control_points(
            2,
            vec![dvec3(0.0, 0.0, 0.0), dvec3(2.0, 1.0, 0.0), dvec3(4.0, 0.0, 0.0)],
        );
        let text = serialize_curves(&[curve]);
        let header: Vec<&str> = text.lines().next().unwrap().split_whitespace().collect();
        assert_eq!(header[0], "1");
        // Width 4, height 1 -> sheet 3.6 x 0.9, centered
        assert_eq!(header[1], "-1.8");
        assert_eq!(header[2], "1.8");
        assert_eq!(header[3], "-0.45");
        assert_eq!(header[4], "0.45");
    }

    #[test]
    fn test_truncated_input_is_an_error() {
        let input = "1 0 1 0 1\n2\n3\n0 0\n1 1\n";
        assert!(parse_curves(input).is_err());
    }
}

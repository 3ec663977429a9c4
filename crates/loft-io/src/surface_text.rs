//! Surface text format.
//!
//! ```text
//! <surfaceCount>
//! <degreeU> <degreeV>
//! <knotLenU> <knotLenV>
//! <u knots, knotLenU values on one line>
//! <v knots, knotLenV values on one line>
//! <x> <y> <z> [<w>]      ((m+1)*(n+1) lines, v-fastest)
//! ```
//!
//! The weight defaults to 1 when absent. Control points arrive v-fastest in
//! u-major order, which is exactly the surface's grid layout.

use std::fmt::Write as _;
use std::path::Path;

use log::debug;
use loft_core::{LoftError, Result};
use loft_geometry::{ControlPoint, NurbsSurface};
use loft_math::DVec3;

use crate::reader::{self, LineReader};

/// Serialize a list of surfaces.
pub fn serialize_surfaces(surfaces: &[NurbsSurface]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", surfaces.len());

    for surface in surfaces {
        let _ = writeln!(out, "{} {}", surface.degree_u(), surface.degree_v());
        let _ = writeln!(out, "{} {}", surface.knots_u().len(), surface.knots_v().len());
        let knots_u: Vec<String> = surface.knots_u().iter().map(f64::to_string).collect();
        let _ = writeln!(out, "{}", knots_u.join(" "));
        let knots_v: Vec<String> = surface.knots_v().iter().map(f64::to_string).collect();
        let _ = writeln!(out, "{}", knots_v.join(" "));
        for cp in surface.grid() {
            let _ = writeln!(
                out,
                "{} {} {} {}",
                cp.position.x, cp.position.y, cp.position.z, cp.weight
            );
        }
    }

    out
}

/// Parse a surface document.
pub fn parse_surfaces(input: &str) -> Result<Vec<NurbsSurface>> {
    let mut reader = LineReader::new(input);

    let header = reader.expect_line("surface count")?;
    let declared = reader::count(header[0])?;
    debug!("surface file declares {declared} surfaces");

    let mut surfaces = Vec::with_capacity(declared);
    while !reader.is_empty() {
        surfaces.push(parse_one_surface(&mut reader)?);
    }
    Ok(surfaces)
}

fn parse_one_surface(reader: &mut LineReader<'_>) -> Result<NurbsSurface> {
    let degrees = reader.expect_line("surface degrees")?;
    if degrees.len() < 2 {
        return Err(LoftError::Parse("surface degree line needs two values".into()));
    }
    let degree_u = reader::count(degrees[0])?;
    let degree_v = reader::count(degrees[1])?;

    let lens = reader.expect_line("knot vector lengths")?;
    if lens.len() < 2 {
        return Err(LoftError::Parse("knot length line needs two values".into()));
    }
    let knot_len_u = reader::count(lens[0])?;
    let knot_len_v = reader::count(lens[1])?;

    let knots_u = reader::reals(reader.expect_line("u knot vector")?)?;
    let knots_v = reader::reals(reader.expect_line("v knot vector")?)?;
    if knots_u.len() != knot_len_u || knots_v.len() != knot_len_v {
        return Err(LoftError::Parse(format!(
            "knot vectors sized {}/{}, declared {knot_len_u}/{knot_len_v}",
            knots_u.len(),
            knots_v.len()
        )));
    }

    let count_u = knot_len_u
        .checked_sub(degree_u + 1)
        .ok_or_else(|| LoftError::Parse("u knot vector shorter than degree allows".into()))?;
    let count_v = knot_len_v
        .checked_sub(degree_v + 1)
        .ok_or_else(|| LoftError::Parse("v knot vector shorter than degree allows".into()))?;

    let mut grid = Vec::with_capacity(count_u * count_v);
    for _ in 0..count_u * count_v {
        let tokens = reader.expect_line("surface control point")?;
        if tokens.len() < 3 {
            return Err(LoftError::Parse(format!(
                "surface control point line has {} tokens, expected 3 or 4",
                tokens.len()
            )));
        }
        let position = DVec3::new(
            reader::real(tokens[0])?,
            reader::real(tokens[1])?,
            reader::real(tokens[2])?,
        );
        let weight = match tokens.get(3) {
            Some(token) => reader::real(token)?,
            None => 1.0,
        };
        grid.push(ControlPoint::new(position, weight));
    }

    NurbsSurface::new(degree_u, degree_v, knots_u, knots_v, grid)
}

/// Read surfaces from a file.
pub fn load_surfaces(path: impl AsRef<Path>) -> Result<Vec<NurbsSurface>> {
    parse_surfaces(&std::fs::read_to_string(path)?)
}

/// Write surfaces to a file.
pub fn save_surfaces(path: impl AsRef<Path>, surfaces: &[NurbsSurface]) -> Result<()> {
    std::fs::write(path, serialize_surfaces(surfaces))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT_PATCH: &str = "\
1
1 1
4 4
0 0 1 1
0 0 1 1
0 0 0
0 1 0
1 0 0
1 1 0.5
";

    #[test]
    fn test_parse_patch_with_default_weights() {
        let surfaces = parse_surfaces(FLAT_PATCH).unwrap();
        assert_eq!(surfaces.len(), 1);

        let surface = &surfaces[0];
        assert_eq!(surface.degree_u(), 1);
        assert_eq!(surface.count_u(), 2);
        assert_eq!(surface.count_v(), 2);
        assert!(surface.grid().iter().all(|cp| cp.weight == 1.0));
        assert_eq!(surface.control_point(1, 1).position.z, 0.5);
    }

    #[test]
    fn test_parse_explicit_weight() {
        let input = FLAT_PATCH.replace("1 1 0.5", "1 1 0.5 2.5");
        let surfaces = parse_surfaces(&input).unwrap();
        assert_eq!(surfaces[0].control_point(1, 1).weight, 2.5);
    }

    #[test]
    fn test_missing_control_points_is_an_error() {
        let truncated = "1\n1 1\n4 4\n0 0 1 1\n0 0 1 1\n0 0 0\n";
        assert!(parse_surfaces(truncated).is_err());
    }

    #[test]
    fn test_knot_length_mismatch_is_an_error() {
        let input = "1\n1 1\n4 5\n0 0 1 1\n0 0 1 1\n";
        assert!(parse_surfaces(input).is_err());
    }
}

use glam::dvec3;
use loft_geometry::skin::{skin_curves, NodalNetwork};
use loft_geometry::{BSplineCurve, Surface};
use loft_math::Point3;

fn cross_sections() -> Vec<BSplineCurve> {
    // Three degree-2 sections of four control points each, sharing the
    // generated knot vector [0, 0, 0, 1, 2, 2, 2.5]
    vec![
        BSplineCurve::with_control_points(
            2,
            vec![
                dvec3(0.0, 0.0, 0.0),
                dvec3(1.0, 1.5, 0.0),
                dvec3(2.0, 1.5, 0.0),
                dvec3(3.0, 0.0, 0.0),
            ],
        ),
        BSplineCurve::with_control_points(
            2,
            vec![
                dvec3(0.0, 0.5, 1.0),
                dvec3(1.0, 2.5, 1.0),
                dvec3(2.0, 2.5, 1.0),
                dvec3(3.0, 0.5, 1.0),
            ],
        ),
        BSplineCurve::with_control_points(
            2,
            vec![
                dvec3(0.0, 0.0, 2.0),
                dvec3(1.0, 1.0, 2.0),
                dvec3(2.0, 1.0, 2.0),
                dvec3(3.0, 0.0, 2.0),
            ],
        ),
    ]
}

#[test]
fn skinned_surface_reproduces_sections_at_nodal_parameters() {
    let sections = cross_sections();
    let surface = skin_curves(sections.clone()).unwrap();

    let nodal_u = surface.nodal_values_u();
    let nodal_v = surface.nodal_values_v();
    assert_eq!(nodal_u.len(), 4);
    assert_eq!(nodal_v.len(), 3);

    for (i, section) in sections.iter().enumerate() {
        for (j, expected) in section.control_points().iter().enumerate() {
            let point = surface.point_at(nodal_u[j], nodal_v[i]);
            assert!(
                (point - *expected).length() < 1e-4,
                "section {i} point {j}: fitted {point:?}, expected {expected:?}"
            );
        }
    }
}

#[test]
fn skinning_a_planar_network_stays_planar() {
    // All sections in the y = 0 plane: the fitted surface must stay there
    let sections: Vec<BSplineCurve> = (0..4)
        .map(|i| {
            let z = i as f64;
            BSplineCurve::with_control_points(
                2,
                vec![
                    dvec3(0.0, 0.0, z),
                    dvec3(1.0, 0.0, z),
                    dvec3(2.0, 0.0, z),
                    dvec3(3.0, 0.0, z),
                ],
            )
        })
        .collect();

    let surface = skin_curves(sections).unwrap();
    let (u0, u1) = surface.domain_u();
    let (v0, v1) = surface.domain_v();
    for su in 0..=6 {
        for sv in 0..=6 {
            let u = u0 + (u1 - u0) * su as f64 / 6.0;
            let v = v0 + (v1 - v0) * sv as f64 / 6.0;
            let p = surface.point_at(u, v);
            assert!(p.y.abs() < 1e-9, "off-plane point {p:?} at ({u}, {v})");
        }
    }
}

#[test]
fn network_sections_are_refreshed_before_validation() {
    // Curves straight out of mutation (dirty, knots not yet regenerated)
    // are refreshed by the network constructor rather than rejected.
    let mut sections = Vec::new();
    for i in 0..3 {
        let mut curve = BSplineCurve::new(2);
        for j in 0..4 {
            curve.add_control_point(Point3::new(j as f64, (i * j) as f64, i as f64));
        }
        sections.push(curve);
    }
    let network = NodalNetwork::new(sections).unwrap();
    assert!(network.sections().iter().all(|s| !s.is_dirty()));
    network.skin().unwrap();
}

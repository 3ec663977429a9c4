//! loft geometry: knot vectors, Cox–de Boor basis evaluation, B-spline
//! curves, rational tensor-product surfaces, and nodal surface skinning.

pub mod curve;
pub mod nurbs;
pub mod sample;
pub mod skin;
pub mod surface;

pub use curve::{BSplineCurve, Curve, Dimension};
pub use skin::NodalNetwork;
pub use surface::{ControlPoint, NurbsSurface, Surface};

//! NURBS core: knot vector construction and recursive basis evaluation.

pub mod axis;
pub mod basis;
pub mod knot;

pub use axis::AxisModel;
pub use basis::{basis, BasisMemo};
pub use knot::KnotPolicy;

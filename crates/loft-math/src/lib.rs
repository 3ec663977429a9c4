pub mod aabb;
pub mod matrix;

pub use glam::{DVec2, DVec3, DVec4};

pub use aabb::Aabb2;
pub use matrix::Matrix;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;

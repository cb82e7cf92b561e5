//! Double-tier geometric primitives built on the vector and matrix types

pub mod bounds;
pub mod frustum;
pub mod plane;
pub mod ray;

pub use bounds::BoundingBox;
pub use frustum::Frustum;
pub use plane::{Plane, PlaneSide};
pub use ray::Ray;

//! Double-tier transform matrices
//!
//! Both types store their values column-major in a public `val` array and
//! expose the element indices as associated constants (`Matrix4::M12` is row
//! 1, column 2).

pub mod matrix3;
pub mod matrix4;

pub use matrix3::Matrix3;
pub use matrix4::Matrix4;

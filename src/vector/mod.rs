//! Double-tier vectors
//!
//! Mutable, `Copy` vectors whose algebra works in place and returns
//! `&mut Self` so operations chain: `v.sub(&origin).nor().scl(radius)`.
//! Nothing here allocates; [`Vector3::cpy`] and friends return a copy by
//! value when the original must be kept.

/// Component-wise `approx` comparisons for a vector type
macro_rules! impl_approx_eq {
    ($ty:ty; $($field:ident),+) => {
        impl approx::AbsDiffEq for $ty {
            type Epsilon = f64;

            fn default_epsilon() -> f64 {
                f64::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
                $(approx::AbsDiffEq::abs_diff_eq(&self.$field, &other.$field, epsilon))&&+
            }
        }

        impl approx::RelativeEq for $ty {
            fn default_max_relative() -> f64 {
                f64::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
                $(approx::RelativeEq::relative_eq(
                    &self.$field,
                    &other.$field,
                    epsilon,
                    max_relative,
                ))&&+
            }
        }
    };
}

pub(crate) use impl_approx_eq;

pub mod vector2;
pub mod vector3;
pub mod vector4;

pub use vector2::Vector2;
pub use vector3::Vector3;
pub use vector4::Vector4;

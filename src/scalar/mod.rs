//! Scalar functions behind a swappable accuracy policy
//!
//! Trigonometry in the kernel is routed through [`ScalarOps`] so that callers
//! can choose between library-exact results ([`Precise`]) and the lookup-table
//! approximations ([`Fast`]) used on hot per-frame paths. The policy is always
//! passed explicitly. A renderer that needs to toggle accuracy at runtime holds
//! an [`AccuracySwitch`] and hands a reference to it to the code that needs it.

use crate::constants::{FLOAT_ROUNDING_ERROR, PI2, RAD_TO_INDEX, SIN_COUNT, SIN_MASK};
use lazy_static::lazy_static;
use log::debug;
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::atomic::{AtomicBool, Ordering};

lazy_static! {
    /// Sine values sampled at the center of each table bucket
    static ref SIN_TABLE: Vec<f64> = {
        let mut table: Vec<f64> = (0..SIN_COUNT)
            .map(|i| ((i as f64 + 0.5) / SIN_COUNT as f64 * PI2).sin())
            .collect();
        // Exact values at the cardinal angles
        for quadrant in 0..4 {
            let index = quadrant * SIN_COUNT / 4;
            table[index & SIN_MASK] = (quadrant as f64 * FRAC_PI_2).sin();
        }
        table
    };
}

#[inline]
fn table_index(radians: f64) -> usize {
    // Floor so negative angles land in their own bucket, then wrap through the mask
    (radians * RAD_TO_INDEX).floor() as i64 as usize & SIN_MASK
}

/// Trigonometric and root functions under some accuracy policy
pub trait ScalarOps {
    fn sin(&self, radians: f64) -> f64;
    fn cos(&self, radians: f64) -> f64;
    fn tan(&self, radians: f64) -> f64;
    fn asin(&self, value: f64) -> f64;
    fn acos(&self, value: f64) -> f64;
    fn atan2(&self, y: f64, x: f64) -> f64;
    fn sqrt(&self, value: f64) -> f64;
}

/// Library-exact functions from `std`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Precise;

impl ScalarOps for Precise {
    #[inline]
    fn sin(&self, radians: f64) -> f64 {
        radians.sin()
    }

    #[inline]
    fn cos(&self, radians: f64) -> f64 {
        radians.cos()
    }

    #[inline]
    fn tan(&self, radians: f64) -> f64 {
        radians.tan()
    }

    #[inline]
    fn asin(&self, value: f64) -> f64 {
        value.asin()
    }

    #[inline]
    fn acos(&self, value: f64) -> f64 {
        value.acos()
    }

    #[inline]
    fn atan2(&self, y: f64, x: f64) -> f64 {
        y.atan2(x)
    }

    #[inline]
    fn sqrt(&self, value: f64) -> f64 {
        value.sqrt()
    }
}

/// Approximate functions for hot paths
///
/// `sin`/`cos`/`tan` read a 16384-entry table (error below 4e-4). `atan2` uses a
/// rational approximation with a largest error of about 0.005 rad. `sqrt`
/// starts from an exponent-halving bit trick and runs one Newton step.
/// `asin`/`acos` have no cheap approximation and fall through to `std`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fast;

impl ScalarOps for Fast {
    #[inline]
    fn sin(&self, radians: f64) -> f64 {
        SIN_TABLE[table_index(radians)]
    }

    #[inline]
    fn cos(&self, radians: f64) -> f64 {
        SIN_TABLE[table_index(radians + FRAC_PI_2)]
    }

    #[inline]
    fn tan(&self, radians: f64) -> f64 {
        self.sin(radians) / self.cos(radians)
    }

    #[inline]
    fn asin(&self, value: f64) -> f64 {
        value.asin()
    }

    #[inline]
    fn acos(&self, value: f64) -> f64 {
        value.acos()
    }

    fn atan2(&self, y: f64, x: f64) -> f64 {
        if x == 0.0 {
            if y > 0.0 {
                return FRAC_PI_2;
            }
            if y == 0.0 {
                return 0.0;
            }
            return -FRAC_PI_2;
        }
        let z = y / x;
        if z.abs() < 1.0 {
            let atan = z / (1.0 + 0.28 * z * z);
            if x < 0.0 {
                return atan + if y < 0.0 { -PI } else { PI };
            }
            return atan;
        }
        let atan = FRAC_PI_2 - z / (z * z + 0.28);
        if y < 0.0 {
            atan - PI
        } else {
            atan
        }
    }

    fn sqrt(&self, value: f64) -> f64 {
        if value <= 0.0 || !value.is_finite() {
            return value.sqrt();
        }
        let bits = ((value.to_bits() as i64 - (1_i64 << 52)) >> 1) + (1_i64 << 61);
        let guess = f64::from_bits(bits as u64);
        (guess + value / guess) / 2.0
    }
}

/// Statically chosen accuracy policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Accuracy {
    Fast,
    Precise,
}

impl Default for Accuracy {
    fn default() -> Self {
        Accuracy::Precise
    }
}

macro_rules! dispatch {
    ($self:expr, $method:ident($($arg:expr),*)) => {
        match $self {
            Accuracy::Fast => Fast.$method($($arg),*),
            Accuracy::Precise => Precise.$method($($arg),*),
        }
    };
}

impl ScalarOps for Accuracy {
    fn sin(&self, radians: f64) -> f64 {
        dispatch!(self, sin(radians))
    }

    fn cos(&self, radians: f64) -> f64 {
        dispatch!(self, cos(radians))
    }

    fn tan(&self, radians: f64) -> f64 {
        dispatch!(self, tan(radians))
    }

    fn asin(&self, value: f64) -> f64 {
        dispatch!(self, asin(value))
    }

    fn acos(&self, value: f64) -> f64 {
        dispatch!(self, acos(value))
    }

    fn atan2(&self, y: f64, x: f64) -> f64 {
        dispatch!(self, atan2(y, x))
    }

    fn sqrt(&self, value: f64) -> f64 {
        dispatch!(self, sqrt(value))
    }
}

/// Runtime toggle between [`Precise`] and [`Fast`]
///
/// Shared by reference between the settings layer and the math call sites.
/// A flip through [`AccuracySwitch::set_high_accuracy`] is observed by the next
/// call on any thread.
#[derive(Debug)]
pub struct AccuracySwitch {
    high_accuracy: AtomicBool,
}

impl AccuracySwitch {
    pub fn new(high_accuracy: bool) -> Self {
        AccuracySwitch {
            high_accuracy: AtomicBool::new(high_accuracy),
        }
    }

    pub fn set_high_accuracy(&self, high_accuracy: bool) {
        let previous = self.high_accuracy.swap(high_accuracy, Ordering::Relaxed);
        if previous != high_accuracy {
            debug!(
                "Trigonometry accuracy switched to {}",
                if high_accuracy { "precise" } else { "fast" }
            );
        }
    }

    pub fn is_high_accuracy(&self) -> bool {
        self.high_accuracy.load(Ordering::Relaxed)
    }

    /// The policy in effect right now
    pub fn current(&self) -> Accuracy {
        if self.is_high_accuracy() {
            Accuracy::Precise
        } else {
            Accuracy::Fast
        }
    }
}

impl Default for AccuracySwitch {
    fn default() -> Self {
        AccuracySwitch::new(true)
    }
}

impl ScalarOps for AccuracySwitch {
    fn sin(&self, radians: f64) -> f64 {
        self.current().sin(radians)
    }

    fn cos(&self, radians: f64) -> f64 {
        self.current().cos(radians)
    }

    fn tan(&self, radians: f64) -> f64 {
        self.current().tan(radians)
    }

    fn asin(&self, value: f64) -> f64 {
        self.current().asin(value)
    }

    fn acos(&self, value: f64) -> f64 {
        self.current().acos(value)
    }

    fn atan2(&self, y: f64, x: f64) -> f64 {
        self.current().atan2(y, x)
    }

    fn sqrt(&self, value: f64) -> f64 {
        self.current().sqrt(value)
    }
}

impl<T: ScalarOps + ?Sized> ScalarOps for &T {
    fn sin(&self, radians: f64) -> f64 {
        (**self).sin(radians)
    }

    fn cos(&self, radians: f64) -> f64 {
        (**self).cos(radians)
    }

    fn tan(&self, radians: f64) -> f64 {
        (**self).tan(radians)
    }

    fn asin(&self, value: f64) -> f64 {
        (**self).asin(value)
    }

    fn acos(&self, value: f64) -> f64 {
        (**self).acos(value)
    }

    fn atan2(&self, y: f64, x: f64) -> f64 {
        (**self).atan2(y, x)
    }

    fn sqrt(&self, value: f64) -> f64 {
        (**self).sqrt(value)
    }
}

// Helpers

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamps to `[0, 1]`
pub fn saturate(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + t * (to - from)
}

/// GLSL-style `mix`: `x * (1 - a) + y * a`
pub fn mix(x: f64, y: f64, a: f64) -> f64 {
    x * (1.0 - a) + y * a
}

/// Maps `x` from `[x0, x1]` onto `[y0, y1]`, clamping outside the domain.
///
/// Requires `x0 <= x1`; see [`lint`] for domains given in either order.
pub fn flint(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x < x0 {
        return y0;
    }
    if x > x1 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// Like [`flint`] but accepts `x0 > x1`
pub fn lint(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let (lo, hi) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
    if x < lo {
        return y0;
    }
    if x > hi {
        return y1;
    }
    y0 + (y1 - y0) * (x - lo) / (hi - lo)
}

pub fn is_zero(value: f64) -> bool {
    is_zero_within(value, FLOAT_ROUNDING_ERROR)
}

pub fn is_zero_within(value: f64, tolerance: f64) -> bool {
    value.abs() <= tolerance
}

pub fn is_equal(a: f64, b: f64) -> bool {
    is_equal_within(a, b, FLOAT_ROUNDING_ERROR)
}

pub fn is_equal_within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Rounds half away from zero to `places` decimal places
pub fn round_to_places(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

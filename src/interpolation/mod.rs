//! Easing curves
//!
//! Every curve is a variant of [`Interpolation`], a plain `Copy` value
//! mapping an alpha in `[0, 1]` to a shaped alpha, normally also in
//! `[0, 1]` (elastic and swing curves overshoot). Parameterized curves keep
//! their parameters inline; nothing here allocates.
//!
//! Trigonometric curves (sine and elastic) evaluate through a [`ScalarOps`]
//! policy when called with [`Interpolation::apply_with`].

use crate::scalar::{Precise, ScalarOps};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters of the exponential curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exp {
    value: f64,
    power: f64,
    min: f64,
    scale: f64,
}

impl Exp {
    pub fn new(value: f64, power: f64) -> Self {
        let min = value.powf(-power);
        Exp {
            value,
            power,
            min,
            scale: 1.0 / (1.0 - min),
        }
    }

    fn curve(&self, exponent: f64) -> f64 {
        (self.value.powf(exponent) - self.min) * self.scale
    }
}

/// Parameters of the elastic curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elastic {
    value: f64,
    power: f64,
    /// Bounce count in radians, signed so the curve leaves zero upwards
    bounces: f64,
    scale: f64,
}

impl Elastic {
    pub fn new(value: f64, power: f64, bounces: u32, scale: f64) -> Self {
        let sign = if bounces % 2 == 0 { 1.0 } else { -1.0 };
        Elastic {
            value,
            power,
            bounces: f64::from(bounces) * PI * sign,
            scale,
        }
    }

    fn wave<O: ScalarOps + ?Sized>(&self, ops: &O, a: f64) -> f64 {
        self.value.powf(self.power * (a - 1.0)) * ops.sin(a * self.bounces) * self.scale
    }
}

/// Most bounces a table holds
pub const MAX_BOUNCES: usize = 5;

/// Widths and heights of the arcs of a bounce curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceTable {
    widths: [f64; MAX_BOUNCES],
    heights: [f64; MAX_BOUNCES],
    len: usize,
}

impl BounceTable {
    /// Two bounces
    pub const TWO: BounceTable = BounceTable::preset(
        [1.2, 0.4, 0.0, 0.0, 0.0],
        [1.0, 0.33, 0.0, 0.0, 0.0],
        2,
    );
    /// Three bounces
    pub const THREE: BounceTable = BounceTable::preset(
        [0.8, 0.4, 0.2, 0.0, 0.0],
        [1.0, 0.33, 0.1, 0.0, 0.0],
        3,
    );
    /// Four bounces
    pub const FOUR: BounceTable = BounceTable::preset(
        [0.68, 0.34, 0.2, 0.15, 0.0],
        [1.0, 0.26, 0.11, 0.03, 0.0],
        4,
    );
    /// Five bounces
    pub const FIVE: BounceTable = BounceTable::preset(
        [0.6, 0.3, 0.2, 0.1, 0.1],
        [1.0, 0.45, 0.3, 0.15, 0.06],
        5,
    );

    /// Preset widths store the first arc at its full (doubled) width
    const fn preset(widths: [f64; MAX_BOUNCES], heights: [f64; MAX_BOUNCES], len: usize) -> Self {
        BounceTable {
            widths,
            heights,
            len,
        }
    }

    /// The standard table for 2 to 5 bounces
    pub fn new(bounces: usize) -> Result<Self> {
        match bounces {
            2 => Ok(Self::TWO),
            3 => Ok(Self::THREE),
            4 => Ok(Self::FOUR),
            5 => Ok(Self::FIVE),
            _ => Err(MathError::InvalidBounceCount(bounces)),
        }
    }

    /// A table from explicit arc widths and heights, used as given
    pub fn custom(widths: &[f64], heights: &[f64]) -> Result<Self> {
        if widths.len() != heights.len() || widths.is_empty() || widths.len() > MAX_BOUNCES {
            return Err(MathError::MismatchedBounceTable {
                widths: widths.len(),
                heights: heights.len(),
            });
        }
        let mut table = BounceTable::preset([0.0; MAX_BOUNCES], [0.0; MAX_BOUNCES], widths.len());
        table.widths[..widths.len()].copy_from_slice(widths);
        table.heights[..heights.len()].copy_from_slice(heights);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn out(&self, mut a: f64) -> f64 {
        if a == 1.0 {
            return 1.0;
        }
        a += self.widths[0] / 2.0;
        let mut width = 0.0;
        let mut height = 0.0;
        for i in 0..self.len {
            width = self.widths[i];
            if a <= width {
                height = self.heights[i];
                break;
            }
            a -= width;
        }
        a /= width;
        let z = 4.0 / width * height * a;
        1.0 - (z - z * a) * width
    }

    /// Bounce-out with the first half arc replaced by a straight ramp
    fn out_ramped(&self, a: f64) -> f64 {
        let test = a + self.widths[0] / 2.0;
        if test < self.widths[0] {
            return test / (self.widths[0] / 2.0) - 1.0;
        }
        self.out(a)
    }
}

/// An easing curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    Smooth,
    Smooth2,
    /// Perlin's smootherstep, also known as fade
    Smoother,
    Pow(i32),
    PowIn(i32),
    PowOut(i32),
    Pow2InInverse,
    Pow2OutInverse,
    Pow3InInverse,
    Pow3OutInverse,
    Exp(Exp),
    ExpIn(Exp),
    ExpOut(Exp),
    Elastic(Elastic),
    ElasticIn(Elastic),
    ElasticOut(Elastic),
    Swing(f64),
    SwingIn(f64),
    SwingOut(f64),
    Bounce(BounceTable),
    BounceIn(BounceTable),
    BounceOut(BounceTable),
    Sine,
    SineIn,
    SineOut,
    Circle,
    CircleIn,
    CircleOut,
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Linear
    }
}

impl Interpolation {
    pub const FADE: Interpolation = Interpolation::Smoother;
    pub const POW2: Interpolation = Interpolation::Pow(2);
    pub const POW2_IN: Interpolation = Interpolation::PowIn(2);
    pub const SLOW_FAST: Interpolation = Interpolation::PowIn(2);
    pub const POW2_OUT: Interpolation = Interpolation::PowOut(2);
    pub const FAST_SLOW: Interpolation = Interpolation::PowOut(2);
    pub const POW3: Interpolation = Interpolation::Pow(3);
    pub const POW3_IN: Interpolation = Interpolation::PowIn(3);
    pub const POW3_OUT: Interpolation = Interpolation::PowOut(3);
    pub const POW4: Interpolation = Interpolation::Pow(4);
    pub const POW4_IN: Interpolation = Interpolation::PowIn(4);
    pub const POW4_OUT: Interpolation = Interpolation::PowOut(4);
    pub const POW5: Interpolation = Interpolation::Pow(5);
    pub const POW5_IN: Interpolation = Interpolation::PowIn(5);
    pub const POW5_OUT: Interpolation = Interpolation::PowOut(5);
    pub const SWING: Interpolation = Interpolation::Swing(1.5);
    pub const SWING_IN: Interpolation = Interpolation::SwingIn(2.0);
    pub const SWING_OUT: Interpolation = Interpolation::SwingOut(2.0);
    pub const BOUNCE: Interpolation = Interpolation::Bounce(BounceTable::FOUR);
    pub const BOUNCE_IN: Interpolation = Interpolation::BounceIn(BounceTable::FOUR);
    pub const BOUNCE_OUT: Interpolation = Interpolation::BounceOut(BounceTable::FOUR);

    pub fn exp10() -> Self {
        Interpolation::Exp(Exp::new(2.0, 10.0))
    }

    pub fn exp10_in() -> Self {
        Interpolation::ExpIn(Exp::new(2.0, 10.0))
    }

    pub fn exp10_out() -> Self {
        Interpolation::ExpOut(Exp::new(2.0, 10.0))
    }

    pub fn exp5() -> Self {
        Interpolation::Exp(Exp::new(2.0, 5.0))
    }

    pub fn exp5_in() -> Self {
        Interpolation::ExpIn(Exp::new(2.0, 5.0))
    }

    pub fn exp5_out() -> Self {
        Interpolation::ExpOut(Exp::new(2.0, 5.0))
    }

    pub fn elastic() -> Self {
        Interpolation::Elastic(Elastic::new(2.0, 10.0, 7, 1.0))
    }

    pub fn elastic_in() -> Self {
        Interpolation::ElasticIn(Elastic::new(2.0, 10.0, 6, 1.0))
    }

    pub fn elastic_out() -> Self {
        Interpolation::ElasticOut(Elastic::new(2.0, 10.0, 7, 1.0))
    }

    /// Bounce in-out with `bounces` arcs, 2 to 5
    pub fn bounce(bounces: usize) -> Result<Self> {
        BounceTable::new(bounces).map(Interpolation::Bounce)
    }

    pub fn bounce_in(bounces: usize) -> Result<Self> {
        BounceTable::new(bounces).map(Interpolation::BounceIn)
    }

    pub fn bounce_out(bounces: usize) -> Result<Self> {
        BounceTable::new(bounces).map(Interpolation::BounceOut)
    }

    /// Shapes `a` using library-exact trigonometry
    pub fn apply(&self, a: f64) -> f64 {
        self.apply_with(&Precise, a)
    }

    /// Shapes `a`, evaluating sines and cosines through `ops`
    pub fn apply_with<O: ScalarOps + ?Sized>(&self, ops: &O, a: f64) -> f64 {
        match self {
            Interpolation::Linear => a,
            Interpolation::Smooth => a * a * (3.0 - 2.0 * a),
            Interpolation::Smooth2 => {
                let a = a * a * (3.0 - 2.0 * a);
                a * a * (3.0 - 2.0 * a)
            }
            Interpolation::Smoother => a * a * a * (a * (a * 6.0 - 15.0) + 10.0),
            Interpolation::Pow(power) => {
                if a <= 0.5 {
                    return (a * 2.0).powi(*power) / 2.0;
                }
                let divisor = if power % 2 == 0 { -2.0 } else { 2.0 };
                ((a - 1.0) * 2.0).powi(*power) / divisor + 1.0
            }
            Interpolation::PowIn(power) => a.powi(*power),
            Interpolation::PowOut(power) => {
                let sign = if power % 2 == 0 { -1.0 } else { 1.0 };
                (a - 1.0).powi(*power) * sign + 1.0
            }
            Interpolation::Pow2InInverse => a.sqrt(),
            Interpolation::Pow2OutInverse => 1.0 - (1.0 - a).sqrt(),
            Interpolation::Pow3InInverse => a.cbrt(),
            Interpolation::Pow3OutInverse => 1.0 - (1.0 - a).cbrt(),
            Interpolation::Exp(exp) => {
                if a <= 0.5 {
                    return exp.curve(exp.power * (a * 2.0 - 1.0)) / 2.0;
                }
                (2.0 - exp.curve(-exp.power * (a * 2.0 - 1.0))) / 2.0
            }
            Interpolation::ExpIn(exp) => exp.curve(exp.power * (a - 1.0)),
            Interpolation::ExpOut(exp) => 1.0 - exp.curve(-exp.power * a),
            Interpolation::Elastic(elastic) => {
                if a <= 0.5 {
                    return elastic.wave(ops, a * 2.0) / 2.0;
                }
                1.0 - elastic.wave(ops, (1.0 - a) * 2.0) / 2.0
            }
            Interpolation::ElasticIn(elastic) => {
                if a >= 0.99 {
                    return 1.0;
                }
                elastic.wave(ops, a)
            }
            Interpolation::ElasticOut(elastic) => {
                if a == 0.0 {
                    return 0.0;
                }
                1.0 - elastic.wave(ops, 1.0 - a)
            }
            Interpolation::Swing(scale) => {
                let scale = scale * 2.0;
                if a <= 0.5 {
                    let a = a * 2.0;
                    return a * a * ((scale + 1.0) * a - scale) / 2.0;
                }
                let a = (a - 1.0) * 2.0;
                a * a * ((scale + 1.0) * a + scale) / 2.0 + 1.0
            }
            Interpolation::SwingIn(scale) => a * a * ((scale + 1.0) * a - scale),
            Interpolation::SwingOut(scale) => {
                let a = a - 1.0;
                a * a * ((scale + 1.0) * a + scale) + 1.0
            }
            Interpolation::Bounce(table) => {
                if a <= 0.5 {
                    return (1.0 - table.out_ramped(1.0 - a * 2.0)) / 2.0;
                }
                table.out_ramped(a * 2.0 - 1.0) / 2.0 + 0.5
            }
            Interpolation::BounceIn(table) => 1.0 - table.out(1.0 - a),
            Interpolation::BounceOut(table) => table.out(a),
            Interpolation::Sine => (1.0 - ops.cos(a * PI)) / 2.0,
            Interpolation::SineIn => 1.0 - ops.cos(a * PI / 2.0),
            Interpolation::SineOut => ops.sin(a * PI / 2.0),
            Interpolation::Circle => {
                if a <= 0.5 {
                    let a = a * 2.0;
                    return (1.0 - (1.0 - a * a).sqrt()) / 2.0;
                }
                let a = (a - 1.0) * 2.0;
                ((1.0 - a * a).sqrt() + 1.0) / 2.0
            }
            Interpolation::CircleIn => 1.0 - (1.0 - a * a).sqrt(),
            Interpolation::CircleOut => {
                let a = a - 1.0;
                (1.0 - a * a).sqrt()
            }
        }
    }

    /// Interpolates from `start` to `end` with the shaped alpha
    pub fn apply_range(&self, start: f64, end: f64, a: f64) -> f64 {
        start + (end - start) * self.apply(a)
    }
}

//! Tolerance-aware comparisons.
//!
//! The free functions use a hybrid tolerance: relative to the larger
//! magnitude of the operands, but never smaller than [`EPSILON`]
//! itself. A non-finite operand is compared exactly. They suit
//! quantities that do not depend on where the input lies in the plane,
//! such as ratios, sines and lengths.
//!
//! Coordinates are compared with a [`Tolerance`] derived from the
//! extent of the figure they belong to, so that translating the input
//! does not change which points are told apart.
use crate::geometry::Point;

/// Base tolerance of the comparators.
pub const EPSILON: f64 = 1e-9;

#[inline]
fn tolerance(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale.is_finite() {
        EPSILON * scale.max(1.)
    } else {
        0.
    }
}

/// Absolute tolerance for the coordinates of a figure.
///
/// It is [`EPSILON`] times the larger side of the figure's bounding
/// box, or [`EPSILON`] itself for a figure reduced to a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tolerance(f64);

impl Tolerance {
    pub fn for_extent(extent: f64) -> Self {
        if extent.is_finite() && extent > 0. {
            Tolerance(EPSILON * extent)
        } else {
            Tolerance(EPSILON)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn eq(self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.0
    }

    #[inline]
    pub fn approx_eq(self, p: Point, q: Point) -> bool {
        self.eq(p.x, q.x) && self.eq(p.y, q.y)
    }
}

#[inline]
pub fn eq(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= tolerance(a, b)
}

/// Check if `value` is zero up to [`EPSILON`].
///
/// This is absolute: only use it on normalized quantities.
#[inline]
pub fn is_zero(value: f64) -> bool {
    value.abs() <= EPSILON
}

#[inline]
pub fn lt(a: f64, b: f64) -> bool {
    a < b - tolerance(a, b)
}

#[inline]
pub fn lt_eq(a: f64, b: f64) -> bool {
    a <= b + tolerance(a, b)
}

#[inline]
pub fn gt(a: f64, b: f64) -> bool {
    a > b + tolerance(a, b)
}

#[inline]
pub fn gt_eq(a: f64, b: f64) -> bool {
    a >= b - tolerance(a, b)
}

/// Strictly between `low` and `high`.
#[inline]
pub fn between(x: f64, low: f64, high: f64) -> bool {
    gt(x, low) && lt(x, high)
}

#[inline]
pub fn between_eq(x: f64, low: f64, high: f64) -> bool {
    gt_eq(x, low) && lt_eq(x, high)
}

mod arc_length;

pub use arc_length::{ArcLengthCurve, ArcLengthTable, DEFAULT_DIVISIONS};

use crate::math::{Point3, Vector3, TOLERANCE};

/// Parameter offset used for finite-difference tangent probes.
const TANGENT_DELTA: f64 = 0.001;

/// Trait for parametric curves in 3D space.
///
/// A curve maps a normalized parameter `t` in `[0, 1]` to a point. Equal
/// steps in `t` generally do not cover equal spatial distance; wrap a curve
/// in [`ArcLengthCurve`] to sample it at uniform arc-length spacing.
pub trait Curve {
    /// Evaluates the curve at parameter `t` in `[0, 1]`.
    ///
    /// Implementations must be pure and defined on the whole interval,
    /// including the exact boundaries 0 and 1.
    fn point(&self, t: f64) -> Point3;

    /// Returns whether the curve loops back onto its starting point.
    fn is_closed(&self) -> bool;

    /// Estimates the unit tangent at parameter `t` by central difference,
    /// degrading to a one-sided difference at the interval boundaries.
    ///
    /// `t` is clamped to `[0, 1]`. Returns the zero vector when the probe
    /// points coincide, which happens where the curve is stationary;
    /// callers should treat a near-zero result as "tangent undefined here".
    fn tangent(&self, t: f64) -> Vector3 {
        let t = t.clamp(0.0, 1.0);
        let before = (t - TANGENT_DELTA).max(0.0);
        let after = (t + TANGENT_DELTA).min(1.0);
        let delta = self.point(after) - self.point(before);
        delta.try_normalize(TOLERANCE).unwrap_or_else(Vector3::zeros)
    }
}

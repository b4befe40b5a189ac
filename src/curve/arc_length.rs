use crate::error::{CurvisError, Result};
use crate::frame::{self, FrenetFrame};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Curve;

/// Division count used when a caller does not request a specific resolution.
pub const DEFAULT_DIVISIONS: usize = 200;

/// Normalized parameter of sample `i` out of `divisions`.
#[allow(clippy::cast_precision_loss)]
fn param(i: usize, divisions: usize) -> f64 {
    i as f64 / divisions as f64
}

/// Cumulative arc-length table for a curve, sampled at uniform parameter
/// steps.
///
/// Entry `i` approximates the path length from `point(0)` to
/// `point(i / divisions)` by summing straight-line distances between
/// consecutive samples. The first entry is always 0 and the sequence is
/// non-decreasing; consecutive entries are equal only across stationary
/// stretches of the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable {
    lengths: Vec<f64>,
}

impl ArcLengthTable {
    /// Samples `curve` into a table of `divisions + 1` cumulative lengths.
    ///
    /// # Errors
    ///
    /// Returns an error if `divisions` is zero.
    pub fn new<C: Curve + ?Sized>(curve: &C, divisions: usize) -> Result<Self> {
        if divisions == 0 {
            return Err(CurvisError::ResolutionTooLow {
                parameter: "divisions",
                value: divisions,
            });
        }
        Ok(Self::build(curve, divisions))
    }

    /// Builds without validating; `divisions` must be at least 1.
    pub(crate) fn build<C: Curve + ?Sized>(curve: &C, divisions: usize) -> Self {
        let mut lengths = Vec::with_capacity(divisions + 1);
        lengths.push(0.0);

        let mut previous = curve.point(0.0);
        let mut sum = 0.0;
        for i in 1..=divisions {
            let current = curve.point(param(i, divisions));
            sum += (current - previous).norm();
            lengths.push(sum);
            previous = current;
        }

        Self { lengths }
    }

    /// Returns the cumulative lengths, starting at 0.
    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Returns the division count the table was sampled with.
    #[must_use]
    pub fn divisions(&self) -> usize {
        self.lengths.len() - 1
    }

    /// Returns the approximated total arc length.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.lengths[self.lengths.len() - 1]
    }

    /// Maps a fraction `u` of the total arc length to the curve parameter
    /// `t` whose cumulative length equals `u * total_length()`.
    ///
    /// `u` is clamped to `[0, 1]` and the boundaries map exactly to 0
    /// and 1. A curve of zero total length has no arc-length structure to
    /// invert, so the mapping degrades to the identity there instead of
    /// producing a division by zero.
    #[must_use]
    pub fn u_to_t(&self, u: f64) -> f64 {
        if u <= 0.0 {
            return 0.0;
        }
        if u >= 1.0 {
            return 1.0;
        }

        let total = self.total_length();
        if total <= 0.0 {
            return u;
        }

        let target = u * total;
        let last = self.divisions();

        // Largest index whose entry does not exceed the target. The clamp
        // covers the rounding edge where `u * total` lands on the final
        // entry, keeping `i + 1` in bounds.
        let i = self
            .lengths
            .partition_point(|&length| length <= target)
            .saturating_sub(1)
            .min(last - 1);

        let before = self.lengths[i];
        if (before - target).abs() < TOLERANCE {
            return param(i, last);
        }

        // Zero-length segments only occur where the curve is stationary;
        // the floor sample is as good an answer as any point inside one.
        let segment = self.lengths[i + 1] - before;
        if segment <= 0.0 {
            return param(i, last);
        }

        let fraction = (target - before) / segment;
        #[allow(clippy::cast_precision_loss)]
        let t = (i as f64 + fraction) / (last as f64);
        t
    }
}

/// A curve paired with a cached [`ArcLengthTable`], exposing queries in
/// arc-length space.
///
/// Building a table samples the curve once per division, so it is kept
/// between queries and rebuilt only when the cache is stale or a caller
/// asks for a different resolution. Queries that may rebuild the table
/// take `&mut self`; to share a table across readers, build an
/// [`ArcLengthTable`] directly instead.
#[derive(Debug, Clone)]
pub struct ArcLengthCurve<C> {
    curve: C,
    table: Option<ArcLengthTable>,
    dirty: bool,
}

impl<C: Curve> ArcLengthCurve<C> {
    /// Wraps a curve. The table is built lazily on the first query that
    /// needs it.
    #[must_use]
    pub fn new(curve: C) -> Self {
        Self {
            curve,
            table: None,
            dirty: false,
        }
    }

    /// Returns the wrapped curve.
    #[must_use]
    pub fn curve(&self) -> &C {
        &self.curve
    }

    /// Returns the wrapped curve mutably, marking the cached table stale:
    /// any change to the curve's control data invalidates previously
    /// computed lengths.
    pub fn curve_mut(&mut self) -> &mut C {
        self.dirty = true;
        &mut self.curve
    }

    /// Consumes the wrapper, returning the curve.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.curve
    }

    /// Marks the cached table stale; the next query rebuilds it.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the arc-length table at the requested resolution, rebuilding
    /// it only if no fresh table of exactly that resolution is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if `divisions` is zero.
    pub fn lengths(&mut self, divisions: usize) -> Result<&ArcLengthTable> {
        if divisions == 0 {
            return Err(CurvisError::ResolutionTooLow {
                parameter: "divisions",
                value: divisions,
            });
        }
        Ok(self.table_for(divisions))
    }

    /// Returns the approximated total arc length.
    pub fn length(&mut self) -> f64 {
        self.table().total_length()
    }

    /// Maps a fraction `u` of the total arc length to the curve parameter
    /// `t`. See [`ArcLengthTable::u_to_t`].
    pub fn u_to_t(&mut self, u: f64) -> f64 {
        self.table().u_to_t(u)
    }

    /// Evaluates the curve at a fraction `u` of its total arc length,
    /// clamped to `[0, 1]`.
    pub fn point_at(&mut self, u: f64) -> Point3 {
        let t = self.u_to_t(u);
        self.curve.point(t)
    }

    /// Estimates the unit tangent at a fraction `u` of the total arc
    /// length, clamped to `[0, 1]`. Returns the zero vector where the
    /// curve is stationary; see [`Curve::tangent`].
    pub fn tangent_at(&mut self, u: f64) -> Vector3 {
        let t = self.u_to_t(u);
        self.curve.tangent(t)
    }

    /// Samples `count + 1` points at uniform parameter spacing. The
    /// spacing is uniform in `t`, not in travelled distance.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero.
    pub fn points(&self, count: usize) -> Result<Vec<Point3>> {
        if count == 0 {
            return Err(CurvisError::ResolutionTooLow {
                parameter: "count",
                value: count,
            });
        }
        Ok((0..=count)
            .map(|i| self.curve.point(param(i, count)))
            .collect())
    }

    /// Samples `count + 1` points at uniform arc-length spacing, so
    /// consecutive points are (approximately) equidistant along the curve.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero.
    pub fn spaced_points(&mut self, count: usize) -> Result<Vec<Point3>> {
        if count == 0 {
            return Err(CurvisError::ResolutionTooLow {
                parameter: "count",
                value: count,
            });
        }
        let table = self.table();
        let ts: Vec<f64> = (0..=count).map(|i| table.u_to_t(param(i, count))).collect();
        Ok(ts.into_iter().map(|t| self.curve.point(t)).collect())
    }

    /// Computes `segments + 1` moving frames at uniform arc-length
    /// spacing, with the seam correction applied when the wrapped curve
    /// reports itself closed. See [`frame::frenet_frames`].
    ///
    /// # Errors
    ///
    /// Returns an error if `segments` is zero.
    pub fn frenet_frames(&mut self, segments: usize) -> Result<Vec<FrenetFrame>> {
        if segments == 0 {
            return Err(CurvisError::ResolutionTooLow {
                parameter: "segments",
                value: segments,
            });
        }
        let table = self.table();
        let ts: Vec<f64> = (0..=segments)
            .map(|i| table.u_to_t(param(i, segments)))
            .collect();
        let tangents: Vec<Vector3> = ts.into_iter().map(|t| self.curve.tangent(t)).collect();
        Ok(frame::frenet_frames(&tangents, self.curve.is_closed()))
    }

    /// Cached table at whatever resolution was last built, or a fresh one
    /// at [`DEFAULT_DIVISIONS`] when none is usable.
    fn table(&mut self) -> &ArcLengthTable {
        if self.dirty {
            self.table = None;
            self.dirty = false;
        }
        self.table
            .get_or_insert_with(|| ArcLengthTable::build(&self.curve, DEFAULT_DIVISIONS))
    }

    /// Cached table rebuilt to exactly `divisions` entries when needed.
    fn table_for(&mut self, divisions: usize) -> &ArcLengthTable {
        let stale = self.dirty
            || self
                .table
                .as_ref()
                .is_none_or(|table| table.divisions() != divisions);
        if stale {
            self.table = None;
            self.dirty = false;
        }
        self.table
            .get_or_insert_with(|| ArcLengthTable::build(&self.curve, divisions))
    }
}

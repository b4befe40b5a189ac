use nalgebra::{Rotation3, Unit};

use crate::math::{Vector3, TOLERANCE};

/// An orthonormal basis describing a curve's local orientation at one
/// sample.
///
/// A sequence of frames is a snapshot of the curve at the moment it was
/// sampled; it holds no reference back to the curve. Frames produced by
/// [`frenet_frames`] rotate as little as possible between consecutive
/// samples, which keeps geometry swept along them from twisting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrenetFrame {
    /// Unit tangent, the direction of travel.
    pub tangent: Vector3,
    /// Unit normal, perpendicular to the tangent.
    pub normal: Vector3,
    /// Unit binormal, `tangent x normal`.
    pub binormal: Vector3,
}

impl FrenetFrame {
    /// Creates a frame from its three axes. The axes are taken as given;
    /// use [`is_orthonormal`](Self::is_orthonormal) to vet a frame from an
    /// untrusted source.
    #[must_use]
    pub fn new(tangent: Vector3, normal: Vector3, binormal: Vector3) -> Self {
        Self {
            tangent,
            normal,
            binormal,
        }
    }

    /// Checks that all three axes have unit length and are mutually
    /// perpendicular within `tolerance`.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (self.tangent.norm() - 1.0).abs() < tolerance
            && (self.normal.norm() - 1.0).abs() < tolerance
            && (self.binormal.norm() - 1.0).abs() < tolerance
            && self.tangent.dot(&self.normal).abs() < tolerance
            && self.tangent.dot(&self.binormal).abs() < tolerance
            && self.normal.dot(&self.binormal).abs() < tolerance
    }

    /// Returns the rotation taking the world x, y and z axes to the
    /// tangent, normal and binormal. Only meaningful for an orthonormal
    /// frame.
    #[must_use]
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_basis_unchecked(&[self.tangent, self.normal, self.binormal])
    }
}

/// Picks the starting normal for a frame sequence.
///
/// The world axis with the smallest component along `tangent` is chosen
/// as a reference and its tangential part is projected away with two
/// cross products. Ties run in x, y, z order with later axes winning, so
/// a fully symmetric tangent selects z. A zero tangent yields a zero
/// normal.
#[must_use]
pub fn initial_normal(tangent: &Vector3) -> Vector3 {
    let tx = tangent.x.abs();
    let ty = tangent.y.abs();
    let tz = tangent.z.abs();

    let mut min = tx;
    let mut axis = Vector3::x();
    if ty <= min {
        min = ty;
        axis = Vector3::y();
    }
    if tz <= min {
        axis = Vector3::z();
    }

    let reference = tangent
        .cross(&axis)
        .try_normalize(TOLERANCE)
        .unwrap_or_else(Vector3::zeros);
    tangent.cross(&reference)
}

/// Carries a normal from one sample to the next with the smallest
/// rotation that maps `prev_tangent` onto `tangent`.
///
/// Both tangents are expected to be unit length. When they are parallel
/// or opposite the rotation axis vanishes and the previous normal is
/// returned unchanged.
#[must_use]
pub fn propagate_normal(prev_tangent: &Vector3, tangent: &Vector3, normal: &Vector3) -> Vector3 {
    let axis = match Unit::try_new(prev_tangent.cross(tangent), f64::EPSILON) {
        Some(axis) => axis,
        None => return *normal,
    };
    let angle = prev_tangent.dot(tangent).clamp(-1.0, 1.0).acos();
    Rotation3::from_axis_angle(&axis, angle) * normal
}

/// Builds one frame per tangent sample, rotating each frame as little as
/// possible relative to its predecessor. With `closed`, the angular
/// mismatch between the first and last normals is spread evenly over the
/// sequence so the seam frames coincide.
///
/// Tangents are renormalized on entry. A zero tangent marks a stationary
/// sample: its frame axes come out zero instead of NaN, and propagation
/// carries the previous normal across it unchanged.
#[must_use]
pub fn frenet_frames(tangents: &[Vector3], closed: bool) -> Vec<FrenetFrame> {
    if tangents.is_empty() {
        return Vec::new();
    }

    let tangents: Vec<Vector3> = tangents
        .iter()
        .map(|tangent| {
            tangent
                .try_normalize(TOLERANCE)
                .unwrap_or_else(Vector3::zeros)
        })
        .collect();
    let segments = tangents.len() - 1;

    let mut normals = Vec::with_capacity(tangents.len());
    let mut binormals = Vec::with_capacity(tangents.len());
    normals.push(initial_normal(&tangents[0]));
    binormals.push(tangents[0].cross(&normals[0]));

    for i in 1..=segments {
        let normal = propagate_normal(&tangents[i - 1], &tangents[i], &normals[i - 1]);
        binormals.push(
            tangents[i]
                .cross(&normal)
                .try_normalize(TOLERANCE)
                .unwrap_or_else(Vector3::zeros),
        );
        normals.push(normal);
    }

    if closed && segments >= 1 {
        correct_seam(&tangents, &mut normals, &mut binormals);
    }

    tangents
        .into_iter()
        .zip(normals)
        .zip(binormals)
        .map(|((tangent, normal), binormal)| FrenetFrame {
            tangent,
            normal,
            binormal,
        })
        .collect()
}

/// Spreads the angular mismatch between the first and last normals evenly
/// across the sequence, rotating each normal about its own tangent.
fn correct_seam(tangents: &[Vector3], normals: &mut [Vector3], binormals: &mut [Vector3]) {
    let segments = tangents.len() - 1;

    #[allow(clippy::cast_precision_loss)]
    let mut theta =
        normals[0].dot(&normals[segments]).clamp(-1.0, 1.0).acos() / segments as f64;
    if tangents[0].dot(&normals[0].cross(&normals[segments])) > 0.0 {
        theta = -theta;
    }

    for i in 1..=segments {
        if let Some(axis) = Unit::try_new(tangents[i], TOLERANCE) {
            #[allow(clippy::cast_precision_loss)]
            let rotation = Rotation3::from_axis_angle(&axis, theta * i as f64);
            normals[i] = rotation * normals[i];
            binormals[i] = tangents[i].cross(&normals[i]);
        }
    }
}

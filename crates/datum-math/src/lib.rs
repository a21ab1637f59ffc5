#![warn(missing_docs)]

//! Math types for the datum positioning engine.
//!
//! Thin wrappers around nalgebra providing the domain vocabulary for
//! spatial reference resolution: resolved references ([`SpatialRef`]),
//! local coordinate frames ([`Frame`]), arbitrary-axis rotation, and
//! tolerance constants.

use nalgebra::{Unit, Vector3};
use thiserror::Error;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Length below which a vector is considered degenerate.
pub const DEGENERATE_EPS: f64 = 1e-10;

/// `|n · helper|` above this means the helper is unusable for frame
/// construction and the alternate helper is picked instead.
const HELPER_PARALLEL_LIMIT: f64 = 0.99;

/// Errors from frame construction on degenerate input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameError {
    /// Normal vector has (near-)zero length.
    #[error("degenerate normal: length {0:.3e}")]
    ZeroNormal(f64),

    /// Tangent vector has (near-)zero length.
    #[error("degenerate tangent: length {0:.3e}")]
    ZeroTangent(f64),

    /// Tangent is parallel to the normal, no in-plane direction remains.
    #[error("tangent is parallel to normal, cannot build a frame")]
    TangentParallel,
}

/// The kind of geometric feature a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// A bare location with no orientation.
    Point,
    /// A face: location plus outward normal.
    Face,
    /// An edge: location plus tangent direction.
    Edge,
    /// An axis: origin point plus direction.
    Axis,
}

impl RefKind {
    /// Lowercase name, matching the wire-format `type` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Point => "point",
            RefKind::Face => "face",
            RefKind::Edge => "edge",
            RefKind::Axis => "axis",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved output of any reference specification.
///
/// Invariant: `orientation` and `tangent` are unit vectors, and mutually
/// orthogonal when both are present.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialRef {
    /// Resolved position, always present.
    pub position: Point3,
    /// Primary direction: a face normal or an axis/edge direction.
    pub orientation: Option<Vec3>,
    /// Secondary in-plane direction, for faces that carry one.
    ///
    /// None of the built-in constructors or backends populate this; it is
    /// for callers whose kernel can supply an in-plane direction alongside
    /// a face normal. When present it pins the frame's X axis, which
    /// derived offsets otherwise take from the fixed helper convention.
    pub tangent: Option<Vec3>,
    /// What kind of feature this reference resolved from.
    pub kind: RefKind,
}

impl SpatialRef {
    /// A plain point with no orientation.
    pub fn point(position: Point3) -> Self {
        Self {
            position,
            orientation: None,
            tangent: None,
            kind: RefKind::Point,
        }
    }

    /// A face reference: center plus outward normal.
    pub fn face(position: Point3, normal: Vec3) -> Self {
        Self {
            position,
            orientation: Some(normal),
            tangent: None,
            kind: RefKind::Face,
        }
    }

    /// An edge reference: point on the edge plus tangent direction.
    pub fn edge(position: Point3, tangent: Vec3) -> Self {
        Self {
            position,
            orientation: Some(tangent),
            tangent: None,
            kind: RefKind::Edge,
        }
    }

    /// An axis reference: origin point plus direction.
    pub fn axis(position: Point3, direction: Vec3) -> Self {
        Self {
            position,
            orientation: Some(direction),
            tangent: None,
            kind: RefKind::Axis,
        }
    }

    /// The primary direction of this reference, if it has one.
    ///
    /// Face normal, edge tangent, or axis direction; `None` for points.
    pub fn direction(&self) -> Option<Vec3> {
        self.orientation
    }

    /// The local frame of this reference.
    ///
    /// Oriented references get a frame built from their orientation (and
    /// tangent, when present); a pure point implies the world frame at its
    /// position.
    pub fn frame(&self) -> Result<Frame, FrameError> {
        match (self.orientation, self.tangent) {
            (Some(n), Some(t)) => Frame::from_normal_tangent(self.position, n, t),
            (Some(n), None) => Frame::from_normal(self.position, n),
            (None, _) => Ok(Frame::world(self.position)),
        }
    }
}

/// A local coordinate system: an origin plus a right-handed orthonormal
/// basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame origin in world space.
    pub origin: Point3,
    /// Local X direction (unit).
    pub x_axis: Vec3,
    /// Local Y direction (unit).
    pub y_axis: Vec3,
    /// Local Z direction (unit).
    pub z_axis: Vec3,
}

impl Frame {
    /// The world frame translated to `origin`.
    pub fn world(origin: Point3) -> Self {
        Self {
            origin,
            x_axis: Vec3::x(),
            y_axis: Vec3::y(),
            z_axis: Vec3::z(),
        }
    }

    /// Build a frame from a surface normal alone.
    ///
    /// `z_axis` is the normalized normal. The in-plane axes are derived
    /// deterministically from a fixed helper vector (world Z, falling back
    /// to world X when the normal is parallel to it), so a top face gets a
    /// tangent basis aligned with world X/Y.
    pub fn from_normal(origin: Point3, normal: Vec3) -> Result<Self, FrameError> {
        let len = normal.norm();
        if len < DEGENERATE_EPS {
            return Err(FrameError::ZeroNormal(len));
        }
        let z = normal / len;
        let helper = if z.dot(&Vec3::z()).abs() > HELPER_PARALLEL_LIMIT {
            Vec3::x()
        } else {
            Vec3::z()
        };
        Self::from_normal_tangent(origin, normal, helper)
    }

    /// Build a frame from a normal and an in-plane tangent.
    ///
    /// The tangent is orthonormalized against the normal (Gram-Schmidt)
    /// before use: `z_axis` = normal, `x_axis` = projected tangent,
    /// `y_axis` = z × x.
    pub fn from_normal_tangent(
        origin: Point3,
        normal: Vec3,
        tangent: Vec3,
    ) -> Result<Self, FrameError> {
        let n_len = normal.norm();
        if n_len < DEGENERATE_EPS {
            return Err(FrameError::ZeroNormal(n_len));
        }
        let t_len = tangent.norm();
        if t_len < DEGENERATE_EPS {
            return Err(FrameError::ZeroTangent(t_len));
        }
        let z = normal / n_len;
        let t = tangent / t_len;
        let projected = t - z * t.dot(&z);
        let p_len = projected.norm();
        if p_len < DEGENERATE_EPS {
            return Err(FrameError::TangentParallel);
        }
        let x = projected / p_len;
        let y = z.cross(&x);
        Ok(Self {
            origin,
            x_axis: x,
            y_axis: y,
            z_axis: z,
        })
    }

    /// Map a local offset into world space: `origin + x·X + y·Y + z·Z`.
    pub fn apply_local_offset(&self, offset: Vec3) -> Point3 {
        self.origin + self.x_axis * offset.x + self.y_axis * offset.y + self.z_axis * offset.z
    }
}

/// Rotate a vector about a unit axis by `angle` radians.
///
/// Rodrigues' formula: `v' = v cosθ + (k × v) sinθ + k (k·v)(1 − cosθ)`.
pub fn rotate_vec_about_axis(v: &Vec3, axis: &Dir3, angle: f64) -> Vec3 {
    let k = axis.as_ref();
    let (s, c) = angle.sin_cos();
    v * c + k.cross(v) * s + k * k.dot(v) * (1.0 - c)
}

/// Rotate a point about an axis through `origin` by `angle` radians.
pub fn rotate_point_about_axis(p: &Point3, origin: &Point3, axis: &Dir3, angle: f64) -> Point3 {
    origin + rotate_vec_about_axis(&(p - origin), axis, angle)
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two vectors are equal within linear tolerance.
    pub fn vecs_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn world_frame_identity_offset() {
        let f = Frame::world(Point3::new(1.0, 2.0, 3.0));
        let p = f.apply_local_offset(Vec3::new(10.0, 20.0, 30.0));
        assert_relative_eq!(p, Point3::new(11.0, 22.0, 33.0), epsilon = 1e-12);
    }

    #[test]
    fn frame_from_top_normal_aligns_with_world_xy() {
        let f = Frame::from_normal(Point3::origin(), Vec3::z()).unwrap();
        assert_relative_eq!(f.x_axis, Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(f.y_axis, Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.z_axis, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn frame_is_right_handed_for_arbitrary_normal() {
        let n = Vec3::new(0.3, -0.7, 0.2);
        let f = Frame::from_normal(Point3::origin(), n).unwrap();
        assert_relative_eq!(f.x_axis.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.y_axis.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.x_axis.dot(&f.z_axis), 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.x_axis.cross(&f.y_axis), f.z_axis, epsilon = 1e-12);
    }

    #[test]
    fn frame_from_side_normal_is_not_world_aligned() {
        // A +X face's local X must not be world X, otherwise local offsets
        // would silently behave like world offsets.
        let f = Frame::from_normal(Point3::origin(), Vec3::x()).unwrap();
        assert!((f.x_axis - Vec3::x()).norm() > 0.5);
        assert_relative_eq!(f.z_axis, Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn frame_from_normal_tangent_orthonormalizes() {
        // Tangent with a component along the normal gets projected out.
        let f = Frame::from_normal_tangent(
            Point3::origin(),
            Vec3::z(),
            Vec3::new(1.0, 0.0, 0.5),
        )
        .unwrap();
        assert_relative_eq!(f.x_axis, Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(f.y_axis, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn zero_normal_is_degenerate() {
        let err = Frame::from_normal(Point3::origin(), Vec3::zeros()).unwrap_err();
        assert!(matches!(err, FrameError::ZeroNormal(_)));
    }

    #[test]
    fn parallel_tangent_is_degenerate() {
        let err =
            Frame::from_normal_tangent(Point3::origin(), Vec3::z(), Vec3::z() * 2.0).unwrap_err();
        assert_eq!(err, FrameError::TangentParallel);
    }

    #[test]
    fn rodrigues_quarter_turn_about_z() {
        let axis = Dir3::new_normalize(Vec3::z());
        let p = rotate_point_about_axis(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::origin(),
            &axis,
            PI / 2.0,
        );
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rodrigues_about_offset_origin() {
        let axis = Dir3::new_normalize(Vec3::z());
        let p = rotate_point_about_axis(
            &Point3::new(2.0, 1.0, 5.0),
            &Point3::new(1.0, 1.0, 0.0),
            &axis,
            PI,
        );
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn rodrigues_diagonal_axis_half_turn() {
        let axis = Dir3::new_normalize(Vec3::new(1.0, 1.0, 0.0));
        let v = rotate_vec_about_axis(&Vec3::x(), &axis, PI);
        assert_relative_eq!(v, Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn spatial_ref_tangent_pins_the_frame_x_axis() {
        // A face ref built from a normal alone gets the helper-derived
        // basis; supplying a tangent overrides it.
        let mut r = SpatialRef::face(Point3::origin(), Vec3::z());
        assert_relative_eq!(r.frame().unwrap().x_axis, Vec3::x(), epsilon = 1e-12);

        r.tangent = Some(Vec3::y());
        let f = r.frame().unwrap();
        assert_relative_eq!(f.x_axis, Vec3::y(), epsilon = 1e-12);
        assert_relative_eq!(f.y_axis, -Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(f.z_axis, Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn spatial_ref_point_frame_is_world() {
        let r = SpatialRef::point(Point3::new(1.0, 2.0, 3.0));
        let f = r.frame().unwrap();
        assert_relative_eq!(f.x_axis, Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(f.origin, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(tol.points_equal(&a, &Point3::new(1.0 + 1e-7, 2.0, 3.0)));
        assert!(!tol.points_equal(&a, &Point3::new(1.001, 2.0, 3.0)));
    }
}

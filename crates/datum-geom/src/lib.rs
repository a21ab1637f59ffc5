#![warn(missing_docs)]

//! Geometry capability interface for the datum positioning engine.
//!
//! The resolver and transform tracker never touch solid geometry directly;
//! everything goes through the [`GeometryBackend`] trait, which a full
//! B-rep kernel implements in production. This crate also ships the
//! [`analytic`] backend — exact closed-form geometry for the four primitive
//! solids — which is enough for positioning logic and fast tests without a
//! kernel dependency.
//!
//! Selector strings are opaque at this interface: the engine passes them
//! through uninterpreted, and each backend defines its own syntax.

use datum_math::{Dir3, Point3, Vec3};

pub mod analytic;

pub use analytic::{AnalyticBackend, PrimitiveSolid};

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Centroid of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }

    /// Full extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Capability set the engine needs from a solid-modeling kernel.
///
/// Implementations select features by selector string, answer spatial
/// queries on the selected features, and apply rigid transforms plus
/// scaling to solids. Transform methods return a new solid; the engine
/// owns all part state.
pub trait GeometryBackend {
    /// A solid body.
    type Solid: Clone + std::fmt::Debug;
    /// A face selected from a solid.
    type Face;
    /// An edge selected from a solid.
    type Edge;

    /// All faces of `solid` matching `selector`.
    fn select_faces(&self, solid: &Self::Solid, selector: &str) -> Vec<Self::Face>;

    /// All edges of `solid` matching `selector`.
    fn select_edges(&self, solid: &Self::Solid, selector: &str) -> Vec<Self::Edge>;

    /// Center point of a face.
    fn face_center(&self, face: &Self::Face) -> Point3;

    /// Outward unit normal of a face.
    fn face_normal(&self, face: &Self::Face) -> Vec3;

    /// Point on an edge at curve parameter `t` in `[0, 1]`.
    fn edge_point(&self, edge: &Self::Edge, t: f64) -> Point3;

    /// Unit tangent of an edge at curve parameter `t`.
    fn edge_tangent(&self, edge: &Self::Edge, t: f64) -> Vec3;

    /// World-aligned bounding box of a solid.
    fn bounding_box(&self, solid: &Self::Solid) -> BoundingBox;

    /// Translate a solid by `offset`.
    fn translate(&self, solid: &Self::Solid, offset: Vec3) -> Self::Solid;

    /// Rotate a solid about the axis through `origin` along `axis` by
    /// `angle` radians.
    fn rotate(&self, solid: &Self::Solid, origin: Point3, axis: Dir3, angle: f64) -> Self::Solid;

    /// Scale a solid about its own center. Factors are interpreted in the
    /// solid's local frame.
    fn scale(&self, solid: &Self::Solid, factors: Vec3) -> Self::Solid;
}

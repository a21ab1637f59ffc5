#![warn(missing_docs)]

//! datum — declarative part positioning.
//!
//! Parts are placed by *references* rather than hand-computed coordinates:
//! a reference names a point, face, edge, or axis of the scene
//! (`"bracket.face_top"`, an inline selector, an offset from another
//! reference), and transform sequences move parts relative to whatever
//! those references resolve to at that moment.
//!
//! # Example
//!
//! ```rust
//! use datum::{Assembly, PrimitiveSolid, RefSpec};
//!
//! let mut asm = Assembly::analytic();
//! asm.add_part("base", PrimitiveSolid::cuboid(40.0, 40.0, 10.0));
//! asm.add_part("post", PrimitiveSolid::cylinder(5.0, 30.0));
//!
//! // Seat the post on top of the base.
//! let ops: Vec<datum::TransformOp> = serde_json::from_str(
//!     r#"[{"type": "translate", "to": "base.face_top", "offset": [0, 0, 15]}]"#,
//! ).unwrap();
//! asm.apply("post", &ops).unwrap();
//!
//! let top = asm.resolve(&RefSpec::named("post.face_top")).unwrap();
//! assert_eq!(top.position.z, 35.0);
//! ```

use datum_geom::GeometryBackend;

pub mod scene;

pub use datum_geom::{AnalyticBackend, BoundingBox, PrimitiveSolid};
pub use datum_ir::{
    AxisSpec, InlineSpec, OriginSpec, RefLocation, RefSpec, ScaleSpec, TransformOp,
};
pub use datum_math::{Frame, Point3, RefKind, SpatialRef, Tolerance, Vec3};
pub use datum_resolve::{
    anchor_names, AppliedTransform, Part, PartKey, PartRegistry, ReferenceTable, ResolveError,
    Resolver,
};
pub use datum_transform::{history_summary, TransformError, TransformTracker};

use thiserror::Error;

/// Any error the assembly surface can return.
#[derive(Debug, Error)]
pub enum Error {
    /// A reference failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A transform op failed to apply.
    #[error(transparent)]
    Transform(#[from] TransformError),
    /// A scene document failed to parse.
    #[error("invalid scene document: {0}")]
    Scene(#[from] serde_json::Error),
}

/// A scene: geometry backend, parts, and named references.
///
/// Thin stateful wrapper wiring [`Resolver`] and [`TransformTracker`]
/// together so callers don't thread registries and tables by hand.
pub struct Assembly<B: GeometryBackend> {
    backend: B,
    parts: PartRegistry<B::Solid>,
    references: ReferenceTable,
}

impl Assembly<AnalyticBackend> {
    /// An assembly over the built-in analytic primitive backend.
    pub fn analytic() -> Self {
        Self::new(AnalyticBackend::new())
    }
}

impl<B: GeometryBackend> Assembly<B> {
    /// Create an empty assembly over a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            parts: PartRegistry::new(),
            references: ReferenceTable::new(),
        }
    }

    /// Add a part at the world origin, replacing any same-named part.
    pub fn add_part(&mut self, name: impl Into<String>, solid: B::Solid) -> PartKey {
        self.parts.insert(Part::new(name, solid))
    }

    /// Add a part at an explicit position. The solid is translated there
    /// from wherever the backend created it relative to the origin.
    pub fn add_part_at(
        &mut self,
        name: impl Into<String>,
        solid: B::Solid,
        position: Point3,
    ) -> PartKey {
        let placed = self
            .backend
            .translate(&solid, position - Point3::origin());
        self.parts.insert(Part::with_position(name, placed, position))
    }

    /// Register a named reference. Anchors of an existing part shadow a
    /// registered name of the same `part.anchor` form.
    pub fn define_reference(&mut self, name: impl Into<String>, spec: RefSpec) {
        self.references.insert(name, spec);
    }

    /// Resolve any reference spec against the current scene state.
    pub fn resolve(&self, spec: &RefSpec) -> Result<SpatialRef, Error> {
        let resolver = Resolver::new(&self.backend, &self.parts, &self.references);
        Ok(resolver.resolve(spec)?)
    }

    /// Resolve a name (registered reference or `part.anchor`).
    pub fn resolve_name(&self, name: &str) -> Result<SpatialRef, Error> {
        self.resolve(&RefSpec::named(name))
    }

    /// Apply a transform sequence to a part, in order.
    pub fn apply(&mut self, part: &str, ops: &[TransformOp]) -> Result<(), Error> {
        let tracker = TransformTracker::new(&self.backend, &self.references);
        tracker.apply(&mut self.parts, part, ops)?;
        Ok(())
    }

    /// Look up a part by name.
    pub fn part(&self, name: &str) -> Option<&Part<B::Solid>> {
        self.parts.get(name)
    }

    /// All part names, sorted.
    pub fn part_names(&self) -> Vec<String> {
        self.parts.names()
    }

    /// The backend this assembly was built over.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Human-readable transform history of a part.
    pub fn history(&self, part: &str) -> Option<String> {
        self.parts.get(part).map(history_summary)
    }
}

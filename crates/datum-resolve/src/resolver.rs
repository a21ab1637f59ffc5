//! The unified reference resolver.

use crate::anchors::{self, anchor_names};
use crate::{Part, PartRegistry, ResolveError};
use datum_geom::GeometryBackend;
use datum_ir::{InlineSpec, RefSpec};
use datum_math::{Point3, SpatialRef, Vec3, DEGENERATE_EPS};
use std::cell::RefCell;
use std::collections::HashMap;

/// Named reference specifications for one document.
///
/// Keys are unique; insertion order is irrelevant. Built once per
/// resolution pass.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, RefSpec>,
}

impl ReferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named reference, replacing any previous spec of the same
    /// name.
    pub fn insert(&mut self, name: impl Into<String>, spec: RefSpec) {
        self.entries.insert(name.into(), spec);
    }

    /// Look up a spec by name.
    pub fn get(&self, name: &str) -> Option<&RefSpec> {
        self.entries.get(name)
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registered names, sorted for stable error messages.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Resolves reference specifications to [`SpatialRef`] values.
///
/// One resolver serves one resolution pass: named lookups are memoized in
/// a cache that must not outlive the part state it was computed from, so
/// callers create a fresh resolver (or call [`Resolver::clear_cache`])
/// after any part moves.
pub struct Resolver<'a, B: GeometryBackend> {
    backend: &'a B,
    parts: &'a PartRegistry<B::Solid>,
    references: &'a ReferenceTable,
    cache: RefCell<HashMap<String, SpatialRef>>,
}

impl<'a, B: GeometryBackend> Resolver<'a, B> {
    /// Create a resolver over one backend, part set, and reference table.
    pub fn new(
        backend: &'a B,
        parts: &'a PartRegistry<B::Solid>,
        references: &'a ReferenceTable,
    ) -> Self {
        Self {
            backend,
            parts,
            references,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve any reference spec.
    ///
    /// Deterministic: identical part state and spec always yield the same
    /// result.
    pub fn resolve(&self, spec: &RefSpec) -> Result<SpatialRef, ResolveError> {
        let mut visited = Vec::new();
        self.resolve_with_chain(spec, &mut visited)
    }

    /// Drop all memoized named lookups. Required after part state changes.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    fn resolve_with_chain(
        &self,
        spec: &RefSpec,
        visited: &mut Vec<String>,
    ) -> Result<SpatialRef, ResolveError> {
        match spec {
            RefSpec::Literal(v) => Ok(SpatialRef::point(Point3::new(v[0], v[1], v[2]))),
            RefSpec::Named(name) => self.resolve_name(name, visited),
            RefSpec::Inline(inline) => self.resolve_inline(inline, visited),
            RefSpec::Derived { from, offset } => {
                let base = self.resolve_with_chain(from, visited)?;
                let frame = base.frame()?;
                let position =
                    frame.apply_local_offset(Vec3::new(offset[0], offset[1], offset[2]));
                // The derived reference keeps its base's orientation and
                // kind; only the position moves.
                Ok(SpatialRef {
                    position,
                    orientation: base.orientation,
                    tangent: base.tangent,
                    kind: base.kind,
                })
            }
        }
    }

    fn resolve_name(
        &self,
        name: &str,
        visited: &mut Vec<String>,
    ) -> Result<SpatialRef, ResolveError> {
        if let Some(cached) = self.cache.borrow().get(name) {
            return Ok(cached.clone());
        }
        if let Some(pos) = visited.iter().position(|n| n == name) {
            let mut chain = visited[pos..].to_vec();
            chain.push(name.to_string());
            return Err(ResolveError::CyclicReference { chain });
        }

        visited.push(name.to_string());
        let result = self.resolve_name_fresh(name, visited);
        visited.pop();

        let resolved = result?;
        self.cache
            .borrow_mut()
            .insert(name.to_string(), resolved.clone());
        Ok(resolved)
    }

    fn resolve_name_fresh(
        &self,
        name: &str,
        visited: &mut Vec<String>,
    ) -> Result<SpatialRef, ResolveError> {
        // Dot notation is anchor dispatch; part anchors take precedence
        // over registered names.
        if let Some((part_name, anchor)) = name.split_once('.') {
            if let Some(part) = self.parts.get(part_name) {
                return self.resolve_anchor(part, anchor);
            }
            if let Some(spec) = self.references.get(name) {
                return self.resolve_with_chain(spec, visited);
            }
            return Err(ResolveError::MissingPart {
                part: part_name.to_string(),
                known: self.parts.names(),
            });
        }

        if let Some(spec) = self.references.get(name) {
            return self.resolve_with_chain(spec, visited);
        }

        Err(ResolveError::UnresolvedName {
            name: name.to_string(),
            known: self.references.names(),
        })
    }

    /// Auto-generated part-local anchors: `center`, `origin`, the six
    /// canonical faces, and the three axes.
    fn resolve_anchor(
        &self,
        part: &Part<B::Solid>,
        anchor: &str,
    ) -> Result<SpatialRef, ResolveError> {
        if anchor == "center" {
            let bbox = self.backend.bounding_box(&part.solid);
            return Ok(SpatialRef::point(bbox.center()));
        }

        if anchor == "origin" {
            // Current tracked position, not creation-time position.
            return Ok(SpatialRef::point(part.current_position));
        }

        if let Some(local) = anchors::face_local_dir(anchor) {
            let world = part.basis[0] * local.x + part.basis[1] * local.y + part.basis[2] * local.z;
            let selector = anchors::canonical_selector(&world);
            let faces = self.backend.select_faces(&part.solid, selector);
            let face = expect_one(faces, &part.name, selector, "face")?;
            let center = self.backend.face_center(&face);
            let normal = unit_or_degenerate(self.backend.face_normal(&face))?;
            return Ok(SpatialRef::face(center, normal));
        }

        if let Some(idx) = anchors::axis_index(anchor) {
            let bbox = self.backend.bounding_box(&part.solid);
            return Ok(SpatialRef::axis(bbox.center(), part.basis[idx]));
        }

        Err(ResolveError::UnresolvedName {
            name: format!("{}.{}", part.name, anchor),
            known: anchor_names(),
        })
    }

    fn resolve_inline(
        &self,
        spec: &InlineSpec,
        visited: &mut Vec<String>,
    ) -> Result<SpatialRef, ResolveError> {
        match spec {
            InlineSpec::Point { value } => {
                Ok(SpatialRef::point(Point3::new(value[0], value[1], value[2])))
            }
            // Faces anchor at their center; `at` only distinguishes points
            // on parametric features (edges).
            InlineSpec::Face {
                part,
                selector,
                at: _,
            } => {
                let part = self.lookup_part(part)?;
                let faces = self.backend.select_faces(&part.solid, selector);
                let face = expect_one(faces, &part.name, selector, "face")?;
                let center = self.backend.face_center(&face);
                let normal = unit_or_degenerate(self.backend.face_normal(&face))?;
                Ok(SpatialRef::face(center, normal))
            }
            InlineSpec::Edge { part, selector, at } => {
                let part = self.lookup_part(part)?;
                let edges = self.backend.select_edges(&part.solid, selector);
                let edge = expect_one(edges, &part.name, selector, "edge")?;
                let t = at.edge_parameter();
                let position = self.backend.edge_point(&edge, t);
                let tangent = self.backend.edge_tangent(&edge, t);
                let len = tangent.norm();
                if len < DEGENERATE_EPS {
                    return Err(datum_math::FrameError::ZeroTangent(len).into());
                }
                Ok(SpatialRef::edge(position, tangent / len))
            }
            InlineSpec::Axis { from, to } => {
                let a = self.resolve_with_chain(from, visited)?.position;
                let b = self.resolve_with_chain(to, visited)?.position;
                let direction = b - a;
                let len = direction.norm();
                if len < DEGENERATE_EPS {
                    return Err(ResolveError::DegenerateAxis {
                        x: a.x,
                        y: a.y,
                        z: a.z,
                    });
                }
                Ok(SpatialRef::axis(a, direction / len))
            }
        }
    }

    fn lookup_part(&self, name: &str) -> Result<&Part<B::Solid>, ResolveError> {
        self.parts.get(name).ok_or_else(|| ResolveError::MissingPart {
            part: name.to_string(),
            known: self.parts.names(),
        })
    }
}

fn expect_one<T>(
    mut items: Vec<T>,
    part: &str,
    selector: &str,
    feature: &'static str,
) -> Result<T, ResolveError> {
    if items.len() == 1 {
        Ok(items.remove(0))
    } else {
        Err(ResolveError::AmbiguousSelector {
            part: part.to_string(),
            selector: selector.to_string(),
            feature,
            count: items.len(),
        })
    }
}

fn unit_or_degenerate(v: Vec3) -> Result<Vec3, ResolveError> {
    let len = v.norm();
    if len < DEGENERATE_EPS {
        return Err(datum_math::FrameError::ZeroNormal(len).into());
    }
    Ok(v / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use datum_geom::{AnalyticBackend, PrimitiveSolid};
    use datum_ir::{InlineSpec, RefLocation};
    use datum_math::RefKind;

    fn scene() -> (AnalyticBackend, PartRegistry<PrimitiveSolid>, ReferenceTable) {
        let backend = AnalyticBackend::new();
        let mut parts = PartRegistry::new();
        parts.insert(Part::new("base", PrimitiveSolid::cuboid(10.0, 10.0, 10.0)));
        let cyl = backend.translate(
            &PrimitiveSolid::cylinder(10.0, 40.0),
            Vec3::new(30.0, 0.0, 0.0),
        );
        parts.insert(Part::with_position("cyl", cyl, Point3::new(30.0, 0.0, 0.0)));

        let mut refs = ReferenceTable::new();
        refs.insert("mount_point", RefSpec::Literal([0.0, 0.0, 50.0]));
        refs.insert("alias", RefSpec::named("mount_point"));
        (backend, parts, refs)
    }

    #[test]
    fn literal_identity() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let out = r.resolve(&RefSpec::Literal([10.0, 20.0, 30.0])).unwrap();
        assert_relative_eq!(out.position, Point3::new(10.0, 20.0, 30.0), epsilon = 1e-12);
        assert_eq!(out.kind, RefKind::Point);
        assert!(out.orientation.is_none());
    }

    #[test]
    fn named_reference_and_alias_chain() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let direct = r.resolve(&RefSpec::named("mount_point")).unwrap();
        let via_alias = r.resolve(&RefSpec::named("alias")).unwrap();
        assert_eq!(direct, via_alias);
        assert_relative_eq!(direct.position, Point3::new(0.0, 0.0, 50.0), epsilon = 1e-12);
    }

    #[test]
    fn unknown_name_lists_known_references() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let err = r.resolve(&RefSpec::named("missing")).unwrap_err();
        match err {
            ResolveError::UnresolvedName { name, known } => {
                assert_eq!(name, "missing");
                assert_eq!(known, vec!["alias".to_string(), "mount_point".to_string()]);
            }
            other => panic!("expected UnresolvedName, got {other:?}"),
        }
    }

    #[test]
    fn cycle_reports_full_chain() {
        let (backend, parts, _) = scene();
        let mut refs = ReferenceTable::new();
        refs.insert("a", RefSpec::derived(RefSpec::named("b"), [1.0, 0.0, 0.0]));
        refs.insert("b", RefSpec::derived(RefSpec::named("a"), [0.0, 1.0, 0.0]));
        let r = Resolver::new(&backend, &parts, &refs);
        let err = r.resolve(&RefSpec::named("a")).unwrap_err();
        match err {
            ResolveError::CyclicReference { chain } => {
                assert_eq!(chain, vec!["a".to_string(), "b".to_string(), "a".to_string()]);
            }
            other => panic!("expected CyclicReference, got {other:?}"),
        }
    }

    #[test]
    fn self_referential_name_is_cyclic() {
        let (backend, parts, _) = scene();
        let mut refs = ReferenceTable::new();
        refs.insert("selfish", RefSpec::named("selfish"));
        let r = Resolver::new(&backend, &parts, &refs);
        assert!(matches!(
            r.resolve(&RefSpec::named("selfish")),
            Err(ResolveError::CyclicReference { .. })
        ));
    }

    #[test]
    fn box_face_anchors() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);

        let top = r.resolve(&RefSpec::named("base.face_top")).unwrap();
        assert_eq!(top.kind, RefKind::Face);
        assert_relative_eq!(top.position, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-12);
        assert_relative_eq!(top.orientation.unwrap(), Vec3::z(), epsilon = 1e-12);

        let left = r.resolve(&RefSpec::named("base.face_left")).unwrap();
        assert_relative_eq!(left.position, Point3::new(-5.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(left.orientation.unwrap(), -Vec3::x(), epsilon = 1e-12);

        let front = r.resolve(&RefSpec::named("base.face_front")).unwrap();
        assert_relative_eq!(front.orientation.unwrap(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn center_and_origin_anchors() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let center = r.resolve(&RefSpec::named("cyl.center")).unwrap();
        assert_relative_eq!(center.position, Point3::new(30.0, 0.0, 0.0), epsilon = 1e-12);
        let origin = r.resolve(&RefSpec::named("cyl.origin")).unwrap();
        assert_relative_eq!(origin.position, Point3::new(30.0, 0.0, 0.0), epsilon = 1e-12);
        assert_eq!(origin.kind, RefKind::Point);
    }

    #[test]
    fn cylinder_side_anchor_is_surface_point() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let right = r.resolve(&RefSpec::named("cyl.face_right")).unwrap();
        assert_relative_eq!(right.position, Point3::new(40.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(right.orientation.unwrap(), Vec3::x(), epsilon = 1e-12);
    }

    #[test]
    fn axis_anchors_run_through_center() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let z = r.resolve(&RefSpec::named("base.axis_z")).unwrap();
        assert_eq!(z.kind, RefKind::Axis);
        assert_relative_eq!(z.position, Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(z.orientation.unwrap(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn unknown_anchor_lists_valid_anchors() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let err = r.resolve(&RefSpec::named("base.face_diagonal")).unwrap_err();
        match err {
            ResolveError::UnresolvedName { name, known } => {
                assert_eq!(name, "base.face_diagonal");
                assert!(known.contains(&"face_top".to_string()));
                assert!(known.contains(&"axis_z".to_string()));
            }
            other => panic!("expected UnresolvedName, got {other:?}"),
        }
    }

    #[test]
    fn missing_part_lists_known_parts() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let err = r.resolve(&RefSpec::named("ghost.face_top")).unwrap_err();
        match err {
            ResolveError::MissingPart { part, known } => {
                assert_eq!(part, "ghost");
                assert_eq!(known, vec!["base".to_string(), "cyl".to_string()]);
            }
            other => panic!("expected MissingPart, got {other:?}"),
        }
    }

    #[test]
    fn inline_face_extraction() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let spec = RefSpec::Inline(InlineSpec::Face {
            part: "base".to_string(),
            selector: ">Z".to_string(),
            at: RefLocation::Center,
        });
        let out = r.resolve(&spec).unwrap();
        assert_relative_eq!(out.position, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn ambiguous_face_selector_is_rejected() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        // `|Z` matches all four side faces of a box.
        let spec = RefSpec::Inline(InlineSpec::Face {
            part: "base".to_string(),
            selector: "|Z".to_string(),
            at: RefLocation::Center,
        });
        match r.resolve(&spec).unwrap_err() {
            ResolveError::AmbiguousSelector { count, feature, .. } => {
                assert_eq!(count, 4);
                assert_eq!(feature, "face");
            }
            other => panic!("expected AmbiguousSelector, got {other:?}"),
        }
    }

    #[test]
    fn zero_match_selector_is_rejected() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let spec = RefSpec::Inline(InlineSpec::Face {
            part: "base".to_string(),
            selector: "bogus".to_string(),
            at: RefLocation::Center,
        });
        match r.resolve(&spec).unwrap_err() {
            ResolveError::AmbiguousSelector { count, .. } => assert_eq!(count, 0),
            other => panic!("expected AmbiguousSelector, got {other:?}"),
        }
    }

    #[test]
    fn inline_edge_locations() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let edge = |at| {
            RefSpec::Inline(InlineSpec::Edge {
                part: "base".to_string(),
                selector: "|Z and >X and >Y".to_string(),
                at,
            })
        };
        let mid = r.resolve(&edge(RefLocation::Center)).unwrap();
        assert_eq!(mid.kind, RefKind::Edge);
        assert_relative_eq!(mid.position, Point3::new(5.0, 5.0, 0.0), epsilon = 1e-12);
        let start = r.resolve(&edge(RefLocation::Min)).unwrap();
        let end = r.resolve(&edge(RefLocation::Max)).unwrap();
        assert_relative_eq!((end.position - start.position).norm(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(
            mid.orientation.unwrap().dot(&Vec3::z()).abs(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn inline_axis_between_references() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let spec = RefSpec::Inline(InlineSpec::Axis {
            from: Box::new(RefSpec::Literal([0.0, 0.0, 0.0])),
            to: Box::new(RefSpec::named("base.face_top")),
        });
        let out = r.resolve(&spec).unwrap();
        assert_eq!(out.kind, RefKind::Axis);
        assert_relative_eq!(out.orientation.unwrap(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn coincident_axis_endpoints_are_degenerate() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let spec = RefSpec::Inline(InlineSpec::Axis {
            from: Box::new(RefSpec::Literal([1.0, 2.0, 3.0])),
            to: Box::new(RefSpec::Literal([1.0, 2.0, 3.0])),
        });
        assert!(matches!(
            r.resolve(&spec),
            Err(ResolveError::DegenerateAxis { .. })
        ));
    }

    #[test]
    fn derived_offset_in_top_face_frame_matches_world() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        // Top face frame is world-aligned, so a local +X offset is a world
        // +X offset.
        let spec = RefSpec::derived(RefSpec::named("base.face_top"), [5.0, 0.0, 0.0]);
        let out = r.resolve(&spec).unwrap();
        assert_relative_eq!(out.position, Point3::new(5.0, 0.0, 5.0), epsilon = 1e-12);
        // Kind and orientation come from the base face.
        assert_eq!(out.kind, RefKind::Face);
        assert_relative_eq!(out.orientation.unwrap(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn derived_offset_follows_side_face_frame() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let spec = RefSpec::derived(RefSpec::named("base.face_right"), [5.0, 0.0, 0.0]);
        let out = r.resolve(&spec).unwrap();
        // A +X face's local X is not world X: the offset must not land at
        // face.position + (5, 0, 0).
        let naive = Point3::new(10.0, 0.0, 0.0);
        assert!((out.position - naive).norm() > 1.0);
        // It moves along the face's own tangent basis instead.
        assert_relative_eq!(out.position, Point3::new(5.0, 0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn derived_from_literal_offsets_in_world() {
        let (backend, parts, refs) = scene();
        let r = Resolver::new(&backend, &parts, &refs);
        let spec = RefSpec::derived(RefSpec::Literal([1.0, 2.0, 3.0]), [10.0, 0.0, -1.0]);
        let out = r.resolve(&spec).unwrap();
        assert_relative_eq!(out.position, Point3::new(11.0, 2.0, 2.0), epsilon = 1e-12);
        assert_eq!(out.kind, RefKind::Point);
    }

    #[test]
    fn named_lookups_are_memoized_until_cleared() {
        use datum_geom::{BoundingBox, GeometryBackend};
        use std::cell::Cell;

        /// Delegating backend that counts face selections.
        struct Counting {
            inner: AnalyticBackend,
            face_queries: Cell<usize>,
        }
        impl GeometryBackend for Counting {
            type Solid = PrimitiveSolid;
            type Face = <AnalyticBackend as GeometryBackend>::Face;
            type Edge = <AnalyticBackend as GeometryBackend>::Edge;
            fn select_faces(&self, s: &Self::Solid, sel: &str) -> Vec<Self::Face> {
                self.face_queries.set(self.face_queries.get() + 1);
                self.inner.select_faces(s, sel)
            }
            fn select_edges(&self, s: &Self::Solid, sel: &str) -> Vec<Self::Edge> {
                self.inner.select_edges(s, sel)
            }
            fn face_center(&self, f: &Self::Face) -> Point3 {
                self.inner.face_center(f)
            }
            fn face_normal(&self, f: &Self::Face) -> Vec3 {
                self.inner.face_normal(f)
            }
            fn edge_point(&self, e: &Self::Edge, t: f64) -> Point3 {
                self.inner.edge_point(e, t)
            }
            fn edge_tangent(&self, e: &Self::Edge, t: f64) -> Vec3 {
                self.inner.edge_tangent(e, t)
            }
            fn bounding_box(&self, s: &Self::Solid) -> BoundingBox {
                self.inner.bounding_box(s)
            }
            fn translate(&self, s: &Self::Solid, o: Vec3) -> Self::Solid {
                self.inner.translate(s, o)
            }
            fn rotate(
                &self,
                s: &Self::Solid,
                origin: Point3,
                axis: datum_math::Dir3,
                angle: f64,
            ) -> Self::Solid {
                self.inner.rotate(s, origin, axis, angle)
            }
            fn scale(&self, s: &Self::Solid, f: Vec3) -> Self::Solid {
                self.inner.scale(s, f)
            }
        }

        let backend = Counting {
            inner: AnalyticBackend::new(),
            face_queries: Cell::new(0),
        };
        let mut parts = PartRegistry::new();
        parts.insert(Part::new("base", PrimitiveSolid::cuboid(10.0, 10.0, 10.0)));
        let refs = ReferenceTable::new();
        let r = Resolver::new(&backend, &parts, &refs);

        let spec = RefSpec::named("base.face_top");
        r.resolve(&spec).unwrap();
        r.resolve(&spec).unwrap();
        assert_eq!(backend.face_queries.get(), 1);

        r.clear_cache();
        r.resolve(&spec).unwrap();
        assert_eq!(backend.face_queries.get(), 2);
    }
}

//! Part state and the slotmap-backed part registry.

use datum_ir::TransformOp;
use datum_math::{Point3, Vec3};
use slotmap::SlotMap;
use std::collections::HashMap;

slotmap::new_key_type! {
    /// Stable handle to a part in a [`PartRegistry`].
    pub struct PartKey;
}

/// One entry of a part's transform history.
///
/// Records the authored operation together with what it resolved to, so a
/// summary can show real coordinates instead of keywords like `current`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTransform {
    /// The operation as authored.
    pub op: TransformOp,
    /// Rotation origin after resolution, for rotate ops.
    pub resolved_origin: Option<Point3>,
    /// Rotation axis direction after resolution, for rotate ops.
    pub resolved_axis: Option<Vec3>,
    /// The part's tracked position after this operation.
    pub position_after: Point3,
}

/// Mutable state of one part.
///
/// Mutated only by the transform tracker; the resolver and anchor
/// generator read it. The solid handle is whatever the geometry backend
/// works with.
#[derive(Debug, Clone)]
pub struct Part<S> {
    /// Unique part name within one document.
    pub name: String,
    /// Geometry handle, kept in sync with applied transforms.
    pub solid: S,
    /// Tracked position at creation time.
    pub initial_position: Point3,
    /// Tracked position now, after all applied transforms.
    pub current_position: Point3,
    /// Orientation basis, rotated along with the part. Starts as the world
    /// identity frame.
    pub basis: [Vec3; 3],
    /// Ordered history of applied transforms.
    pub history: Vec<AppliedTransform>,
}

impl<S> Part<S> {
    /// Create a part at the world origin.
    pub fn new(name: impl Into<String>, solid: S) -> Self {
        Self::with_position(name, solid, Point3::origin())
    }

    /// Create a part with an explicit tracked position.
    pub fn with_position(name: impl Into<String>, solid: S, position: Point3) -> Self {
        Self {
            name: name.into(),
            solid,
            initial_position: position,
            current_position: position,
            basis: [Vec3::x(), Vec3::y(), Vec3::z()],
            history: Vec::new(),
        }
    }
}

/// Arena of parts with a name index.
///
/// Keys stay stable across mutation, so the transform tracker's writes are
/// immediately visible to subsequent resolver reads through the same
/// handle. Replacing a part (a boolean result standing in for its inputs)
/// reuses the existing key.
#[derive(Debug, Default)]
pub struct PartRegistry<S> {
    parts: SlotMap<PartKey, Part<S>>,
    by_name: HashMap<String, PartKey>,
}

impl<S> PartRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            parts: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    /// Insert a part, replacing any existing part of the same name in
    /// place (its key survives the replacement).
    pub fn insert(&mut self, part: Part<S>) -> PartKey {
        if let Some(&key) = self.by_name.get(&part.name) {
            self.parts[key] = part;
            return key;
        }
        let name = part.name.clone();
        let key = self.parts.insert(part);
        self.by_name.insert(name, key);
        key
    }

    /// Whether a part of this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Key of the named part.
    pub fn key_of(&self, name: &str) -> Option<PartKey> {
        self.by_name.get(name).copied()
    }

    /// Look up a part by name.
    pub fn get(&self, name: &str) -> Option<&Part<S>> {
        self.by_name.get(name).map(|&k| &self.parts[k])
    }

    /// Look up a part by key.
    pub fn part(&self, key: PartKey) -> Option<&Part<S>> {
        self.parts.get(key)
    }

    /// Mutable access by key.
    pub fn part_mut(&mut self, key: PartKey) -> Option<&mut Part<S>> {
        self.parts.get_mut(key)
    }

    /// All part names, sorted for stable error messages.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

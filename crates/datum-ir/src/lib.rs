#![warn(missing_docs)]

//! Declarative wire format for the datum positioning engine.
//!
//! This crate defines the author-facing reference and transform
//! specifications produced by a document parser and consumed by the
//! resolver and transform tracker. It is purely declarative — no geometry,
//! just serde types describing *where* and *how oriented*.
//!
//! A reference is one of:
//! - a bare 3-element array — an absolute point;
//! - a bare string — a registered name or `<part>.<anchor>`;
//! - an object with a `type` field — an inline point/face/edge/axis;
//! - an object with `from` and `offset` — a derived reference whose offset
//!   is applied in the local frame of `from`.

use serde::{Deserialize, Serialize};

/// An unresolved reference specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefSpec {
    /// Absolute world coordinates.
    Literal([f64; 3]),
    /// A registered reference name or a `<part>.<anchor>` auto-reference.
    Named(String),
    /// An inline feature description.
    Inline(InlineSpec),
    /// A reference derived from another by a local-frame offset.
    Derived {
        /// The base reference.
        from: Box<RefSpec>,
        /// Offset expressed in the local frame of `from`.
        offset: [f64; 3],
    },
}

impl RefSpec {
    /// Shorthand for a named spec.
    pub fn named(name: impl Into<String>) -> Self {
        RefSpec::Named(name.into())
    }

    /// Shorthand for a derived spec.
    pub fn derived(from: RefSpec, offset: [f64; 3]) -> Self {
        RefSpec::Derived {
            from: Box::new(from),
            offset,
        }
    }
}

/// An inline feature description, dispatched on its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InlineSpec {
    /// An absolute point written in object form.
    Point {
        /// World coordinates.
        value: [f64; 3],
    },
    /// A face picked from a part's geometry by selector.
    Face {
        /// Part owning the face.
        part: String,
        /// Opaque selector string passed to the geometry backend.
        selector: String,
        /// Where on the face to anchor.
        #[serde(default)]
        at: RefLocation,
    },
    /// An edge picked from a part's geometry by selector.
    Edge {
        /// Part owning the edge.
        part: String,
        /// Opaque selector string passed to the geometry backend.
        selector: String,
        /// Where along the edge to anchor.
        #[serde(default)]
        at: RefLocation,
    },
    /// An axis through two resolved points.
    Axis {
        /// Axis start.
        from: Box<RefSpec>,
        /// Axis end; direction runs from `from` to `to`.
        to: Box<RefSpec>,
    },
}

/// Where on a multi-point feature a reference anchors.
///
/// For edges this maps to the curve parameter: `min` = 0, `center` = 0.5,
/// `max` = 1. The edge-flavored spellings `start`/`midpoint`/`end` are
/// accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefLocation {
    /// Start of an edge / minimum corner.
    #[serde(alias = "start")]
    Min,
    /// Center of a face / midpoint of an edge.
    #[default]
    #[serde(alias = "midpoint")]
    Center,
    /// End of an edge / maximum corner.
    #[serde(alias = "end")]
    Max,
}

impl RefLocation {
    /// The curve parameter this location maps to on an edge.
    pub fn edge_parameter(&self) -> f64 {
        match self {
            RefLocation::Min => 0.0,
            RefLocation::Center => 0.5,
            RefLocation::Max => 1.0,
        }
    }
}

/// One entry in an ordered transform sequence.
///
/// Sequences apply strictly in list order; translate-then-rotate and
/// rotate-then-translate are different operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformOp {
    /// Move a part, either to a resolved target or by a relative offset.
    Translate {
        /// Absolute target: the part's position becomes the resolved
        /// position of this reference.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<RefSpec>,
        /// Relative move: added to the part's current position.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offset: Option<[f64; 3]>,
    },
    /// Rotate a part about an arbitrary axis.
    Rotate {
        /// Rotation angle in degrees.
        angle: f64,
        /// Axis direction.
        axis: AxisSpec,
        /// Point the axis passes through. Required; rotation with no
        /// origin is rejected rather than defaulted.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<OriginSpec>,
    },
    /// Scale a part uniformly or per-axis.
    Scale {
        /// Scale factor(s).
        factor: ScaleSpec,
    },
}

/// A rotation axis direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    /// Explicit direction vector (normalized at apply time).
    Vector([f64; 3]),
    /// `"x"`/`"y"`/`"z"` for a canonical axis, or the name of a reference
    /// whose orientation supplies the direction.
    Named(String),
    /// Any other reference spec; its orientation supplies the direction.
    Spec(RefSpec),
}

/// A rotation origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OriginSpec {
    /// Absolute world coordinates.
    Point([f64; 3]),
    /// `"current"` (position now), `"initial"` (pre-transform position),
    /// or the name of a reference whose position supplies the origin.
    Named(String),
    /// Any other reference spec; its position supplies the origin.
    Spec(RefSpec),
}

/// Uniform or per-axis scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleSpec {
    /// One factor for all axes.
    Uniform(f64),
    /// Independent factors per axis.
    PerAxis([f64; 3]),
}

impl ScaleSpec {
    /// Expand to per-axis factors.
    pub fn factors(&self) -> [f64; 3] {
        match *self {
            ScaleSpec::Uniform(f) => [f, f, f],
            ScaleSpec::PerAxis(f) => f,
        }
    }
}

#![warn(missing_docs)]

//! Reference resolution for the datum positioning engine.
//!
//! Turns declarative reference specifications ([`datum_ir::RefSpec`]) into
//! resolved [`datum_math::SpatialRef`] values: absolute points, registered
//! names, auto-generated part anchors like `base.face_top`, inline
//! face/edge/axis descriptions, and derived references offset in the local
//! frame of their base.
//!
//! Resolution state (named-reference table, memoization cache, visited
//! chain for cycle detection) is scoped to one [`Resolver`], which is
//! scoped to one build pass — there is no process-wide registry.

mod anchors;
mod part;
mod resolver;

pub use anchors::{anchor_names, AUTO_ANCHORS};
pub use part::{AppliedTransform, Part, PartKey, PartRegistry};
pub use resolver::{ReferenceTable, Resolver};

use datum_math::FrameError;
use thiserror::Error;

/// Errors from reference resolution.
///
/// All are terminal for the current resolution pass: they propagate to the
/// caller and are never silently recovered, since a silently-wrong position
/// produces a superficially valid but geometrically wrong model.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    /// A name matched neither the reference table nor a part anchor.
    #[error("reference '{name}' not found. Known: {}", known.join(", "))]
    UnresolvedName {
        /// The name that failed to resolve.
        name: String,
        /// Valid alternatives at the point of failure.
        known: Vec<String>,
    },

    /// A chain of named references re-entered itself.
    #[error("cyclic reference: {}", chain.join(" -> "))]
    CyclicReference {
        /// The names along the cycle, ending with the repeated one.
        chain: Vec<String>,
    },

    /// A selector matched zero or more than one geometric feature.
    #[error(
        "selector '{selector}' matched {count} {feature}s on part '{part}', expected exactly one"
    )]
    AmbiguousSelector {
        /// The part being queried.
        part: String,
        /// The offending selector string.
        selector: String,
        /// `"face"` or `"edge"`.
        feature: &'static str,
        /// How many features matched.
        count: usize,
    },

    /// A zero-length normal or tangent made frame construction impossible.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(#[from] FrameError),

    /// Axis endpoints coincide, leaving no direction.
    #[error("axis 'from' and 'to' resolve to the same point ({x:.3}, {y:.3}, {z:.3})")]
    DegenerateAxis {
        /// Shared X coordinate.
        x: f64,
        /// Shared Y coordinate.
        y: f64,
        /// Shared Z coordinate.
        z: f64,
    },

    /// A spec named a part absent from the current part set.
    #[error("part '{part}' not found. Known parts: {}", known.join(", "))]
    MissingPart {
        /// The missing part name.
        part: String,
        /// Parts present in the registry.
        known: Vec<String>,
    },
}

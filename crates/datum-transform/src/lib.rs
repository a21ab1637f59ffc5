#![warn(missing_docs)]

//! Ordered transform application for datum parts.
//!
//! A [`TransformTracker`] applies a sequence of [`datum_ir::TransformOp`]s
//! to one part: it resolves each operation's references against the scene
//! as it stands *at that step*, mutates the part's solid through the
//! geometry backend, and keeps the part's tracked position and orientation
//! basis in sync. Every applied operation is recorded in the part's
//! history together with its resolved origin and axis.
//!
//! Sequences are order-sensitive by construction: each step sees the
//! positions produced by the steps before it.

use datum_geom::GeometryBackend;
use datum_ir::{AxisSpec, OriginSpec, RefSpec, TransformOp};
use datum_math::{
    rotate_point_about_axis, rotate_vec_about_axis, Dir3, Point3, Vec3, DEGENERATE_EPS,
};
use datum_resolve::{
    AppliedTransform, Part, PartRegistry, ReferenceTable, ResolveError, Resolver,
};
use thiserror::Error;

/// Errors raised while applying a transform sequence.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransformError {
    /// A rotate op had no origin. There is no safe default: rotating about
    /// the world origin silently produces a wrong model, so the origin
    /// must be authored.
    #[error(
        "rotate requires an explicit origin: a point, a reference name, 'current', or 'initial'"
    )]
    MissingRotationOrigin,

    /// A translate op carried neither `to` nor `offset`.
    #[error("translate requires 'to', 'offset', or both")]
    UnderspecifiedTranslate,

    /// An axis vector with no usable direction.
    #[error("rotation axis ({x:.3}, {y:.3}, {z:.3}) has zero length")]
    ZeroAxis {
        /// X component as authored.
        x: f64,
        /// Y component as authored.
        y: f64,
        /// Z component as authored.
        z: f64,
    },

    /// An axis was given as a reference that resolved to something with no
    /// direction, such as a plain point.
    #[error("axis reference resolved to a {kind} with no direction")]
    AxisWithoutDirection {
        /// Kind of the resolved reference.
        kind: &'static str,
    },

    /// A reference inside the op failed to resolve.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// What one op resolved to, computed before any mutation.
///
/// Splitting planning from mutation keeps the resolver's shared borrow of
/// the registry out of the mutation step, and guarantees a failed op
/// leaves the part untouched.
enum Planned {
    Translate { delta: Vec3 },
    Rotate { origin: Point3, axis: Dir3, radians: f64 },
    Scale { factors: Vec3 },
}

/// Applies transform sequences to parts and records their history.
pub struct TransformTracker<'a, B: GeometryBackend> {
    backend: &'a B,
    references: &'a ReferenceTable,
}

impl<'a, B: GeometryBackend> TransformTracker<'a, B> {
    /// Create a tracker over one backend and reference table.
    pub fn new(backend: &'a B, references: &'a ReferenceTable) -> Self {
        Self { backend, references }
    }

    /// Apply `ops` to the named part, in order.
    ///
    /// Each op resolves against the scene state produced by the previous
    /// op, so a rotate about `current` after a translate uses the
    /// translated position. Stops at the first failing op; ops already
    /// applied stay applied.
    pub fn apply(
        &self,
        parts: &mut PartRegistry<B::Solid>,
        part_name: &str,
        ops: &[TransformOp],
    ) -> Result<(), TransformError> {
        let key = parts
            .key_of(part_name)
            .ok_or_else(|| ResolveError::MissingPart {
                part: part_name.to_string(),
                known: parts.names(),
            })?;

        for op in ops {
            // Fresh resolver per op: part state changed since the last
            // one, so no cache may be carried across.
            let planned = {
                let resolver = Resolver::new(self.backend, parts, self.references);
                let part = parts.part(key).ok_or_else(|| ResolveError::MissingPart {
                    part: part_name.to_string(),
                    known: parts.names(),
                })?;
                self.plan(&resolver, part, op)?
            };
            match parts.part_mut(key) {
                Some(part) => self.commit(part, op, planned),
                None => {
                    return Err(ResolveError::MissingPart {
                        part: part_name.to_string(),
                        known: parts.names(),
                    }
                    .into())
                }
            }
        }
        Ok(())
    }

    fn plan(
        &self,
        resolver: &Resolver<'_, B>,
        part: &Part<B::Solid>,
        op: &TransformOp,
    ) -> Result<Planned, TransformError> {
        match op {
            TransformOp::Translate { to, offset } => {
                if to.is_none() && offset.is_none() {
                    return Err(TransformError::UnderspecifiedTranslate);
                }
                let mut target = part.current_position;
                if let Some(to) = to {
                    target = resolver.resolve(to)?.position;
                }
                if let Some(o) = offset {
                    target += Vec3::new(o[0], o[1], o[2]);
                }
                Ok(Planned::Translate {
                    delta: target - part.current_position,
                })
            }
            TransformOp::Rotate { angle, axis, origin } => {
                let origin = self.resolve_origin(resolver, part, origin.as_ref())?;
                let axis = self.resolve_axis(resolver, axis)?;
                Ok(Planned::Rotate {
                    origin,
                    axis,
                    radians: angle.to_radians(),
                })
            }
            TransformOp::Scale { factor } => {
                let f = factor.factors();
                Ok(Planned::Scale {
                    factors: Vec3::new(f[0], f[1], f[2]),
                })
            }
        }
    }

    fn resolve_origin(
        &self,
        resolver: &Resolver<'_, B>,
        part: &Part<B::Solid>,
        origin: Option<&OriginSpec>,
    ) -> Result<Point3, TransformError> {
        let origin = origin.ok_or(TransformError::MissingRotationOrigin)?;
        match origin {
            OriginSpec::Point(p) => Ok(Point3::new(p[0], p[1], p[2])),
            OriginSpec::Named(name) => match name.as_str() {
                "current" => Ok(part.current_position),
                "initial" => Ok(part.initial_position),
                other => Ok(resolver.resolve(&RefSpec::named(other))?.position),
            },
            OriginSpec::Spec(spec) => Ok(resolver.resolve(spec)?.position),
        }
    }

    fn resolve_axis(
        &self,
        resolver: &Resolver<'_, B>,
        axis: &AxisSpec,
    ) -> Result<Dir3, TransformError> {
        let raw = match axis {
            AxisSpec::Vector(v) => Vec3::new(v[0], v[1], v[2]),
            AxisSpec::Named(name) => match name.as_str() {
                "x" | "X" => Vec3::x(),
                "y" | "Y" => Vec3::y(),
                "z" | "Z" => Vec3::z(),
                other => self.axis_from_ref(resolver, &RefSpec::named(other))?,
            },
            AxisSpec::Spec(spec) => self.axis_from_ref(resolver, spec)?,
        };
        Dir3::try_new(raw, DEGENERATE_EPS).ok_or(TransformError::ZeroAxis {
            x: raw.x,
            y: raw.y,
            z: raw.z,
        })
    }

    fn axis_from_ref(
        &self,
        resolver: &Resolver<'_, B>,
        spec: &RefSpec,
    ) -> Result<Vec3, TransformError> {
        let resolved = resolver.resolve(spec)?;
        resolved
            .direction()
            .ok_or(TransformError::AxisWithoutDirection {
                kind: resolved.kind.as_str(),
            })
    }

    fn commit(&self, part: &mut Part<B::Solid>, op: &TransformOp, planned: Planned) {
        let (resolved_origin, resolved_axis) = match planned {
            Planned::Translate { delta } => {
                part.solid = self.backend.translate(&part.solid, delta);
                part.current_position += delta;
                (None, None)
            }
            Planned::Rotate { origin, axis, radians } => {
                part.solid = self.backend.rotate(&part.solid, origin, axis, radians);
                part.current_position =
                    rotate_point_about_axis(&part.current_position, &origin, &axis, radians);
                for b in &mut part.basis {
                    *b = rotate_vec_about_axis(b, &axis, radians);
                }
                (Some(origin), Some(*axis.as_ref()))
            }
            Planned::Scale { factors } => {
                part.solid = self.backend.scale(&part.solid, factors);
                (None, None)
            }
        };
        part.history.push(AppliedTransform {
            op: op.clone(),
            resolved_origin,
            resolved_axis,
            position_after: part.current_position,
        });
    }
}

/// Human-readable summary of a part's transform history.
///
/// Rotations show the resolved origin and axis, not the authored
/// keyword, so the summary reads as concrete coordinates.
pub fn history_summary<S>(part: &Part<S>) -> String {
    use std::fmt::Write as _;

    let mut out = format!("transform history for '{}':\n", part.name);
    let _ = writeln!(out, "  initial position {}", fmt_point(&part.initial_position));
    for (i, entry) in part.history.iter().enumerate() {
        let step = i + 1;
        match &entry.op {
            TransformOp::Translate { .. } => {
                let _ = writeln!(
                    out,
                    "  {step}. translate -> {}",
                    fmt_point(&entry.position_after)
                );
            }
            TransformOp::Rotate { angle, .. } => {
                let origin = entry
                    .resolved_origin
                    .map(|p| fmt_point(&p))
                    .unwrap_or_else(|| "?".to_string());
                let axis = entry
                    .resolved_axis
                    .map(|v| format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z))
                    .unwrap_or_else(|| "?".to_string());
                let _ = writeln!(
                    out,
                    "  {step}. rotate {angle} deg about {axis} through {origin} -> {}",
                    fmt_point(&entry.position_after)
                );
            }
            TransformOp::Scale { factor } => {
                let f = factor.factors();
                let _ = writeln!(
                    out,
                    "  {step}. scale by ({:.3}, {:.3}, {:.3})",
                    f[0], f[1], f[2]
                );
            }
        }
    }
    out
}

fn fmt_point(p: &Point3) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}

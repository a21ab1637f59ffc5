//! JSON scene documents.
//!
//! A scene document declares parts, named references, and transform
//! sequences in one file; [`SceneDoc::build`] evaluates it into a live
//! [`Assembly`] over the analytic backend. References use the wire format
//! of [`datum_ir`], so everything a program can express through the API is
//! expressible in a document.

use crate::{AnalyticBackend, Assembly, Error, Point3, PrimitiveSolid, RefSpec, TransformOp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A whole scene: parts, references, transform sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDoc {
    /// Parts, created in order.
    #[serde(default)]
    pub parts: Vec<PartDoc>,
    /// Named references. An existing part's anchors win over a
    /// registered name of the same `part.anchor` form.
    #[serde(default)]
    pub references: BTreeMap<String, RefSpec>,
    /// Transform sequences, applied in order after all parts exist.
    #[serde(default)]
    pub transforms: Vec<TransformDoc>,
}

/// One part declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartDoc {
    /// Unique part name.
    pub name: String,
    /// Primitive shape.
    pub shape: ShapeDoc,
    /// Initial position; origin if omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
}

/// Primitive shape parameters. All shapes are created centered on their
/// part's position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDoc {
    /// Axis-aligned box with full extents `size`.
    Cuboid {
        /// Full X/Y/Z extents.
        size: [f64; 3],
    },
    /// Cylinder along Z.
    Cylinder {
        /// Radius.
        radius: f64,
        /// Full height.
        height: f64,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f64,
    },
    /// Cone or frustum along Z.
    Cone {
        /// Radius at the bottom cap.
        radius_bottom: f64,
        /// Radius at the top cap; zero for a pointed cone.
        #[serde(default)]
        radius_top: f64,
        /// Full height.
        height: f64,
    },
}

impl ShapeDoc {
    fn solid(&self) -> PrimitiveSolid {
        match *self {
            ShapeDoc::Cuboid { size } => PrimitiveSolid::cuboid(size[0], size[1], size[2]),
            ShapeDoc::Cylinder { radius, height } => PrimitiveSolid::cylinder(radius, height),
            ShapeDoc::Sphere { radius } => PrimitiveSolid::sphere(radius),
            ShapeDoc::Cone {
                radius_bottom,
                radius_top,
                height,
            } => PrimitiveSolid::cone(radius_bottom, radius_top, height),
        }
    }
}

/// A transform sequence bound to one part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformDoc {
    /// Part to transform.
    pub part: String,
    /// Ops, applied in list order.
    pub ops: Vec<TransformOp>,
}

impl SceneDoc {
    /// Parse a scene document from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Evaluate the document into a live assembly.
    ///
    /// Parts are created first, then references registered, then transform
    /// sequences applied in document order.
    pub fn build(&self) -> Result<Assembly<AnalyticBackend>, Error> {
        let mut asm = Assembly::analytic();
        for part in &self.parts {
            let solid = part.shape.solid();
            match part.position {
                Some(p) => {
                    asm.add_part_at(part.name.clone(), solid, Point3::new(p[0], p[1], p[2]));
                }
                None => {
                    asm.add_part(part.name.clone(), solid);
                }
            }
        }
        for (name, spec) in &self.references {
            asm.define_reference(name.clone(), spec.clone());
        }
        for seq in &self.transforms {
            asm.apply(&seq.part, &seq.ops)?;
        }
        Ok(asm)
    }
}

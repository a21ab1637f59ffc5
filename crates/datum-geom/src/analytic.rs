//! Analytic backend: exact closed-form geometry for primitive solids.
//!
//! Solids carry a center and an orthonormal basis, so rigid transforms are
//! exact and feature selection keeps working after rotation. Selector
//! syntax: directional predicates `>A` (most toward +A), `<A` (most toward
//! -A) and `|A` (parallel to A) for A in X/Y/Z, combinable with `and`,
//! e.g. `"|Z and >X and >Y"`.

use crate::{BoundingBox, GeometryBackend};
use datum_math::{rotate_point_about_axis, rotate_vec_about_axis, Dir3, Point3, Vec3};

/// Tie tolerance for extremal predicates.
const ALIGN_EPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Cuboid {
        half: Vec3,
    },
    Cylinder {
        radius: f64,
        half_height: f64,
    },
    Sphere {
        radius: f64,
    },
    Cone {
        radius_bottom: f64,
        radius_top: f64,
        half_height: f64,
    },
}

/// A primitive solid tracked analytically: shape parameters plus a rigid
/// placement (center and rotated basis).
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSolid {
    shape: Shape,
    center: Point3,
    basis: [Vec3; 3],
}

impl PrimitiveSolid {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            center: Point3::origin(),
            basis: [Vec3::x(), Vec3::y(), Vec3::z()],
        }
    }

    /// An axis-aligned box centered at the origin.
    pub fn cuboid(sx: f64, sy: f64, sz: f64) -> Self {
        Self::new(Shape::Cuboid {
            half: Vec3::new(sx / 2.0, sy / 2.0, sz / 2.0),
        })
    }

    /// A cylinder along local Z, centered at the origin.
    pub fn cylinder(radius: f64, height: f64) -> Self {
        Self::new(Shape::Cylinder {
            radius,
            half_height: height / 2.0,
        })
    }

    /// A sphere centered at the origin.
    pub fn sphere(radius: f64) -> Self {
        Self::new(Shape::Sphere { radius })
    }

    /// A cone/frustum along local Z, centered at the origin.
    pub fn cone(radius_bottom: f64, radius_top: f64, height: f64) -> Self {
        Self::new(Shape::Cone {
            radius_bottom,
            radius_top,
            half_height: height / 2.0,
        })
    }

    /// Current center of the solid.
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Half-extents along the local axes.
    fn local_half_extents(&self) -> Vec3 {
        match self.shape {
            Shape::Cuboid { half } => half,
            Shape::Cylinder {
                radius,
                half_height,
            } => Vec3::new(radius, radius, half_height),
            Shape::Sphere { radius } => Vec3::new(radius, radius, radius),
            Shape::Cone {
                radius_bottom,
                radius_top,
                half_height,
            } => {
                let r = radius_bottom.max(radius_top);
                Vec3::new(r, r, half_height)
            }
        }
    }

    /// Candidate faces in world space: planar faces for boxes, planar caps
    /// plus canonical side surface points for curved solids.
    fn candidate_faces(&self) -> Vec<AnalyticFace> {
        let [ex, ey, ez] = self.basis;
        let c = self.center;
        match self.shape {
            Shape::Cuboid { half } => {
                let axes = [(ex, half.x), (ey, half.y), (ez, half.z)];
                let mut faces = Vec::with_capacity(6);
                for (dir, h) in axes {
                    for sign in [1.0, -1.0] {
                        faces.push(AnalyticFace {
                            center: c + dir * (sign * h),
                            normal: dir * sign,
                        });
                    }
                }
                faces
            }
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let mut faces = vec![
                    AnalyticFace {
                        center: c + ez * half_height,
                        normal: ez,
                    },
                    AnalyticFace {
                        center: c - ez * half_height,
                        normal: -ez,
                    },
                ];
                // Side anchors: a point on the lateral surface along each
                // canonical in-plane direction.
                for dir in [ex, -ex, ey, -ey] {
                    faces.push(AnalyticFace {
                        center: c + dir * radius,
                        normal: dir,
                    });
                }
                faces
            }
            Shape::Sphere { radius } => [ex, -ex, ey, -ey, ez, -ez]
                .into_iter()
                .map(|dir| AnalyticFace {
                    center: c + dir * radius,
                    normal: dir,
                })
                .collect(),
            Shape::Cone {
                radius_bottom,
                radius_top,
                half_height,
            } => {
                let mut faces = vec![
                    AnalyticFace {
                        center: c + ez * half_height,
                        normal: ez,
                    },
                    AnalyticFace {
                        center: c - ez * half_height,
                        normal: -ez,
                    },
                ];
                // Lateral surface radius at mid-height.
                let r_mid = (radius_bottom + radius_top) / 2.0;
                for dir in [ex, -ex, ey, -ey] {
                    faces.push(AnalyticFace {
                        center: c + dir * r_mid,
                        normal: dir,
                    });
                }
                faces
            }
        }
    }

    /// The twelve edges of a box, in world space. Curved solids expose no
    /// selectable edges in this backend.
    fn candidate_edges(&self) -> Vec<AnalyticEdge> {
        let Shape::Cuboid { half } = self.shape else {
            return Vec::new();
        };
        let [ex, ey, ez] = self.basis;
        let axes = [
            (ex, half.x, ey, half.y, ez, half.z),
            (ey, half.y, ez, half.z, ex, half.x),
            (ez, half.z, ex, half.x, ey, half.y),
        ];
        let mut edges = Vec::with_capacity(12);
        for (du, hu, dv, hv, dw, hw) in axes {
            for sv in [1.0, -1.0] {
                for sw in [1.0, -1.0] {
                    let mid = self.center + dv * (sv * hv) + dw * (sw * hw);
                    edges.push(AnalyticEdge {
                        start: mid - du * hu,
                        end: mid + du * hu,
                    });
                }
            }
        }
        edges
    }
}

/// A selected face: center point plus outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticFace {
    /// Face center in world space.
    pub center: Point3,
    /// Outward unit normal.
    pub normal: Vec3,
}

/// A selected straight edge: world-space endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticEdge {
    /// Edge start.
    pub start: Point3,
    /// Edge end.
    pub end: Point3,
}

#[derive(Debug, Clone, Copy)]
enum Pred {
    /// Most toward the direction.
    Max(Vec3),
    /// Most away from the direction.
    Min(Vec3),
    /// Parallel to the direction.
    Parallel(Vec3),
}

fn parse_selector(selector: &str) -> Option<Vec<Pred>> {
    selector
        .split(" and ")
        .map(|token| {
            let token = token.trim();
            let mut chars = token.chars();
            let op = chars.next()?;
            let dir = match chars.as_str().trim().to_ascii_uppercase().as_str() {
                "X" => Vec3::x(),
                "Y" => Vec3::y(),
                "Z" => Vec3::z(),
                _ => return None,
            };
            match op {
                '>' => Some(Pred::Max(dir)),
                '<' => Some(Pred::Min(dir)),
                '|' => Some(Pred::Parallel(dir)),
                _ => None,
            }
        })
        .collect()
}

/// Keep the candidates whose score is within [`ALIGN_EPS`] of the maximum.
fn keep_extremal<T>(items: Vec<T>, score: impl Fn(&T) -> f64) -> Vec<T> {
    let best = items
        .iter()
        .map(&score)
        .fold(f64::NEG_INFINITY, f64::max);
    if best == f64::NEG_INFINITY {
        return Vec::new();
    }
    items
        .into_iter()
        .filter(|it| score(it) > best - ALIGN_EPS)
        .collect()
}

/// Closed-form geometry backend for primitive solids.
///
/// Stateless; all placement state lives in the [`PrimitiveSolid`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticBackend;

impl AnalyticBackend {
    /// Create a backend.
    pub fn new() -> Self {
        Self
    }
}

impl GeometryBackend for AnalyticBackend {
    type Solid = PrimitiveSolid;
    type Face = AnalyticFace;
    type Edge = AnalyticEdge;

    fn select_faces(&self, solid: &Self::Solid, selector: &str) -> Vec<Self::Face> {
        let Some(preds) = parse_selector(selector) else {
            return Vec::new();
        };
        let mut faces = solid.candidate_faces();
        for pred in preds {
            faces = match pred {
                Pred::Max(d) => {
                    let kept = keep_extremal(faces, |f| f.normal.dot(&d));
                    // A face pointing nowhere near the requested direction
                    // is not a match even if it is the best available.
                    kept.into_iter().filter(|f| f.normal.dot(&d) > 0.1).collect()
                }
                Pred::Min(d) => {
                    let kept = keep_extremal(faces, |f| -f.normal.dot(&d));
                    kept.into_iter()
                        .filter(|f| f.normal.dot(&d) < -0.1)
                        .collect()
                }
                Pred::Parallel(d) => faces
                    .into_iter()
                    .filter(|f| f.normal.dot(&d).abs() < ALIGN_EPS)
                    .collect(),
            };
        }
        faces
    }

    fn select_edges(&self, solid: &Self::Solid, selector: &str) -> Vec<Self::Edge> {
        let Some(preds) = parse_selector(selector) else {
            return Vec::new();
        };
        let mut edges = solid.candidate_edges();
        for pred in preds {
            edges = match pred {
                Pred::Max(d) => keep_extremal(edges, |e| {
                    nalgebra::center(&e.start, &e.end).coords.dot(&d)
                }),
                Pred::Min(d) => keep_extremal(edges, |e| {
                    -nalgebra::center(&e.start, &e.end).coords.dot(&d)
                }),
                Pred::Parallel(d) => edges
                    .into_iter()
                    .filter(|e| {
                        let t = (e.end - e.start).normalize();
                        t.dot(&d).abs() > 1.0 - ALIGN_EPS
                    })
                    .collect(),
            };
        }
        edges
    }

    fn face_center(&self, face: &Self::Face) -> Point3 {
        face.center
    }

    fn face_normal(&self, face: &Self::Face) -> Vec3 {
        face.normal
    }

    fn edge_point(&self, edge: &Self::Edge, t: f64) -> Point3 {
        edge.start + (edge.end - edge.start) * t
    }

    fn edge_tangent(&self, edge: &Self::Edge, _t: f64) -> Vec3 {
        (edge.end - edge.start).normalize()
    }

    fn bounding_box(&self, solid: &Self::Solid) -> BoundingBox {
        let half = solid.local_half_extents();
        let [ex, ey, ez] = solid.basis;
        // World extent of a rotated local box: sum of projected half-axes.
        let extent = Vec3::new(
            ex.x.abs() * half.x + ey.x.abs() * half.y + ez.x.abs() * half.z,
            ex.y.abs() * half.x + ey.y.abs() * half.y + ez.y.abs() * half.z,
            ex.z.abs() * half.x + ey.z.abs() * half.y + ez.z.abs() * half.z,
        );
        BoundingBox {
            min: solid.center - extent,
            max: solid.center + extent,
        }
    }

    fn translate(&self, solid: &Self::Solid, offset: Vec3) -> Self::Solid {
        PrimitiveSolid {
            center: solid.center + offset,
            ..solid.clone()
        }
    }

    fn rotate(&self, solid: &Self::Solid, origin: Point3, axis: Dir3, angle: f64) -> Self::Solid {
        PrimitiveSolid {
            shape: solid.shape,
            center: rotate_point_about_axis(&solid.center, &origin, &axis, angle),
            basis: solid
                .basis
                .map(|b| rotate_vec_about_axis(&b, &axis, angle)),
        }
    }

    fn scale(&self, solid: &Self::Solid, factors: Vec3) -> Self::Solid {
        let shape = match solid.shape {
            Shape::Cuboid { half } => Shape::Cuboid {
                half: half.component_mul(&factors),
            },
            Shape::Cylinder {
                radius,
                half_height,
            } => Shape::Cylinder {
                radius: radius * factors.x,
                half_height: half_height * factors.z,
            },
            Shape::Sphere { radius } => Shape::Sphere {
                radius: radius * factors.x,
            },
            Shape::Cone {
                radius_bottom,
                radius_top,
                half_height,
            } => Shape::Cone {
                radius_bottom: radius_bottom * factors.x,
                radius_top: radius_top * factors.x,
                half_height: half_height * factors.z,
            },
        };
        PrimitiveSolid {
            shape,
            ..solid.clone()
        }
    }
}

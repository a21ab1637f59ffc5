//! Canonical auto-generated anchor names and their directions.

use datum_math::Vec3;

/// The fixed anchor set every part provides without explicit authoring.
pub const AUTO_ANCHORS: [&str; 11] = [
    "center",
    "origin",
    "face_top",
    "face_bottom",
    "face_left",
    "face_right",
    "face_front",
    "face_back",
    "axis_x",
    "axis_y",
    "axis_z",
];

/// Anchor names as owned strings, for error messages.
pub fn anchor_names() -> Vec<String> {
    AUTO_ANCHORS.iter().map(|s| s.to_string()).collect()
}

/// Part-local outward direction of a face anchor.
pub(crate) fn face_local_dir(anchor: &str) -> Option<Vec3> {
    match anchor {
        "face_top" => Some(Vec3::z()),
        "face_bottom" => Some(-Vec3::z()),
        "face_right" => Some(Vec3::x()),
        "face_left" => Some(-Vec3::x()),
        "face_front" => Some(Vec3::y()),
        "face_back" => Some(-Vec3::y()),
        _ => None,
    }
}

/// Basis index of an axis anchor.
pub(crate) fn axis_index(anchor: &str) -> Option<usize> {
    match anchor {
        "axis_x" => Some(0),
        "axis_y" => Some(1),
        "axis_z" => Some(2),
        _ => None,
    }
}

/// The canonical directional selector closest to a world direction.
///
/// Face anchors are authored in the part's local frame; after the part
/// rotates, the local direction is mapped to world space and snapped to
/// the nearest canonical selector before querying the backend.
pub(crate) fn canonical_selector(dir: &Vec3) -> &'static str {
    let ax = dir.x.abs();
    let ay = dir.y.abs();
    let az = dir.z.abs();
    if ax >= ay && ax >= az {
        if dir.x >= 0.0 {
            ">X"
        } else {
            "<X"
        }
    } else if ay >= az {
        if dir.y >= 0.0 {
            ">Y"
        } else {
            "<Y"
        }
    } else if dir.z >= 0.0 {
        ">Z"
    } else {
        "<Z"
    }
}

//! Shell geometry checks based on corner positions.
//!
//! # Normal convention
//! - **Tri3** `[x1, x2, x3]`: `n = (x2 - x1) × (x3 - x1)`.
//! - **Quad4** `[x1, x2, x3, x4]`: `n = (x3 - x1) × (x4 - x2)`, the cross
//!   product of the diagonals, which is well defined for warped quads too.
//!
//! Both raw normals have magnitude twice the (projected) element area.
//!
//! A normal is considered degenerate when its magnitude is not finite or
//! falls below `tolerance * L²`, with `L` the longest edge of the element, so
//! the check does not depend on the model's length unit.
//!
//! # Examples
//! ```rust
//! use mesh_refine::geometry::quality::{shell_normal, unit_normal};
//!
//! let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
//! assert_eq!(shell_normal(&tri), Some([0.0, 0.0, 1.0]));
//! assert_eq!(unit_normal(&tri, 1e-12), Some([0.0, 0.0, 1.0]));
//! ```

use crate::mesh_error::MeshRefineError;
use crate::topology::point::{ElementId, NodeId};

/// Default relative tolerance for degenerate normals.
pub const DEFAULT_NORMAL_TOLERANCE: f64 = 1e-12;

/// Raw (unnormalized) normal of a 3- or 4-corner shell.
///
/// Returns `None` for any other corner count.
pub fn shell_normal(corners: &[[f64; 3]]) -> Option<[f64; 3]> {
    match corners {
        [x1, x2, x3] => Some(cross(sub(*x2, *x1), sub(*x3, *x1))),
        [x1, x2, x3, x4] => Some(cross(sub(*x3, *x1), sub(*x4, *x2))),
        _ => None,
    }
}

/// Unit normal, or `None` if the shell is degenerate under `tolerance`.
pub fn unit_normal(corners: &[[f64; 3]], tolerance: f64) -> Option<[f64; 3]> {
    let n = shell_normal(corners)?;
    let magnitude = norm(n);
    let scale = longest_edge(corners);
    if !magnitude.is_finite() || scale <= 0.0 || magnitude <= tolerance * scale * scale {
        return None;
    }
    Some([n[0] / magnitude, n[1] / magnitude, n[2] / magnitude])
}

/// Validate that a shell has a well-defined normal and return it (unit length).
///
/// # Errors
/// [`MeshRefineError::DegenerateNormal`] when the normal magnitude is below
/// `tolerance * L²` or not finite.
pub fn validate_shell_normal(
    element: ElementId,
    nodes: &[NodeId],
    corners: &[[f64; 3]],
    tolerance: f64,
) -> Result<[f64; 3], MeshRefineError> {
    unit_normal(corners, tolerance).ok_or_else(|| MeshRefineError::DegenerateNormal {
        element,
        nodes: nodes.to_vec(),
        magnitude: shell_normal(corners).map_or(0.0, norm),
    })
}

/// Longest closed-loop edge of the corner polygon.
pub fn longest_edge(corners: &[[f64; 3]]) -> f64 {
    let n = corners.len();
    (0..n)
        .map(|i| norm(sub(corners[(i + 1) % n], corners[i])))
        .fold(0.0, f64::max)
}

pub(crate) fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

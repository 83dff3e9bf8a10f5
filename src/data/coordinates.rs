//! Node position lookup.
//!
//! Refinement only ever needs node positions in one consistent rectangular
//! frame. Whatever owns the coordinate systems (local frames, cross
//! references) is expected to resolve them before handing the mesh over;
//! the engine reads positions exclusively through [`NodePositions`].

use crate::data::table::Table;
use crate::model::Node;
use crate::topology::point::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Read access to node positions in a single global rectangular frame.
pub trait NodePositions {
    /// Position of `node`, or `None` if the node is unknown.
    fn position(&self, node: NodeId) -> Option<[f64; 3]>;

    /// Positions of several nodes, failing on the first unknown one.
    ///
    /// On failure the unknown node id is returned.
    fn positions<const N: usize>(&self, nodes: [NodeId; N]) -> Result<[[f64; 3]; N], NodeId> {
        let mut out = [[0.0; 3]; N];
        for (slot, node) in out.iter_mut().zip(nodes) {
            *slot = self.position(node).ok_or(node)?;
        }
        Ok(out)
    }
}

impl NodePositions for Table<NodeId, Node> {
    fn position(&self, node: NodeId) -> Option<[f64; 3]> {
        self.get(node).map(|n| n.position)
    }
}

impl NodePositions for HashMap<NodeId, [f64; 3]> {
    fn position(&self, node: NodeId) -> Option<[f64; 3]> {
        self.get(&node).copied()
    }
}

impl NodePositions for BTreeMap<NodeId, [f64; 3]> {
    fn position(&self, node: NodeId) -> Option<[f64; 3]> {
        self.get(&node).copied()
    }
}

/// Linear interpolation `a + t (b - a)`.
#[inline]
pub fn lerp(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] * (1.0 - t) + b[0] * t,
        a[1] * (1.0 - t) + b[1] * t,
        a[2] * (1.0 - t) + b[2] * t,
    ]
}

/// Arithmetic mean of a set of positions.
pub fn centroid(points: &[[f64; 3]]) -> [f64; 3] {
    let n = points.len().max(1) as f64;
    let mut sum = [0.0; 3];
    for p in points {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
    }
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Bilinear interpolation over a quadrilateral with corners ordered
/// `x1 (u=0,v=0)`, `x2 (1,0)`, `x3 (1,1)`, `x4 (0,1)`.
pub fn bilinear(corners: &[[f64; 3]; 4], u: f64, v: f64) -> [f64; 3] {
    let [x1, x2, x3, x4] = corners;
    let w = [
        (1.0 - u) * (1.0 - v),
        u * (1.0 - v),
        u * v,
        (1.0 - u) * v,
    ];
    let mut out = [0.0; 3];
    for k in 0..3 {
        out[k] = w[0] * x1[k] + w[1] * x2[k] + w[2] * x3[k] + w[3] * x4[k];
    }
    out
}

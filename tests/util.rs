#![allow(dead_code)]
use mesh_refine::model::{Element, ElementKind, Mesh};
use mesh_refine::topology::point::{ElementId, NodeId};
use std::collections::HashMap;

pub fn nid(u: u64) -> NodeId {
    NodeId::new(u).unwrap()
}

pub fn eid(u: u64) -> ElementId {
    ElementId::new(u).unwrap()
}

/// Unit square `1(0,0) 2(1,0) 3(1,1) 4(0,1)` in the z = 0 plane.
pub fn unit_square_nodes(mesh: &mut Mesh) {
    mesh.add_node(1, [0.0, 0.0, 0.0]).unwrap();
    mesh.add_node(2, [1.0, 0.0, 0.0]).unwrap();
    mesh.add_node(3, [1.0, 1.0, 0.0]).unwrap();
    mesh.add_node(4, [0.0, 1.0, 0.0]).unwrap();
}

/// Structured `nx × ny` quad grid of unit cells, ids row-major from 1.
pub fn quad_grid(nx: u64, ny: u64) -> Mesh {
    let mut mesh = Mesh::new();
    let node = |i: u64, j: u64| j * (nx + 1) + i + 1;
    for j in 0..=ny {
        for i in 0..=nx {
            mesh.add_node(node(i, j), [i as f64, j as f64, 0.0]).unwrap();
        }
    }
    for j in 0..ny {
        for i in 0..nx {
            mesh.add_quad4(
                j * nx + i + 1,
                1,
                [node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)],
            )
            .unwrap();
        }
    }
    mesh
}

/// The same grid with every cell split along its diagonal into two triangles.
pub fn tri_grid(nx: u64, ny: u64) -> Mesh {
    let mut mesh = Mesh::new();
    let node = |i: u64, j: u64| j * (nx + 1) + i + 1;
    for j in 0..=ny {
        for i in 0..=nx {
            mesh.add_node(node(i, j), [i as f64, j as f64, 0.0]).unwrap();
        }
    }
    let mut id = 1;
    for j in 0..ny {
        for i in 0..nx {
            let (a, b, c, d) = (node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1));
            mesh.add_tri3(id, 1, [a, b, c]).unwrap();
            mesh.add_tri3(id + 1, 1, [a, c, d]).unwrap();
            id += 2;
        }
    }
    mesh
}

/// Positions by id.
pub fn positions(mesh: &Mesh) -> HashMap<NodeId, [f64; 3]> {
    mesh.nodes().values().map(|n| (n.id, n.position)).collect()
}

pub fn connectivity(element: &Element) -> Vec<u64> {
    element.nodes().iter().map(|n| n.get()).collect()
}

pub fn is_shell(element: &Element) -> bool {
    matches!(element.kind, ElementKind::Tri3(_) | ElementKind::Quad4(_))
}

/// Area of a planar shell in the z = 0 plane (shoelace formula).
pub fn planar_area(mesh: &Mesh, element: &Element) -> f64 {
    let pts: Vec<[f64; 3]> = element
        .nodes()
        .iter()
        .map(|n| mesh.node(*n).unwrap().position)
        .collect();
    let n = pts.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (p, q) = (pts[i], pts[(i + 1) % n]);
            p[0] * q[1] - q[0] * p[1]
        })
        .sum();
    0.5 * twice
}

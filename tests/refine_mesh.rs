mod util;

use approx::assert_relative_eq;
use mesh_refine::mesh_error::{ErrorCategory, MeshRefineError};
use mesh_refine::model::{BarOrientation, Constraint, ElementKind, Load, LoadCombination, Mesh};
use mesh_refine::topology::cell_type::ElementFamily;
use mesh_refine::topology::refine::{RefineOptions, refine_mesh};
use util::*;

#[test]
fn unit_square_quad_scenario() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_quad4(1, 1, [1, 2, 3, 4]).unwrap();

    let refined =
        refine_mesh(&mesh, &RefineOptions::default()).expect("quad refinement should succeed");
    let out = &refined.mesh;
    assert_eq!(out.elements().len(), 4);
    assert_eq!(out.nodes().len(), 9);

    let pos = positions(out);
    assert_eq!(pos[&nid(5)], [0.5, 0.0, 0.0]);
    assert_eq!(pos[&nid(6)], [1.0, 0.5, 0.0]);
    assert_eq!(pos[&nid(7)], [0.5, 1.0, 0.0]);
    assert_eq!(pos[&nid(8)], [0.0, 0.5, 0.0]);
    assert_eq!(pos[&nid(9)], [0.5, 0.5, 0.0]);

    let children: Vec<Vec<u64>> = out.elements().values().map(connectivity).collect();
    assert_eq!(
        children,
        vec![
            vec![1, 5, 9, 8],
            vec![5, 2, 6, 9],
            vec![8, 9, 7, 4],
            vec![9, 6, 3, 7],
        ]
    );
    let ids: Vec<u64> = out.elements().keys().map(|e| e.get()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn two_triangles_share_the_diagonal_midpoint() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_tri3(1, 1, [1, 2, 3]).unwrap();
    mesh.add_tri3(2, 1, [1, 3, 4]).unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let out = &refined.mesh;
    assert_eq!(out.elements().len(), 8);
    assert_eq!(out.nodes().len(), 9);
    assert_eq!(out.node(nid(7)).unwrap().position, [0.5, 0.5, 0.0]);

    let children: Vec<(u64, Vec<u64>)> = out
        .elements()
        .iter()
        .map(|(id, e)| (id.get(), connectivity(e)))
        .collect();
    assert_eq!(
        children,
        vec![
            (1, vec![1, 5, 7]),
            (3, vec![5, 2, 6]),
            (4, vec![7, 6, 3]),
            (5, vec![5, 6, 7]),
            (2, vec![1, 7, 9]),
            (6, vec![7, 3, 8]),
            (7, vec![9, 8, 4]),
            (8, vec![7, 8, 9]),
        ]
    );
}

#[test]
fn reversed_neighbour_reuses_the_same_midpoint() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_tri3(1, 1, [1, 2, 3]).unwrap();
    mesh.add_tri3(2, 1, [1, 4, 3]).unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let out = &refined.mesh;
    assert_eq!(out.nodes().len(), 9);
    assert_eq!(out.node(nid(7)).unwrap().position, [0.5, 0.5, 0.0]);
    // second parent (1,4,3): n4 = mid(1,4), n5 = mid(4,3), n6 = mid(3,1) = 7
    let second = out.element(eid(2)).unwrap();
    assert_eq!(connectivity(second), vec![1, 8, 7]);
}

#[test]
fn line_scenario() {
    let mut mesh = Mesh::new();
    mesh.add_node(1, [0.0, 0.0, 0.0]).unwrap();
    mesh.add_node(2, [2.0, 0.0, 0.0]).unwrap();
    mesh.add_line2(1, 1, [1, 2], BarOrientation::Vector([0.0, 1.0, 0.0]))
        .unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let out = &refined.mesh;
    let children: Vec<Vec<u64>> = out.elements().values().map(connectivity).collect();
    assert_eq!(children, vec![vec![1, 3], vec![3, 2]]);
    assert_eq!(out.node(nid(3)).unwrap().position, [1.0, 0.0, 0.0]);
    assert_eq!(refined.report.produced[&ElementFamily::Line2], 2);
}

#[test]
fn line_on_a_shell_edge_shares_its_node() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_quad4(1, 1, [1, 2, 3, 4]).unwrap();
    mesh.add_line2(2, 3, [2, 1], BarOrientation::Vector([0.0, 0.0, 1.0]))
        .unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let line_children: Vec<Vec<u64>> = refined
        .mesh
        .elements()
        .values()
        .filter(|e| e.family() == ElementFamily::Line2)
        .map(connectivity)
        .collect();
    assert_eq!(line_children, vec![vec![2, 5], vec![5, 1]]);
    assert_eq!(refined.report.edges, 4);
}

#[test]
fn count_law_and_fresh_node_ids() {
    let mut mesh = quad_grid(2, 2);
    mesh.add_node(100, [5.0, 5.0, 0.0]).unwrap();
    mesh.add_node(101, [6.0, 5.0, 0.0]).unwrap();
    mesh.add_node(102, [5.0, 6.0, 0.0]).unwrap();
    mesh.add_tri3(50, 1, [100, 101, 102]).unwrap();
    mesh.add_line2(51, 1, [100, 101], BarOrientation::Vector([0.0, 0.0, 1.0]))
        .unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let report = &refined.report;
    assert_eq!(report.produced[&ElementFamily::Quad4], 4 * 4);
    assert_eq!(report.produced[&ElementFamily::Tri3], 4);
    assert_eq!(report.produced[&ElementFamily::Line2], 2);
    assert_eq!(report.refined.values().sum::<usize>(), 6);
    assert_eq!(report.new_elements, report.produced_total() - 6);

    let max_original = mesh.nodes().max_key().unwrap();
    let new_ids: Vec<_> = refined
        .mesh
        .nodes()
        .keys()
        .filter(|id| !mesh.nodes().contains(*id))
        .collect();
    assert_eq!(new_ids.len(), report.new_nodes);
    assert!(new_ids.iter().all(|id| *id > max_original));
    let mut sorted = new_ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), new_ids.len());
}

#[test]
fn original_corners_keep_their_positions() {
    let mesh = tri_grid(3, 2);
    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    for node in mesh.nodes().values() {
        assert_eq!(refined.mesh.node(node.id).unwrap().position, node.position);
    }
    // conforming refinement of the grid
    assert_eq!(refined.mesh.nodes().len(), 7 * 5);
}

#[test]
fn degenerate_triangle_is_rejected_and_mesh_unchanged() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_tri3(1, 1, [1, 2, 3]).unwrap();
    mesh.add_tri3(2, 1, [3, 3, 4]).unwrap();
    let before = serde_json::to_value(&mesh).unwrap();

    let err = mesh.refine(&RefineOptions::default()).unwrap_err();
    assert_eq!(
        err,
        MeshRefineError::DegenerateEdge {
            element: eid(2),
            node: nid(3)
        }
    );
    assert_eq!(err.category(), ErrorCategory::Topology);
    assert_eq!(serde_json::to_value(&mesh).unwrap(), before);
}

#[test]
fn collinear_triangle_is_a_geometry_error() {
    let mut mesh = Mesh::new();
    mesh.add_node(1, [0.0, 0.0, 0.0]).unwrap();
    mesh.add_node(2, [1.0, 0.0, 0.0]).unwrap();
    mesh.add_node(3, [2.0, 0.0, 0.0]).unwrap();
    mesh.add_tri3(1, 1, [1, 2, 3]).unwrap();

    let err = refine_mesh(&mesh, &RefineOptions::default()).unwrap_err();
    assert!(matches!(err, MeshRefineError::DegenerateNormal { element, .. } if element == eid(1)));
    assert_eq!(err.category(), ErrorCategory::Geometry);

    let refined = refine_mesh(&mesh, &RefineOptions::default().with_check_normals(false)).unwrap();
    assert_eq!(refined.mesh.elements().len(), 4);
}

#[test]
fn missing_node_is_a_topology_error() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_quad4(1, 1, [1, 2, 3, 42]).unwrap();
    let err = refine_mesh(&mesh, &RefineOptions::default()).unwrap_err();
    assert_eq!(
        err,
        MeshRefineError::MissingNode {
            element: eid(1),
            node: nid(42)
        }
    );
}

#[test]
fn ratio_three_quads() {
    let mesh = quad_grid(2, 1);
    let options = RefineOptions::default().with_ratio(3);
    let refined = refine_mesh(&mesh, &options).unwrap();
    let report = &refined.report;
    assert_eq!(report.produced[&ElementFamily::Quad4], 18);
    assert_eq!(report.edges, 7);
    assert_eq!(refined.mesh.nodes().len(), 7 * 4);
    assert_eq!(report.new_nodes, 7 * 4 - 6);

    for element in refined.mesh.elements().values() {
        assert_relative_eq!(planar_area(&refined.mesh, element), 1.0 / 9.0, epsilon = 1e-12);
    }
}

#[test]
fn ratio_three_with_triangles_is_a_configuration_error() {
    let mut mesh = quad_grid(1, 1);
    mesh.add_tri3(10, 1, [1, 2, 3]).unwrap();
    let err = refine_mesh(&mesh, &RefineOptions::default().with_ratio(3)).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);

    let err = refine_mesh(&mesh, &RefineOptions::default().with_ratio(1)).unwrap_err();
    assert_eq!(err, MeshRefineError::InvalidRefinementRatio(1));
}

#[test]
fn ancillary_is_dropped_and_counted() {
    let mut mesh = quad_grid(1, 1);
    mesh.add_load(
        1,
        Load::Pressure {
            elements: vec![eid(1)],
            pressure: 2.5,
        },
    );
    mesh.add_load(
        1,
        Load::Gravity {
            scale: 9.81,
            direction: [0.0, 0.0, -1.0],
        },
    );
    mesh.add_load_combination(LoadCombination {
        id: 9,
        scale: 1.0,
        factors: vec![(1.0, 1)],
    });
    mesh.add_constraint(
        2,
        Constraint {
            components: "123456".into(),
            nodes: vec![nid(1), nid(2)],
        },
    );

    let report = mesh.refine(&RefineOptions::default()).unwrap();
    assert_eq!(report.dropped.loads, 2);
    assert_eq!(report.dropped.load_combinations, 1);
    assert_eq!(report.dropped.constraints, 1);
    assert!(mesh.ancillary().is_empty());
}

#[test]
fn unsupported_elements_are_skipped() {
    let mut mesh = quad_grid(1, 1);
    mesh.add_unsupported(7, "CHEXA", &[1, 2, 3, 4]).unwrap();
    mesh.add_unsupported(8, "CONM2", &[3]).unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let report = &refined.report;
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].element, eid(7));
    assert_eq!(report.skipped[0].card, "CHEXA");
    assert!(refined.mesh.element(eid(7)).is_none());
    assert_eq!(refined.mesh.elements().len(), 4);
    assert!(!report.refined.contains_key(&ElementFamily::Unsupported));
}

#[test]
fn shell_attributes_propagate_and_thickness_resets() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_quad4(1, 12, [1, 2, 3, 4]).unwrap();
    let mut raw = serde_json::to_value(&mesh).unwrap();
    raw["elements"][0]["kind"]["Quad4"]["shell"]["z_offset"] = 0.25.into();
    raw["elements"][0]["kind"]["Quad4"]["corner_thickness"] =
        serde_json::json!([0.1, 0.1, 0.2, 0.2]);
    let mesh: Mesh = serde_json::from_value(raw).unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    for element in refined.mesh.elements().values() {
        let ElementKind::Quad4(quad) = &element.kind else {
            panic!("expected quads only");
        };
        assert_eq!(quad.shell.property_id, 12);
        assert_eq!(quad.shell.z_offset, 0.25);
        assert_eq!(quad.corner_thickness, [None; 4]);
    }
}

#[test]
fn clockwise_shells_keep_their_winding() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_quad4(1, 1, [1, 4, 3, 2]).unwrap();
    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    for element in refined.mesh.elements().values() {
        assert!(planar_area(&refined.mesh, element) < 0.0);
    }
}

#[test]
fn refining_twice_compounds() {
    let mut mesh = tri_grid(1, 1);
    mesh.refine(&RefineOptions::default()).unwrap();
    mesh.refine(&RefineOptions::default()).unwrap();
    assert_eq!(mesh.elements().len(), 2 * 16);
    assert_eq!(mesh.nodes().len(), 5 * 5);
    let total: f64 = mesh
        .elements()
        .values()
        .filter(|e| is_shell(e))
        .map(|e| planar_area(&mesh, e))
        .sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-12);
}

#[test]
fn triangle_and_quad_share_an_edge() {
    let mut mesh = Mesh::new();
    unit_square_nodes(&mut mesh);
    mesh.add_node(5, [2.0, 0.5, 0.0]).unwrap();
    mesh.add_quad4(1, 1, [1, 2, 3, 4]).unwrap();
    mesh.add_tri3(2, 1, [2, 5, 3]).unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    let out = &refined.mesh;
    assert_eq!(refined.report.edges, 6);
    assert_eq!(refined.report.new_nodes, 7);
    assert_eq!(out.nodes().len(), 12);

    // edge 2-3 is registered once, by the quad
    assert_eq!(out.node(nid(7)).unwrap().position, [1.0, 0.5, 0.0]);
    let on_shared_edge = out
        .nodes()
        .values()
        .filter(|n| n.position == [1.0, 0.5, 0.0])
        .count();
    assert_eq!(on_shared_edge, 1);

    let users: Vec<ElementFamily> = out
        .elements()
        .values()
        .filter(|e| e.nodes().contains(&nid(7)))
        .map(|e| e.family())
        .collect();
    assert_eq!(users.iter().filter(|f| **f == ElementFamily::Quad4).count(), 2);
    assert_eq!(users.iter().filter(|f| **f == ElementFamily::Tri3).count(), 3);
}

#[test]
fn concave_quad_refines_unless_inversion_is_checked() {
    let mut mesh = Mesh::new();
    mesh.add_node(1, [0.0, 0.0, 0.0]).unwrap();
    mesh.add_node(2, [4.0, 0.0, 0.0]).unwrap();
    mesh.add_node(3, [1.0, 1.0, 0.0]).unwrap();
    mesh.add_node(4, [0.0, 4.0, 0.0]).unwrap();
    mesh.add_quad4(1, 1, [1, 2, 3, 4]).unwrap();

    let refined = refine_mesh(&mesh, &RefineOptions::default()).unwrap();
    assert_eq!(refined.mesh.elements().len(), 4);
    assert_eq!(refined.mesh.node(nid(9)).unwrap().position, [1.25, 1.25, 0.0]);

    let options = RefineOptions::default().with_check_inversion(true);
    let err = refine_mesh(&mesh, &options).unwrap_err();
    assert_eq!(
        err,
        MeshRefineError::InvertedElement {
            element: eid(4),
            parent: eid(1),
            nodes: vec![nid(9), nid(6), nid(3), nid(7)],
        }
    );
    assert_eq!(err.category(), ErrorCategory::Geometry);
}

#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-refine
//!
//! mesh-refine performs uniform h-refinement of finite-element meshes made of
//! 2-node lines, 3-node triangular shells and 4-node quadrilateral shells.
//! Every edge is split into `ratio` segments, each element is replaced by its
//! children, and the result stays conforming: an edge shared by two elements
//! receives the same new nodes from both sides.
//!
//! ## Features
//! - Insertion-ordered [`Mesh`](model::Mesh) model with strongly typed
//!   [`NodeId`](topology::point::NodeId) / [`ElementId`](topology::point::ElementId)
//! - Edge registry with canonical keys and orientation-aware chain lookup
//! - Triangle (1 → 4), quadrilateral (1 → r²) and line (1 → r) subdividers
//! - Normal checks rejecting degenerate children, and optionally inverted ones
//! - Per-pass [`RefineReport`](topology::refine::RefineReport) with counts,
//!   skipped elements and dropped ancillary data
//!
//! ## Determinism
//!
//! Nodes and elements iterate in insertion order and ids are issued
//! monotonically, so refining the same mesh twice yields identical ids.
//!
//! ## Usage
//!
//! ```rust
//! use mesh_refine::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! mesh.add_node(1, [0.0, 0.0, 0.0])?;
//! mesh.add_node(2, [2.0, 0.0, 0.0])?;
//! mesh.add_line2(1, 1, [1, 2], BarOrientation::Vector([0.0, 0.0, 1.0]))?;
//!
//! let refined = refine_mesh(&mesh, &RefineOptions::default())?;
//! assert_eq!(refined.mesh.elements().len(), 2);
//! # Ok::<(), MeshRefineError>(())
//! ```
//!
//! ## Invariant checking
//! Enable the `check-invariants` feature to run the structural checks of
//! [`DebugInvariants`] in release builds as well.

pub mod data;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod model;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::coordinates::NodePositions;
    pub use crate::data::table::Table;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::{ErrorCategory, MeshRefineError};
    pub use crate::model::{
        BarOrientation, Element, ElementKind, Line2, Mesh, Node, Quad4, ShellAttributes, Tri3,
    };
    pub use crate::topology::cell_type::ElementFamily;
    pub use crate::topology::point::{ElementId, NodeId};
    pub use crate::topology::refine::{
        RefineOptions, RefineReport, Refinement, UnsupportedElementWarning, refine_mesh,
    };
}

//! MeshRefineError: Unified error type for mesh-refine public APIs
//!
//! Every fallible operation in the crate returns this error. Variants carry
//! the element id, node ids, or edge key involved so the offending input can
//! be located. Use [`MeshRefineError::category`] to branch on the broad class
//! of failure (configuration, topology, geometry, identifier).

use crate::topology::cell_type::ElementFamily;
use crate::topology::point::{ElementId, NodeId};
use crate::topology::refine::edge::EdgeKey;
use thiserror::Error;

/// Broad classes of refinement failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCategory {
    /// Invalid or unsupported refinement options.
    Configuration,
    /// Malformed connectivity in the input or produced mesh.
    Topology,
    /// Ill-shaped geometry (zero-area or inverted elements).
    Geometry,
    /// Identifier construction or exhaustion.
    Identifier,
}

/// Unified error type for mesh-refine operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshRefineError {
    /// Attempted to construct an id with a zero value (invalid).
    #[error("ids must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidId,
    /// The id space was exhausted while allocating new nodes or elements.
    #[error("id overflow: no {0} ids left above u64::MAX")]
    IdOverflow(&'static str),

    /// Refinement ratio below 2.
    #[error("invalid refinement ratio {0}: must be at least 2")]
    InvalidRefinementRatio(u32),
    /// The element family has no general implementation for this ratio.
    #[error("refinement ratio {ratio} is not supported for {family} elements")]
    UnsupportedRefinementRatio { family: ElementFamily, ratio: u32 },
    /// Refinement options failed validation for a reason other than the ratio.
    #[error("invalid refinement options: {0}")]
    InvalidOptions(String),

    /// An edge whose two endpoints are the same node.
    #[error("degenerate edge in element {element}: both endpoints are node {node}")]
    DegenerateEdge { element: ElementId, node: NodeId },
    /// Corner ids of an element (original or refined) are not pairwise distinct.
    #[error(
        "corner collision in element {element}: nodes {nodes:?} are not pairwise distinct"
    )]
    CornerCollision { element: ElementId, nodes: Vec<NodeId> },
    /// Two writes into the same local grid cell disagreed.
    #[error(
        "local grid conflict in element {element} at ({row}, {col}): node {existing} already set, got {incoming}"
    )]
    GridConflict {
        element: ElementId,
        row: usize,
        col: usize,
        existing: NodeId,
        incoming: NodeId,
    },
    /// An edge chain written onto a local grid does not span it.
    #[error("edge chain for element {element} has {actual} nodes, local grid expects {expected}")]
    ChainLength {
        element: ElementId,
        expected: usize,
        actual: usize,
    },
    /// A local grid was sliced before every required cell was assigned.
    #[error("local grid of element {element} has unset cell ({row}, {col})")]
    IncompleteGrid {
        element: ElementId,
        row: usize,
        col: usize,
    },
    /// A subdivider asked for an edge that the pre-scan never registered.
    #[error(
        "edge {edge} of element {element} was not registered by the edge pre-scan"
    )]
    UnresolvedEdge { element: ElementId, edge: EdgeKey },
    /// An element references a node that has no position.
    #[error("element {element} references missing node {node}")]
    MissingNode { element: ElementId, node: NodeId },
    /// A node id was inserted twice.
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),
    /// An element id was inserted twice.
    #[error("duplicate element id {0}")]
    DuplicateElement(ElementId),
    /// A table's lookup map and its ordering disagree on a key.
    #[error("table index out of sync for key {0}")]
    TableKeyMismatch(String),
    /// An element failed attribute or connectivity validation.
    #[error("invalid element {element}: {reason}")]
    InvalidElement { element: ElementId, reason: String },

    /// A produced element has a zero-magnitude normal.
    #[error(
        "degenerate normal for element {element} (nodes {nodes:?}): magnitude {magnitude:e} is below tolerance"
    )]
    DegenerateNormal {
        element: ElementId,
        nodes: Vec<NodeId>,
        magnitude: f64,
    },
    /// A produced element faces the opposite way from its parent.
    #[error(
        "element {element} (nodes {nodes:?}) is inverted relative to its parent {parent}"
    )]
    InvertedElement {
        element: ElementId,
        parent: ElementId,
        nodes: Vec<NodeId>,
    },
}

impl MeshRefineError {
    /// The broad class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        use MeshRefineError::*;
        match self {
            InvalidId | IdOverflow(_) => ErrorCategory::Identifier,
            InvalidRefinementRatio(_) | UnsupportedRefinementRatio { .. } | InvalidOptions(_) => {
                ErrorCategory::Configuration
            }
            DegenerateEdge { .. }
            | CornerCollision { .. }
            | GridConflict { .. }
            | ChainLength { .. }
            | IncompleteGrid { .. }
            | UnresolvedEdge { .. }
            | MissingNode { .. }
            | DuplicateNode(_)
            | DuplicateElement(_)
            | TableKeyMismatch(_)
            | InvalidElement { .. } => ErrorCategory::Topology,
            DegenerateNormal { .. } | InvertedElement { .. } => ErrorCategory::Geometry,
        }
    }
}

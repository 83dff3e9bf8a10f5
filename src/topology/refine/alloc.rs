//! Monotonic id allocation for one refinement pass.
//!
//! Both allocators are seeded once from the largest id of the input and only
//! count upwards, so new ids never collide with existing ones and are never
//! reused within a pass.

use crate::data::coordinates::NodePositions;
use crate::data::table::Table;
use crate::mesh_error::MeshRefineError;
use crate::model::{Element, Node};
use crate::topology::point::{ElementId, NodeId};

/// Issues node ids and owns the output node table under construction.
#[derive(Clone, Debug)]
pub struct NodeAllocator {
    nodes: Table<NodeId, Node>,
    next: u64,
    issued: usize,
}

impl NodeAllocator {
    /// Start from a copy of `nodes`; the first issued id is `max + 1`.
    pub fn new(nodes: &Table<NodeId, Node>) -> Self {
        Self {
            nodes: nodes.clone(),
            next: next_after(nodes.max_key().map(NodeId::get)),
            issued: 0,
        }
    }

    /// Create a node at `position` under a fresh id.
    ///
    /// # Errors
    /// [`MeshRefineError::IdOverflow`] once the id space is exhausted.
    pub fn allocate(&mut self, position: [f64; 3]) -> Result<NodeId, MeshRefineError> {
        let id = take_next(&mut self.next, "node")?;
        let id = NodeId::new(id)?;
        self.nodes.try_insert(id, Node::new(id, position))?;
        self.issued += 1;
        Ok(id)
    }

    /// Number of nodes created so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    /// The original nodes followed by every issued node.
    pub fn into_nodes(self) -> Table<NodeId, Node> {
        self.nodes
    }
}

impl NodePositions for NodeAllocator {
    fn position(&self, node: NodeId) -> Option<[f64; 3]> {
        self.nodes.position(node)
    }
}

/// Issues element ids for children beyond the first.
#[derive(Clone, Debug)]
pub struct ElementAllocator {
    next: u64,
    issued: usize,
}

impl ElementAllocator {
    /// The first issued id is one past the largest id in `elements`.
    pub fn new(elements: &Table<ElementId, Element>) -> Self {
        Self {
            next: next_after(elements.max_key().map(ElementId::get)),
            issued: 0,
        }
    }

    /// # Errors
    /// [`MeshRefineError::IdOverflow`] once the id space is exhausted.
    pub fn allocate(&mut self) -> Result<ElementId, MeshRefineError> {
        let id = take_next(&mut self.next, "element")?;
        self.issued += 1;
        ElementId::new(id)
    }

    pub fn issued(&self) -> usize {
        self.issued
    }
}

/// Zero marks an exhausted id space.
fn next_after(max: Option<u64>) -> u64 {
    max.map_or(1, |m| m.checked_add(1).unwrap_or(0))
}

fn take_next(next: &mut u64, what: &'static str) -> Result<u64, MeshRefineError> {
    if *next == 0 {
        return Err(MeshRefineError::IdOverflow(what));
    }
    let id = *next;
    *next = next.checked_add(1).unwrap_or(0);
    Ok(id)
}

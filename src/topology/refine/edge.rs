//! Canonical undirected edges and their shared node chains.
//!
//! Every physical edge of the mesh is identified by an [`EdgeKey`], the pair
//! of its corner node ids sorted numerically. The first element that needs an
//! edge creates its interior nodes; the resulting [`EdgeChain`] is stored in
//! canonical order (low id first) and handed to every later consumer in that
//! consumer's own traversal direction.
//!
//! Getting the direction wrong silently swaps nodes and folds elements, so
//! the reversal lives in one place: [`EdgeRegistry::resolve`] and
//! [`EdgeRegistry::resolve_or_create`] return chains already oriented from
//! the requested `from` node to the requested `to` node.

use crate::data::coordinates::{NodePositions, lerp};
use crate::mesh_error::MeshRefineError;
use crate::model::Element;
use crate::topology::point::{ElementId, NodeId};
use crate::topology::refine::alloc::NodeAllocator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unordered pair of distinct node ids, stored sorted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    low: NodeId,
    high: NodeId,
}

impl EdgeKey {
    /// Canonical key of the edge between `a` and `b`; `None` if `a == b`.
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Endpoint with the smaller id (start of the canonical direction).
    pub fn low(&self) -> NodeId {
        self.low
    }

    /// Endpoint with the larger id (end of the canonical direction).
    pub fn high(&self) -> NodeId {
        self.high
    }

    /// True if traversing `from → to` follows the canonical direction.
    pub fn is_canonical(&self, from: NodeId) -> bool {
        from == self.low
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Node ids along an edge, `[low, m1, ..., mk, high]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EdgeChain {
    nodes: Vec<NodeId>,
}

impl EdgeChain {
    /// All ids in canonical order, endpoints included.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Chain oriented to start at `from`.
    fn oriented(&self, key: &EdgeKey, from: NodeId) -> Vec<NodeId> {
        if key.is_canonical(from) {
            self.nodes.clone()
        } else {
            self.nodes.iter().rev().copied().collect()
        }
    }
}

/// Cache of edge chains for one refinement pass.
///
/// Grown only by [`resolve_or_create`](Self::resolve_or_create) during the
/// pre-scan; read-only afterwards.
#[derive(Clone, Debug)]
pub struct EdgeRegistry {
    ratio: u32,
    chains: HashMap<EdgeKey, EdgeChain>,
}

impl EdgeRegistry {
    /// Empty registry splitting each edge into `ratio` intervals.
    pub fn new(ratio: u32) -> Self {
        Self {
            ratio,
            chains: HashMap::new(),
        }
    }

    /// Run the pre-scan over every element that will be refined.
    ///
    /// Edges are visited element by element in iteration order and, within an
    /// element, in its own traversal order; this fixes which element creates
    /// each chain and therefore which ids the new nodes receive.
    pub fn build<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
        ratio: u32,
        nodes: &mut NodeAllocator,
    ) -> Result<Self, MeshRefineError> {
        let mut registry = Self::new(ratio);
        for element in elements {
            for (from, to) in element.edges() {
                registry.resolve_or_create(element.id, from, to, nodes)?;
            }
        }
        log::debug!(
            "edge pre-scan registered {} edges, {} new nodes",
            registry.len(),
            nodes.issued()
        );
        Ok(registry)
    }

    pub fn ratio(&self) -> u32 {
        self.ratio
    }

    /// Number of registered edges.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Cached chain for a canonical key.
    pub fn chain(&self, key: &EdgeKey) -> Option<&EdgeChain> {
        self.chains.get(key)
    }

    /// Chain of edge `from → to`, creating its interior nodes on first use.
    ///
    /// New nodes are placed by linear interpolation between the canonical
    /// endpoints at offsets `i / ratio`, `i = 1..ratio`.
    ///
    /// # Errors
    /// - [`MeshRefineError::DegenerateEdge`] if `from == to`.
    /// - [`MeshRefineError::MissingNode`] if an endpoint has no position.
    pub fn resolve_or_create(
        &mut self,
        owner: ElementId,
        from: NodeId,
        to: NodeId,
        nodes: &mut NodeAllocator,
    ) -> Result<Vec<NodeId>, MeshRefineError> {
        let key = edge_key(owner, from, to)?;
        if let Some(chain) = self.chains.get(&key) {
            return Ok(chain.oriented(&key, from));
        }

        let start = nodes.position(key.low).ok_or(MeshRefineError::MissingNode {
            element: owner,
            node: key.low,
        })?;
        let end = nodes.position(key.high).ok_or(MeshRefineError::MissingNode {
            element: owner,
            node: key.high,
        })?;

        let mut chain = Vec::with_capacity(self.ratio as usize + 1);
        chain.push(key.low);
        for i in 1..self.ratio {
            let t = f64::from(i) / f64::from(self.ratio);
            chain.push(nodes.allocate(lerp(start, end, t))?);
        }
        chain.push(key.high);

        let chain = EdgeChain { nodes: chain };
        let oriented = chain.oriented(&key, from);
        self.chains.insert(key, chain);
        Ok(oriented)
    }

    /// Cached chain of edge `from → to`, oriented to start at `from`.
    ///
    /// # Errors
    /// - [`MeshRefineError::DegenerateEdge`] if `from == to`.
    /// - [`MeshRefineError::UnresolvedEdge`] if the pre-scan never saw the edge.
    pub fn resolve(
        &self,
        owner: ElementId,
        from: NodeId,
        to: NodeId,
    ) -> Result<Vec<NodeId>, MeshRefineError> {
        let key = edge_key(owner, from, to)?;
        self.chains
            .get(&key)
            .map(|chain| chain.oriented(&key, from))
            .ok_or(MeshRefineError::UnresolvedEdge {
                element: owner,
                edge: key,
            })
    }
}

fn edge_key(owner: ElementId, from: NodeId, to: NodeId) -> Result<EdgeKey, MeshRefineError> {
    EdgeKey::new(from, to).ok_or(MeshRefineError::DegenerateEdge {
        element: owner,
        node: from,
    })
}

//! The in-memory mesh model consumed and produced by refinement.

use crate::data::coordinates::NodePositions;
use crate::data::table::Table;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshRefineError;
use crate::model::ancillary::{Ancillary, AncillaryCounts, Constraint, Load, LoadCombination};
use crate::model::element::{
    BarOrientation, Element, ElementKind, Line2, Quad4, ShellAttributes, Tri3,
    UnsupportedElement,
};
use crate::model::node::Node;
use crate::topology::point::{ElementId, NodeId};
use serde::{Deserialize, Serialize};

/// Nodes, elements, and topology-dependent ancillary data.
///
/// Nodes and elements iterate in insertion order. Positions are expected in
/// one global rectangular frame.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "MeshRecord", into = "MeshRecord")]
pub struct Mesh {
    nodes: Table<NodeId, Node>,
    elements: Table<ElementId, Element>,
    ancillary: Ancillary,
}

/// Flat serde representation of a [`Mesh`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeshRecord {
    pub nodes: Vec<Node>,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub ancillary: Ancillary,
}

impl TryFrom<MeshRecord> for Mesh {
    type Error = MeshRefineError;

    fn try_from(record: MeshRecord) -> Result<Self, Self::Error> {
        let mut mesh = Mesh::new();
        for node in record.nodes {
            mesh.insert_node(node)?;
        }
        for element in record.elements {
            mesh.add_element(element)?;
        }
        mesh.ancillary = record.ancillary;
        Ok(mesh)
    }
}

impl From<Mesh> for MeshRecord {
    fn from(mesh: Mesh) -> Self {
        MeshRecord {
            nodes: mesh.nodes.values().copied().collect(),
            elements: mesh.elements.values().cloned().collect(),
            ancillary: mesh.ancillary,
        }
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a mesh from prepared tables.
    pub fn from_parts(
        nodes: Table<NodeId, Node>,
        elements: Table<ElementId, Element>,
        ancillary: Ancillary,
    ) -> Self {
        Self {
            nodes,
            elements,
            ancillary,
        }
    }

    /// Split the mesh back into its tables.
    pub fn into_parts(self) -> (Table<NodeId, Node>, Table<ElementId, Element>, Ancillary) {
        (self.nodes, self.elements, self.ancillary)
    }

    pub fn nodes(&self) -> &Table<NodeId, Node> {
        &self.nodes
    }

    pub fn elements(&self) -> &Table<ElementId, Element> {
        &self.elements
    }

    pub fn ancillary(&self) -> &Ancillary {
        &self.ancillary
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Insert a node record.
    ///
    /// # Errors
    /// [`MeshRefineError::DuplicateNode`] if the id is already present.
    pub fn insert_node(&mut self, node: Node) -> Result<(), MeshRefineError> {
        self.nodes.try_insert(node.id, node)
    }

    /// Add a node from a raw id and position.
    pub fn add_node(&mut self, id: u64, position: [f64; 3]) -> Result<NodeId, MeshRefineError> {
        let id = NodeId::new(id)?;
        self.insert_node(Node::new(id, position))?;
        Ok(id)
    }

    /// Insert an element record.
    ///
    /// Connectivity is not checked against the node table here; use
    /// [`Mesh::validate`] once the model is complete.
    pub fn add_element(&mut self, element: Element) -> Result<(), MeshRefineError> {
        self.elements.try_insert(element.id, element)
    }

    /// Add a triangular shell with default shell attributes.
    pub fn add_tri3(
        &mut self,
        id: u64,
        property_id: u32,
        nodes: [u64; 3],
    ) -> Result<ElementId, MeshRefineError> {
        self.add_shell(id, nodes, |nodes| {
            ElementKind::Tri3(Tri3 {
                nodes,
                shell: ShellAttributes::new(property_id),
                corner_thickness: [None; 3],
            })
        })
    }

    /// Add a quadrilateral shell with default shell attributes.
    pub fn add_quad4(
        &mut self,
        id: u64,
        property_id: u32,
        nodes: [u64; 4],
    ) -> Result<ElementId, MeshRefineError> {
        self.add_shell(id, nodes, |nodes| {
            ElementKind::Quad4(Quad4 {
                nodes,
                shell: ShellAttributes::new(property_id),
                corner_thickness: [None; 4],
            })
        })
    }

    fn add_shell<const N: usize>(
        &mut self,
        id: u64,
        nodes: [u64; N],
        build: impl FnOnce([NodeId; N]) -> ElementKind,
    ) -> Result<ElementId, MeshRefineError> {
        let id = ElementId::new(id)?;
        let nodes = node_ids(nodes)?;
        self.add_element(Element::new(id, build(nodes)))?;
        Ok(id)
    }

    /// Add a line element without pins or end offsets.
    pub fn add_line2(
        &mut self,
        id: u64,
        property_id: u32,
        nodes: [u64; 2],
        orientation: BarOrientation,
    ) -> Result<ElementId, MeshRefineError> {
        let id = ElementId::new(id)?;
        let line = Line2::new(node_ids(nodes)?, property_id, orientation);
        self.add_element(Element::new(id, ElementKind::Line2(line)))?;
        Ok(id)
    }

    /// Add an element of a family without a subdivider.
    pub fn add_unsupported(
        &mut self,
        id: u64,
        card: &str,
        nodes: &[u64],
    ) -> Result<ElementId, MeshRefineError> {
        let id = ElementId::new(id)?;
        let nodes = nodes
            .iter()
            .map(|raw| NodeId::new(*raw))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_element(Element::new(
            id,
            ElementKind::Unsupported(UnsupportedElement {
                card: card.to_string(),
                nodes,
            }),
        ))?;
        Ok(id)
    }

    pub fn add_load(&mut self, load_set: u32, load: Load) {
        self.ancillary.loads.entry(load_set).or_default().push(load);
    }

    pub fn add_load_combination(&mut self, combination: LoadCombination) {
        self.ancillary
            .load_combinations
            .insert(combination.id, combination);
    }

    pub fn add_constraint(&mut self, constraint_set: u32, constraint: Constraint) {
        self.ancillary
            .constraints
            .entry(constraint_set)
            .or_default()
            .push(constraint);
    }

    /// Replace nodes and elements wholesale, discarding all ancillary data.
    ///
    /// Returns the amounts of ancillary data that were dropped.
    pub fn install(
        &mut self,
        nodes: Table<NodeId, Node>,
        elements: Table<ElementId, Element>,
    ) -> AncillaryCounts {
        let dropped = self.ancillary.counts();
        self.nodes = nodes;
        self.elements = elements;
        self.ancillary.clear();
        dropped
    }

    /// Validate every element and its node references.
    ///
    /// # Errors
    /// - [`MeshRefineError::InvalidElement`] for malformed attributes/connectivity.
    /// - [`MeshRefineError::MissingNode`] for references to unknown nodes.
    pub fn validate(&self) -> Result<(), MeshRefineError> {
        self.validate_invariants()?;
        for element in self.elements.values() {
            element.validate()?;
        }
        Ok(())
    }
}

impl NodePositions for Mesh {
    fn position(&self, node: NodeId) -> Option<[f64; 3]> {
        self.nodes.position(node)
    }
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Mesh invalid");
    }

    /// Tables are consistent and every referenced node exists.
    fn validate_invariants(&self) -> Result<(), MeshRefineError> {
        self.nodes.validate_invariants()?;
        self.elements.validate_invariants()?;
        for (id, element) in self.elements.iter() {
            let referenced = element.nodes().iter().copied().chain(element.auxiliary_nodes());
            for node in referenced {
                if !self.nodes.contains(node) {
                    return Err(MeshRefineError::MissingNode { element: id, node });
                }
            }
        }
        Ok(())
    }
}

fn node_ids<const N: usize>(raw: [u64; N]) -> Result<[NodeId; N], MeshRefineError> {
    let mut out = [NodeId::new(1)?; N];
    for (slot, r) in out.iter_mut().zip(raw) {
        *slot = NodeId::new(r)?;
    }
    Ok(out)
}

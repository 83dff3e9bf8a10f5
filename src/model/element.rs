//! Element records.
//!
//! Elements are a closed set of families ([`ElementKind`]) plus an
//! `Unsupported` catch-all, so every dispatch over element kinds is an
//! exhaustive `match`. Attributes that the refinement engine does not
//! interpret (property ids, material orientation, offsets) are carried
//! verbatim onto child elements.

use crate::mesh_error::MeshRefineError;
use crate::topology::cell_type::ElementFamily;
use crate::topology::point::{ElementId, NodeId};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Material orientation of a shell element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MaterialOrientation {
    /// Angle in degrees measured from the element's first edge.
    Angle(f64),
    /// Id of a coordinate system whose x-axis is projected onto the element.
    CoordinateSystem(u32),
}

impl Default for MaterialOrientation {
    fn default() -> Self {
        MaterialOrientation::Angle(0.0)
    }
}

/// Interpretation of per-corner thickness values.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ThicknessFlag {
    /// Corner thicknesses are absolute values.
    #[default]
    Absolute,
    /// Corner thicknesses are multipliers of the property thickness.
    Relative,
}

/// Attributes shared by triangular and quadrilateral shells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShellAttributes {
    pub property_id: u32,
    #[serde(default)]
    pub orientation: MaterialOrientation,
    #[serde(default)]
    pub z_offset: f64,
    #[serde(default)]
    pub thickness_flag: ThicknessFlag,
}

impl ShellAttributes {
    /// Attributes with default orientation, no offset, absolute thickness.
    pub fn new(property_id: u32) -> Self {
        Self {
            property_id,
            orientation: MaterialOrientation::default(),
            z_offset: 0.0,
            thickness_flag: ThicknessFlag::default(),
        }
    }

    fn validate(&self, element: ElementId) -> Result<(), MeshRefineError> {
        if self.property_id == 0 {
            return Err(invalid(element, "property id must be non-zero"));
        }
        if let MaterialOrientation::Angle(theta) = self.orientation {
            if !theta.is_finite() {
                return Err(invalid(element, "material orientation angle is not finite"));
            }
        }
        if !self.z_offset.is_finite() {
            return Err(invalid(element, "z-offset is not finite"));
        }
        Ok(())
    }
}

/// 3-node triangular shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tri3 {
    pub nodes: [NodeId; 3],
    pub shell: ShellAttributes,
    #[serde(default)]
    pub corner_thickness: [Option<f64>; 3],
}

/// 4-node quadrilateral shell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad4 {
    pub nodes: [NodeId; 4],
    pub shell: ShellAttributes,
    #[serde(default)]
    pub corner_thickness: [Option<f64>; 4],
}

/// Orientation of a line element's cross-section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BarOrientation {
    /// Orientation vector in the global frame.
    Vector([f64; 3]),
    /// Orientation given by the direction towards a node.
    Node(NodeId),
}

/// 2-node line element (bar/beam).
///
/// `pin_*` and `offset_*` only make sense at a true end of the original
/// element, so refinement keeps them on the outermost children and clears
/// them on newly created interior ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line2 {
    pub nodes: [NodeId; 2],
    pub property_id: u32,
    pub orientation: BarOrientation,
    /// Offset-vector interpretation flags, e.g. `"GGG"`.
    #[serde(default = "default_offset_convention")]
    pub offset_convention: String,
    #[serde(default)]
    pub pin_a: Option<u32>,
    #[serde(default)]
    pub pin_b: Option<u32>,
    #[serde(default)]
    pub offset_a: Option<[f64; 3]>,
    #[serde(default)]
    pub offset_b: Option<[f64; 3]>,
}

fn default_offset_convention() -> String {
    "GGG".to_string()
}

impl Line2 {
    /// Line element with no pins and no end offsets.
    pub fn new(nodes: [NodeId; 2], property_id: u32, orientation: BarOrientation) -> Self {
        Self {
            nodes,
            property_id,
            orientation,
            offset_convention: default_offset_convention(),
            pin_a: None,
            pin_b: None,
            offset_a: None,
            offset_b: None,
        }
    }
}

/// An element family without a subdivider (e.g. a solid).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedElement {
    /// Card name the element was read from, e.g. `"CHEXA"`.
    pub card: String,
    pub nodes: Vec<NodeId>,
}

/// Family-specific element payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Tri3(Tri3),
    Quad4(Quad4),
    Line2(Line2),
    Unsupported(UnsupportedElement),
}

/// An element: id plus family payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self { id, kind }
    }

    pub fn family(&self) -> ElementFamily {
        match &self.kind {
            ElementKind::Tri3(_) => ElementFamily::Tri3,
            ElementKind::Quad4(_) => ElementFamily::Quad4,
            ElementKind::Line2(_) => ElementFamily::Line2,
            ElementKind::Unsupported(_) => ElementFamily::Unsupported,
        }
    }

    /// Ordered connectivity.
    pub fn nodes(&self) -> &[NodeId] {
        match &self.kind {
            ElementKind::Tri3(e) => &e.nodes,
            ElementKind::Quad4(e) => &e.nodes,
            ElementKind::Line2(e) => &e.nodes,
            ElementKind::Unsupported(e) => &e.nodes,
        }
    }

    /// Nodes referenced beyond the connectivity (a bar's orientation node).
    pub fn auxiliary_nodes(&self) -> Option<NodeId> {
        match &self.kind {
            ElementKind::Line2(Line2 {
                orientation: BarOrientation::Node(g0),
                ..
            }) => Some(*g0),
            _ => None,
        }
    }

    /// Boundary edges in the element's own traversal order.
    ///
    /// Shells yield `(n1,n2), (n2,n3), ..., (nk,n1)`; a line yields its
    /// single `(n1,n2)`; unsupported elements yield nothing.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        match &self.kind {
            ElementKind::Tri3(e) => closed_loop(&e.nodes),
            ElementKind::Quad4(e) => closed_loop(&e.nodes),
            ElementKind::Line2(e) => vec![(e.nodes[0], e.nodes[1])],
            ElementKind::Unsupported(_) => Vec::new(),
        }
    }

    /// Checks connectivity and attribute sanity.
    ///
    /// # Errors
    /// [`MeshRefineError::InvalidElement`] describing the first problem found.
    pub fn validate(&self) -> Result<(), MeshRefineError> {
        if !self.nodes().iter().all_unique() {
            return Err(invalid(
                self.id,
                format!("connectivity {:?} repeats a node", self.nodes()),
            ));
        }
        match &self.kind {
            ElementKind::Tri3(e) => {
                e.shell.validate(self.id)?;
                validate_thickness(self.id, &e.corner_thickness)
            }
            ElementKind::Quad4(e) => {
                e.shell.validate(self.id)?;
                validate_thickness(self.id, &e.corner_thickness)
            }
            ElementKind::Line2(e) => validate_line(self.id, e),
            ElementKind::Unsupported(e) => {
                if e.card.trim().is_empty() {
                    return Err(invalid(self.id, "unsupported element without card name"));
                }
                Ok(())
            }
        }
    }
}

fn closed_loop(nodes: &[NodeId]) -> Vec<(NodeId, NodeId)> {
    nodes
        .iter()
        .copied()
        .circular_tuple_windows::<(NodeId, NodeId)>()
        .collect()
}

fn validate_thickness(element: ElementId, values: &[Option<f64>]) -> Result<(), MeshRefineError> {
    for t in values.iter().flatten() {
        if !t.is_finite() || *t < 0.0 {
            return Err(invalid(
                element,
                format!("corner thickness {t} is not a finite non-negative value"),
            ));
        }
    }
    Ok(())
}

fn validate_line(element: ElementId, line: &Line2) -> Result<(), MeshRefineError> {
    if line.property_id == 0 {
        return Err(invalid(element, "property id must be non-zero"));
    }
    match line.orientation {
        BarOrientation::Vector(v) => {
            if v.iter().any(|c| !c.is_finite()) || v.iter().all(|c| *c == 0.0) {
                return Err(invalid(element, "orientation vector must be finite and non-zero"));
            }
        }
        BarOrientation::Node(g0) => {
            if line.nodes.contains(&g0) {
                return Err(invalid(element, format!("orientation node {g0} is an end node")));
            }
        }
    }
    if line.offset_convention.len() != 3
        || !line.offset_convention.chars().all(|c| matches!(c, 'G' | 'B' | 'O'))
    {
        return Err(invalid(
            element,
            format!("offset convention {:?} is not three of G/B/O", line.offset_convention),
        ));
    }
    for offset in [line.offset_a, line.offset_b].into_iter().flatten() {
        if offset.iter().any(|c| !c.is_finite()) {
            return Err(invalid(element, "end offset is not finite"));
        }
    }
    Ok(())
}

fn invalid(element: ElementId, reason: impl Into<String>) -> MeshRefineError {
    MeshRefineError::InvalidElement {
        element,
        reason: reason.into(),
    }
}

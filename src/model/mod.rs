//! Mesh model: nodes, elements, and ancillary cards.

pub mod ancillary;
pub mod element;
pub mod mesh;
pub mod node;

pub use ancillary::{Ancillary, AncillaryCounts, Constraint, Load, LoadCombination};
pub use element::{
    BarOrientation, Element, ElementKind, Line2, MaterialOrientation, Quad4, ShellAttributes,
    ThicknessFlag, Tri3, UnsupportedElement,
};
pub use mesh::{Mesh, MeshRecord};
pub use node::Node;

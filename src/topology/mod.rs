//! Mesh topology: identifiers, element families, and refinement.
//!
//! - [`point`]: strongly typed node and element ids.
//! - [`cell_type`]: the element families the engine knows about.
//! - [`refine`]: edge registry, subdividers, and the refinement pass.

pub mod cell_type;
pub mod point;
pub mod refine;

pub use cell_type::ElementFamily;
pub use point::{ElementId, NodeId};

use crate::topology::point::NodeId;
use serde::{Deserialize, Serialize};

/// A grid point in the global rectangular frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: [f64; 3],
}

impl Node {
    pub fn new(id: NodeId, position: [f64; 3]) -> Self {
        Self { id, position }
    }
}

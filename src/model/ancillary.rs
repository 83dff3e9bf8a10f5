//! Loads, load combinations, and constraints.
//!
//! These cards reference node and element ids of a specific topology. The
//! refinement engine does not remap them; a refined mesh starts with empty
//! ancillary data and the dropped amounts are reported.

use crate::topology::point::{ElementId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single load entry of a load set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Load {
    /// Concentrated force at a node.
    Force {
        node: NodeId,
        scale: f64,
        direction: [f64; 3],
    },
    /// Concentrated moment at a node.
    Moment {
        node: NodeId,
        scale: f64,
        direction: [f64; 3],
    },
    /// Uniform pressure on shell elements.
    Pressure {
        elements: Vec<ElementId>,
        pressure: f64,
    },
    /// Acceleration field applied to the whole model.
    Gravity { scale: f64, direction: [f64; 3] },
}

/// Linear combination of load sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    pub id: u32,
    pub scale: f64,
    /// `(factor, load set id)` pairs.
    pub factors: Vec<(f64, u32)>,
}

/// Single-point constraint on a set of nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constrained degrees of freedom, e.g. `"123456"`.
    pub components: String,
    pub nodes: Vec<NodeId>,
}

/// Amounts of ancillary data, by kind.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AncillaryCounts {
    pub loads: usize,
    pub load_combinations: usize,
    pub constraints: usize,
}

impl AncillaryCounts {
    pub fn total(&self) -> usize {
        self.loads + self.load_combinations + self.constraints
    }
}

/// Topology-dependent data attached to a mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ancillary {
    /// Load set id → entries.
    #[serde(default)]
    pub loads: BTreeMap<u32, Vec<Load>>,
    #[serde(default)]
    pub load_combinations: BTreeMap<u32, LoadCombination>,
    /// Constraint set id → entries.
    #[serde(default)]
    pub constraints: BTreeMap<u32, Vec<Constraint>>,
}

impl Ancillary {
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty() && self.load_combinations.is_empty() && self.constraints.is_empty()
    }

    pub fn counts(&self) -> AncillaryCounts {
        AncillaryCounts {
            loads: self.loads.values().map(Vec::len).sum(),
            load_combinations: self.load_combinations.len(),
            constraints: self.constraints.values().map(Vec::len).sum(),
        }
    }

    pub fn clear(&mut self) {
        self.loads.clear();
        self.load_combinations.clear();
        self.constraints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_entries_per_set() {
        let n = NodeId::new(1).unwrap();
        let mut anc = Ancillary::default();
        anc.loads.entry(10).or_default().push(Load::Force {
            node: n,
            scale: 1.0,
            direction: [0.0, 0.0, 1.0],
        });
        anc.loads.entry(10).or_default().push(Load::Gravity {
            scale: 9.81,
            direction: [0.0, 0.0, -1.0],
        });
        anc.load_combinations.insert(
            20,
            LoadCombination {
                id: 20,
                scale: 1.0,
                factors: vec![(1.5, 10)],
            },
        );
        let counts = anc.counts();
        assert_eq!(counts.loads, 2);
        assert_eq!(counts.load_combinations, 1);
        assert_eq!(counts.total(), 3);
        anc.clear();
        assert!(anc.is_empty());
    }
}

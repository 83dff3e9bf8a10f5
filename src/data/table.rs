//! Table: insertion-ordered id → record storage.
//!
//! Node and element collections must iterate in the order the model was
//! built, never in hash order: the first element to visit an edge decides
//! which new node ids that edge receives, so a stable order is what makes a
//! refinement pass reproducible.
//!
//! `Table` keeps a lookup `map` for O(1) access plus an `order` vector for
//! deterministic iteration.
//!
//! # Invariants
//!
//! - Each key appears exactly once in `order`.
//! - `map` contains precisely the keys listed in `order`.
//!
//! These invariants are checked after mutations in debug builds and when the
//! `check-invariants` feature is enabled. They can also be verified manually via
//! [`validate_invariants`](DebugInvariants::validate_invariants).

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshRefineError;
use crate::topology::point::{ElementId, NodeId};
use std::collections::HashMap;
use std::hash::Hash;

/// Keys that can index a [`Table`].
pub trait TableKey: Copy + Eq + Hash + Ord + std::fmt::Debug {
    /// Error reported when this key is inserted twice.
    fn duplicate_error(self) -> MeshRefineError;
}

impl TableKey for NodeId {
    fn duplicate_error(self) -> MeshRefineError {
        MeshRefineError::DuplicateNode(self)
    }
}

impl TableKey for ElementId {
    fn duplicate_error(self) -> MeshRefineError {
        MeshRefineError::DuplicateElement(self)
    }
}

/// Insertion-ordered map from ids to records.
#[derive(Clone, Debug)]
pub struct Table<K, V> {
    map: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: TableKey, V> Table<K, V> {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Insert a brand-new record under `key`.
    ///
    /// # Errors
    /// Returns the key's duplicate error (e.g. [`MeshRefineError::DuplicateNode`])
    /// if `key` is already present; the table is left unchanged.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), MeshRefineError> {
        if self.map.contains_key(&key) {
            return Err(key.duplicate_error());
        }
        self.map.insert(key, value);
        self.order.push(key);
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_invariants();
        Ok(())
    }

    /// Record stored under `key`.
    #[inline]
    pub fn get(&self, key: K) -> Option<&V> {
        self.map.get(&key)
    }

    /// Returns true iff `key` is present.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.map.contains_key(&key)
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the table holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Records in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().map(move |k| &self.map[k])
    }

    /// `(key, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.order.iter().map(move |k| (*k, &self.map[k]))
    }

    /// Largest key, if any.
    pub fn max_key(&self) -> Option<K> {
        self.order.iter().copied().max()
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

#[cfg(test)]
impl<K: TableKey, V> FromIterator<(K, V)> for Table<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Table::new();
        for (k, v) in iter {
            table.try_insert(k, v).expect("test fixture keys are unique");
        }
        table
    }
}

impl<K: TableKey, V> DebugInvariants for Table<K, V> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Table invalid");
    }

    fn validate_invariants(&self) -> Result<(), MeshRefineError> {
        use std::collections::HashSet;

        let mut seen = HashSet::with_capacity(self.order.len());
        if let Some(&dup) = self.order.iter().find(|k| !seen.insert(**k)) {
            return Err(dup.duplicate_error());
        }
        if let Some(k) = self.order.iter().find(|k| !self.map.contains_key(*k)) {
            return Err(MeshRefineError::TableKeyMismatch(format!("{k:?} (ordered, no record)")));
        }
        if let Some(k) = self.map.keys().find(|k| !seen.contains(*k)) {
            return Err(MeshRefineError::TableKeyMismatch(format!("{k:?} (record, not ordered)")));
        }
        Ok(())
    }
}

//! Per-element `(r+1) × (r+1)` scratch grid of node ids.
//!
//! Subdividers write edge chains onto the border of the grid, fill the
//! interior, and then read children back out of it. Row 0 runs from the
//! element's first corner towards its second corner. A cell may be written
//! more than once (the corners are shared by two edges) as long as every
//! write agrees.

use crate::mesh_error::MeshRefineError;
use crate::topology::point::{ElementId, NodeId};

#[derive(Clone, Debug)]
pub struct LocalGrid {
    owner: ElementId,
    size: usize,
    cells: Vec<Option<NodeId>>,
}

impl LocalGrid {
    /// Empty grid for an element refined at `ratio`.
    pub fn new(owner: ElementId, ratio: u32) -> Self {
        let size = ratio as usize + 1;
        Self {
            owner,
            size,
            cells: vec![None; size * size],
        }
    }

    /// Index of the last row/column.
    pub fn last(&self) -> usize {
        self.size - 1
    }

    pub fn get(&self, row: usize, col: usize) -> Option<NodeId> {
        self.cells[row * self.size + col]
    }

    /// Assigned cell, or [`MeshRefineError::IncompleteGrid`].
    pub fn node(&self, row: usize, col: usize) -> Result<NodeId, MeshRefineError> {
        self.get(row, col).ok_or(MeshRefineError::IncompleteGrid {
            element: self.owner,
            row,
            col,
        })
    }

    /// Assign a cell.
    ///
    /// # Errors
    /// [`MeshRefineError::GridConflict`] if the cell already holds a
    /// different node.
    pub fn set(&mut self, row: usize, col: usize, node: NodeId) -> Result<(), MeshRefineError> {
        let slot = &mut self.cells[row * self.size + col];
        match *slot {
            Some(existing) if existing != node => Err(MeshRefineError::GridConflict {
                element: self.owner,
                row,
                col,
                existing,
                incoming: node,
            }),
            _ => {
                *slot = Some(node);
                Ok(())
            }
        }
    }

    /// Edge chains must span the grid exactly.
    fn check_chain(&self, chain: &[NodeId]) -> Result<(), MeshRefineError> {
        if chain.len() == self.size {
            Ok(())
        } else {
            Err(MeshRefineError::ChainLength {
                element: self.owner,
                expected: self.size,
                actual: chain.len(),
            })
        }
    }

    /// Write `chain` left to right along `row`.
    pub fn set_row(&mut self, row: usize, chain: &[NodeId]) -> Result<(), MeshRefineError> {
        self.check_chain(chain)?;
        for (col, node) in chain.iter().enumerate() {
            self.set(row, col, *node)?;
        }
        Ok(())
    }

    /// Write `chain` right to left along `row`.
    pub fn set_row_reversed(
        &mut self,
        row: usize,
        chain: &[NodeId],
    ) -> Result<(), MeshRefineError> {
        self.check_chain(chain)?;
        let last = self.last();
        for (k, node) in chain.iter().enumerate() {
            self.set(row, last - k, *node)?;
        }
        Ok(())
    }

    /// Write `chain` top to bottom along `col`.
    pub fn set_column(&mut self, col: usize, chain: &[NodeId]) -> Result<(), MeshRefineError> {
        self.check_chain(chain)?;
        for (row, node) in chain.iter().enumerate() {
            self.set(row, col, *node)?;
        }
        Ok(())
    }

    /// Write `chain` bottom to top along `col`.
    pub fn set_column_reversed(
        &mut self,
        col: usize,
        chain: &[NodeId],
    ) -> Result<(), MeshRefineError> {
        self.check_chain(chain)?;
        let last = self.last();
        for (k, node) in chain.iter().enumerate() {
            self.set(last - k, col, *node)?;
        }
        Ok(())
    }

    /// Write `chain` along the main diagonal, from `(last, last)` back to `(0, 0)`.
    pub fn set_diagonal_reversed(&mut self, chain: &[NodeId]) -> Result<(), MeshRefineError> {
        self.check_chain(chain)?;
        let last = self.last();
        for (k, node) in chain.iter().enumerate() {
            self.set(last - k, last - k, *node)?;
        }
        Ok(())
    }

    /// Unassigned cells in row-major order.
    pub fn unset_cells(&self) -> Vec<(usize, usize)> {
        (0..self.size)
            .flat_map(|row| (0..self.size).map(move |col| (row, col)))
            .filter(|&(row, col)| self.get(row, col).is_none())
            .collect()
    }

    /// The four corners of every grid cell, row-major:
    /// cell `(i, j)` → `[g(i,j), g(i,j+1), g(i+1,j+1), g(i+1,j)]`.
    ///
    /// # Errors
    /// [`MeshRefineError::IncompleteGrid`] if any cell is unassigned.
    pub fn sub_quads(&self) -> Result<Vec<[NodeId; 4]>, MeshRefineError> {
        let r = self.last();
        let mut quads = Vec::with_capacity(r * r);
        for i in 0..r {
            for j in 0..r {
                quads.push([
                    self.node(i, j)?,
                    self.node(i, j + 1)?,
                    self.node(i + 1, j + 1)?,
                    self.node(i + 1, j)?,
                ]);
            }
        }
        Ok(quads)
    }
}

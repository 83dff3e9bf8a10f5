//! r × r subdivision of 4-node quadrilateral shells.
//!
//! The quad maps onto an `(r+1)×(r+1)` [`LocalGrid`] with `n1` at `(0,0)`,
//! `n2` at `(0,r)`, `n3` at `(r,r)`, and `n4` at `(r,0)`. Edge chains fill the
//! border, in each edge's own traversal direction, and new nodes fill the
//! interior: the centroid for `r = 2`, bilinear points otherwise.

use crate::data::coordinates::{bilinear, centroid};
use crate::mesh_error::MeshRefineError;
use crate::model::{Element, ElementKind, Quad4};
use crate::topology::point::ElementId;
use crate::topology::refine::RefineContext;
use crate::topology::refine::check::{ShellGuard, corner_positions};
use crate::topology::refine::grid::LocalGrid;

/// Children of `quad`, row-major over the grid; the first reuses `parent`.
///
/// # Errors
/// - [`MeshRefineError::CornerCollision`] if the corners are not distinct.
/// - [`MeshRefineError::UnresolvedEdge`] for an edge missed by the pre-scan.
/// - [`MeshRefineError::GridConflict`] if two edge chains disagree on a corner.
/// - [`MeshRefineError::DegenerateNormal`] from the normal checks, and
///   [`MeshRefineError::InvertedElement`] when inversion is checked.
pub fn subdivide(
    ctx: &mut RefineContext<'_>,
    parent: ElementId,
    quad: &Quad4,
) -> Result<Vec<Element>, MeshRefineError> {
    let ratio = ctx.registry.ratio();
    let r = ratio as usize;
    let [n1, n2, n3, n4] = quad.nodes;
    let guard = ShellGuard::new(parent, quad.nodes, &*ctx.nodes, ctx.options)?;

    let mut grid = LocalGrid::new(parent, ratio);
    grid.set(0, 0, n1)?;
    grid.set(0, r, n2)?;
    grid.set(r, r, n3)?;
    grid.set(r, 0, n4)?;
    grid.set_row(0, &ctx.registry.resolve(parent, n1, n2)?)?;
    grid.set_column(r, &ctx.registry.resolve(parent, n2, n3)?)?;
    grid.set_row_reversed(r, &ctx.registry.resolve(parent, n3, n4)?)?;
    grid.set_column_reversed(0, &ctx.registry.resolve(parent, n4, n1)?)?;

    let corners = corner_positions(parent, quad.nodes, &*ctx.nodes)?;
    for (row, col) in grid.unset_cells() {
        let position = if r == 2 {
            centroid(&corners)
        } else {
            bilinear(&corners, col as f64 / r as f64, row as f64 / r as f64)
        };
        let node = ctx.nodes.allocate(position)?;
        grid.set(row, col, node)?;
    }

    let cells = grid.sub_quads()?;
    let mut children = Vec::with_capacity(cells.len());
    for corners in cells {
        let id = if children.is_empty() {
            parent
        } else {
            ctx.elements.allocate()?
        };
        guard.check(id, corners, &*ctx.nodes)?;
        children.push(Element::new(
            id,
            ElementKind::Quad4(Quad4 {
                nodes: corners,
                shell: quad.shell.clone(),
                corner_thickness: [None; 4],
            }),
        ));
    }
    log::debug!(
        "quad {parent} split into {} children ({} interior nodes)",
        children.len(),
        (r - 1) * (r - 1)
    );
    Ok(children)
}

//! 1 → 4 subdivision of 3-node triangular shells.
//!
//! The triangle is laid out on the upper triangle of a 3×3 [`LocalGrid`]:
//!
//! ```text
//!   (0,0) n1 ── (0,1) n4 ── (0,2) n2
//!                 (1,1) n6 ── (1,2) n5
//!                               (2,2) n3
//! ```
//!
//! Row 0 holds edge `n1 → n2`, the last column edge `n2 → n3`, and the
//! diagonal edge `n3 → n1` written back to front. Only ratio 2 is defined.

use crate::mesh_error::MeshRefineError;
use crate::model::{Element, ElementKind, Tri3};
use crate::topology::cell_type::ElementFamily;
use crate::topology::point::{ElementId, NodeId};
use crate::topology::refine::RefineContext;
use crate::topology::refine::check::ShellGuard;
use crate::topology::refine::grid::LocalGrid;

/// Children of `tri` in emission order; the first reuses `parent`.
///
/// # Errors
/// - [`MeshRefineError::UnsupportedRefinementRatio`] unless the ratio is 2.
/// - [`MeshRefineError::UnresolvedEdge`] for an edge missed by the pre-scan.
/// - [`MeshRefineError::CornerCollision`], [`MeshRefineError::GridConflict`],
///   [`MeshRefineError::DegenerateNormal`], [`MeshRefineError::InvertedElement`]
///   when the parent or a child is malformed.
pub fn subdivide(
    ctx: &mut RefineContext<'_>,
    parent: ElementId,
    tri: &Tri3,
) -> Result<Vec<Element>, MeshRefineError> {
    let ratio = ctx.registry.ratio();
    if ratio != 2 {
        return Err(MeshRefineError::UnsupportedRefinementRatio {
            family: ElementFamily::Tri3,
            ratio,
        });
    }
    let [n1, n2, n3] = tri.nodes;
    let guard = ShellGuard::new(parent, tri.nodes, &*ctx.nodes, ctx.options)?;

    let mut grid = LocalGrid::new(parent, ratio);
    grid.set_row(0, &ctx.registry.resolve(parent, n1, n2)?)?;
    grid.set_column(2, &ctx.registry.resolve(parent, n2, n3)?)?;
    grid.set_diagonal_reversed(&ctx.registry.resolve(parent, n3, n1)?)?;

    let mut children = Vec::with_capacity(4);
    for corners in templates(&grid)? {
        let id = if children.is_empty() {
            parent
        } else {
            ctx.elements.allocate()?
        };
        guard.check(id, corners, &*ctx.nodes)?;
        children.push(Element::new(
            id,
            ElementKind::Tri3(Tri3 {
                nodes: corners,
                shell: tri.shell.clone(),
                corner_thickness: [None; 3],
            }),
        ));
    }
    Ok(children)
}

/// Corner children `(n1,n4,n6)`, `(n4,n2,n5)`, `(n6,n5,n3)`, then the
/// centre child `(n4,n5,n6)`.
fn templates(grid: &LocalGrid) -> Result<[[NodeId; 3]; 4], MeshRefineError> {
    let n1 = grid.node(0, 0)?;
    let n4 = grid.node(0, 1)?;
    let n2 = grid.node(0, 2)?;
    let n6 = grid.node(1, 1)?;
    let n5 = grid.node(1, 2)?;
    let n3 = grid.node(2, 2)?;
    Ok([[n1, n4, n6], [n4, n2, n5], [n6, n5, n3], [n4, n5, n6]])
}

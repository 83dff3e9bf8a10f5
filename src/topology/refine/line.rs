//! Subdivision of 2-node line elements along their edge chain.

use crate::mesh_error::MeshRefineError;
use crate::model::{Element, ElementKind, Line2};
use crate::topology::point::ElementId;
use crate::topology::refine::RefineContext;

/// `ratio` consecutive segments of `line`; the first reuses `parent`.
///
/// End A attributes (`pin_a`, `offset_a`) stay on the first segment and end B
/// attributes on the last; interior ends get none.
///
/// # Errors
/// [`MeshRefineError::UnresolvedEdge`] / [`MeshRefineError::DegenerateEdge`]
/// from the edge lookup.
pub fn subdivide(
    ctx: &mut RefineContext<'_>,
    parent: ElementId,
    line: &Line2,
) -> Result<Vec<Element>, MeshRefineError> {
    let [a, b] = line.nodes;
    let chain = ctx.registry.resolve(parent, a, b)?;
    let last = chain.len() - 2;

    let mut children = Vec::with_capacity(chain.len() - 1);
    for (k, ends) in chain.windows(2).enumerate() {
        let id = if k == 0 {
            parent
        } else {
            ctx.elements.allocate()?
        };
        let child = Line2 {
            nodes: [ends[0], ends[1]],
            property_id: line.property_id,
            orientation: line.orientation,
            offset_convention: line.offset_convention.clone(),
            pin_a: if k == 0 { line.pin_a } else { None },
            pin_b: if k == last { line.pin_b } else { None },
            offset_a: if k == 0 { line.offset_a } else { None },
            offset_b: if k == last { line.offset_b } else { None },
        };
        children.push(Element::new(id, ElementKind::Line2(child)));
    }
    Ok(children)
}

//! Post-conditions shared by the shell subdividers.

use crate::data::coordinates::NodePositions;
use crate::geometry::quality::{dot, unit_normal, validate_shell_normal};
use crate::mesh_error::MeshRefineError;
use crate::topology::point::{ElementId, NodeId};
use crate::topology::refine::RefineOptions;
use itertools::Itertools;

/// Checks children of one shell against their parent.
///
/// With `check_normals`, parent and children must have a well-defined normal.
/// With `check_inversion`, children must also face the parent's side; a
/// degenerate normal is not an inversion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ShellGuard {
    parent: ElementId,
    check_normals: bool,
    check_inversion: bool,
    /// Parent unit normal, kept only for the inversion test.
    normal: Option<[f64; 3]>,
    tolerance: f64,
}

impl ShellGuard {
    /// Check the parent's corners and capture its normal.
    pub(crate) fn new<const N: usize>(
        parent: ElementId,
        corners: [NodeId; N],
        nodes: &impl NodePositions,
        options: &RefineOptions,
    ) -> Result<Self, MeshRefineError> {
        distinct(parent, &corners)?;
        let mut guard = Self {
            parent,
            check_normals: options.check_normals,
            check_inversion: options.check_inversion,
            normal: None,
            tolerance: options.normal_tolerance,
        };
        if guard.check_normals || guard.check_inversion {
            let normal = guard.normal_of(parent, corners, nodes)?;
            if guard.check_inversion {
                guard.normal = normal;
            }
        }
        Ok(guard)
    }

    /// Check one child: distinct corners, then the enabled normal tests.
    pub(crate) fn check<const N: usize>(
        &self,
        child: ElementId,
        corners: [NodeId; N],
        nodes: &impl NodePositions,
    ) -> Result<(), MeshRefineError> {
        distinct(child, &corners)?;
        if !self.check_normals && !self.check_inversion {
            return Ok(());
        }
        let normal = self.normal_of(child, corners, nodes)?;
        let inverted = match (self.normal, normal) {
            (Some(parent_normal), Some(normal)) => dot(parent_normal, normal) <= 0.0,
            _ => false,
        };
        if inverted {
            return Err(MeshRefineError::InvertedElement {
                element: child,
                parent: self.parent,
                nodes: corners.to_vec(),
            });
        }
        Ok(())
    }

    /// Unit normal of `element`; degenerate normals are an error only under
    /// `check_normals`.
    fn normal_of<const N: usize>(
        &self,
        element: ElementId,
        corners: [NodeId; N],
        nodes: &impl NodePositions,
    ) -> Result<Option<[f64; 3]>, MeshRefineError> {
        let positions = corner_positions(element, corners, nodes)?;
        if self.check_normals {
            validate_shell_normal(element, &corners, &positions, self.tolerance).map(Some)
        } else {
            Ok(unit_normal(&positions, self.tolerance))
        }
    }
}

pub(crate) fn distinct(element: ElementId, corners: &[NodeId]) -> Result<(), MeshRefineError> {
    if corners.iter().all_unique() {
        Ok(())
    } else {
        Err(MeshRefineError::CornerCollision {
            element,
            nodes: corners.to_vec(),
        })
    }
}

pub(crate) fn corner_positions<const N: usize>(
    element: ElementId,
    corners: [NodeId; N],
    nodes: &impl NodePositions,
) -> Result<[[f64; 3]; N], MeshRefineError> {
    nodes
        .positions(corners)
        .map_err(|node| MeshRefineError::MissingNode { element, node })
}

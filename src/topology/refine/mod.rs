//! Uniform refinement of line and shell meshes.
//!
//! A pass runs in two phases:
//!
//! 1. **Edge pre-scan.** Every edge of every refinable element is registered
//!    in an [`EdgeRegistry`], in element insertion order, creating the
//!    interior nodes of each edge exactly once.
//! 2. **Subdivision.** Elements are visited again in the same order and split
//!    by the subdivider of their family ([`tri`], [`quad`], [`line`]), which
//!    only read the registry.
//!
//! Shared edges therefore get the same nodes from both sides regardless of
//! the direction each element traverses them in.
//!
//! # Expected invariants
//! - Node and element ids of the input are unique (guaranteed by [`Mesh`]).
//! - Every node referenced by an element has a position.
//! - Shell connectivity is ordered around the element; children keep the
//!   parent's winding.
//!
//! Unsupported element kinds are left out of the refined mesh and reported
//! as [`UnsupportedElementWarning`]s. Loads, load combinations and
//! constraints refer to the old topology and are dropped.
//!
//! # Example
//! ```rust
//! use mesh_refine::model::Mesh;
//! use mesh_refine::topology::refine::RefineOptions;
//!
//! let mut mesh = Mesh::new();
//! mesh.add_node(1, [0.0, 0.0, 0.0])?;
//! mesh.add_node(2, [1.0, 0.0, 0.0])?;
//! mesh.add_node(3, [1.0, 1.0, 0.0])?;
//! mesh.add_node(4, [0.0, 1.0, 0.0])?;
//! mesh.add_quad4(1, 1, [1, 2, 3, 4])?;
//!
//! let report = mesh.refine(&RefineOptions::default())?;
//! assert_eq!(mesh.elements().len(), 4);
//! assert_eq!(report.new_nodes, 5);
//! # Ok::<(), mesh_refine::mesh_error::MeshRefineError>(())
//! ```

pub mod alloc;
pub(crate) mod check;
pub mod edge;
pub mod grid;
pub mod line;
pub mod quad;
pub mod tri;

use crate::data::table::Table;
use crate::debug_invariants::DebugInvariants;
use crate::geometry::quality::DEFAULT_NORMAL_TOLERANCE;
use crate::mesh_error::MeshRefineError;
use crate::model::{Ancillary, AncillaryCounts, Element, ElementKind, Mesh};
use crate::topology::cell_type::ElementFamily;
use crate::topology::point::ElementId;
use self::alloc::{ElementAllocator, NodeAllocator};
use self::edge::EdgeRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Largest accepted refinement ratio. A quad yields `ratio²` children.
pub const MAX_REFINEMENT_RATIO: u32 = 1024;

/// Settings for a refinement pass.
///
/// Missing fields take their defaults when deserialized, so
/// `{"ratio": 3}` is a complete configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Number of segments each edge is split into. Triangles support 2 only.
    pub ratio: u32,
    /// Reject parents and children whose normal is degenerate.
    pub check_normals: bool,
    /// Reject children facing away from their parent. Off by default, since
    /// a concave quad can legitimately produce such children.
    pub check_inversion: bool,
    /// Relative tolerance for degenerate normals, see [`crate::geometry::quality`].
    pub normal_tolerance: f64,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            ratio: 2,
            check_normals: true,
            check_inversion: false,
            normal_tolerance: DEFAULT_NORMAL_TOLERANCE,
        }
    }
}

impl RefineOptions {
    pub fn with_ratio(mut self, ratio: u32) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_check_normals(mut self, check: bool) -> Self {
        self.check_normals = check;
        self
    }

    pub fn with_check_inversion(mut self, check: bool) -> Self {
        self.check_inversion = check;
        self
    }

    pub fn with_normal_tolerance(mut self, tolerance: f64) -> Self {
        self.normal_tolerance = tolerance;
        self
    }

    /// # Errors
    /// - [`MeshRefineError::InvalidRefinementRatio`] if `ratio < 2`.
    /// - [`MeshRefineError::InvalidOptions`] if `ratio` exceeds
    ///   [`MAX_REFINEMENT_RATIO`] or the tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), MeshRefineError> {
        if self.ratio < 2 {
            return Err(MeshRefineError::InvalidRefinementRatio(self.ratio));
        }
        if self.ratio > MAX_REFINEMENT_RATIO {
            return Err(MeshRefineError::InvalidOptions(format!(
                "refinement ratio {} exceeds the maximum of {MAX_REFINEMENT_RATIO}",
                self.ratio
            )));
        }
        if !self.normal_tolerance.is_finite() || self.normal_tolerance < 0.0 {
            return Err(MeshRefineError::InvalidOptions(format!(
                "normal tolerance {} must be finite and non-negative",
                self.normal_tolerance
            )));
        }
        Ok(())
    }
}

/// An element that was left out of the refined mesh.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct UnsupportedElementWarning {
    pub element: ElementId,
    /// Card name of the skipped element, e.g. `"CHEXA"`.
    pub card: String,
}

impl fmt::Display for UnsupportedElementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "element {} ({}) has no subdivider and was skipped",
            self.element, self.card
        )
    }
}

/// Summary of a refinement pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RefineReport {
    pub ratio: u32,
    /// Parent elements refined, per family.
    pub refined: BTreeMap<ElementFamily, usize>,
    /// Child elements produced, per family.
    pub produced: BTreeMap<ElementFamily, usize>,
    /// Nodes created (edge interiors plus quad interiors).
    pub new_nodes: usize,
    /// Element ids issued beyond the reused parent ids.
    pub new_elements: usize,
    /// Distinct edges seen by the pre-scan.
    pub edges: usize,
    pub skipped: Vec<UnsupportedElementWarning>,
    /// Ancillary data that referred to the old topology.
    pub dropped: AncillaryCounts,
}

impl RefineReport {
    /// Total number of produced elements.
    pub fn produced_total(&self) -> usize {
        self.produced.values().sum()
    }
}

/// A refined mesh plus the report of the pass that produced it.
#[derive(Clone, Debug)]
pub struct Refinement {
    pub mesh: Mesh,
    pub report: RefineReport,
}

/// State shared by the subdividers during one pass.
///
/// The registry is frozen after the pre-scan; the allocators keep issuing
/// ids for interior nodes and extra children.
pub struct RefineContext<'a> {
    pub registry: &'a EdgeRegistry,
    pub nodes: &'a mut NodeAllocator,
    pub elements: &'a mut ElementAllocator,
    pub options: &'a RefineOptions,
}

/// Refine every supported element of `mesh` uniformly.
///
/// The input is not modified. The returned mesh keeps every original node,
/// adds the new ones after them, holds the children of each element in
/// parent order, and carries no ancillary data.
///
/// # Errors
/// - Configuration: [`MeshRefineError::InvalidRefinementRatio`],
///   [`MeshRefineError::InvalidOptions`],
///   [`MeshRefineError::UnsupportedRefinementRatio`] (triangles at ratio ≠ 2).
/// - Topology: [`MeshRefineError::MissingNode`], [`MeshRefineError::DegenerateEdge`],
///   [`MeshRefineError::CornerCollision`], [`MeshRefineError::GridConflict`], ...
/// - Geometry: [`MeshRefineError::DegenerateNormal`], and
///   [`MeshRefineError::InvertedElement`] when `check_inversion` is set.
/// - Identifier: [`MeshRefineError::IdOverflow`].
pub fn refine_mesh(mesh: &Mesh, options: &RefineOptions) -> Result<Refinement, MeshRefineError> {
    options.validate()?;
    let has_triangles = mesh
        .elements()
        .values()
        .any(|e| e.family() == ElementFamily::Tri3);
    if options.ratio != 2 && has_triangles {
        return Err(MeshRefineError::UnsupportedRefinementRatio {
            family: ElementFamily::Tri3,
            ratio: options.ratio,
        });
    }
    mesh.validate_invariants()?;

    let mut nodes = NodeAllocator::new(mesh.nodes());
    let mut ids = ElementAllocator::new(mesh.elements());
    let registry = EdgeRegistry::build(
        mesh.elements()
            .values()
            .filter(|e| e.family() != ElementFamily::Unsupported),
        options.ratio,
        &mut nodes,
    )?;

    let mut report = RefineReport {
        ratio: options.ratio,
        edges: registry.len(),
        dropped: mesh.ancillary().counts(),
        ..RefineReport::default()
    };
    let capacity = mesh
        .elements()
        .values()
        .filter_map(|e| e.family().children_per_element(options.ratio))
        .sum();
    let mut elements = Table::with_capacity(capacity);

    let mut ctx = RefineContext {
        registry: &registry,
        nodes: &mut nodes,
        elements: &mut ids,
        options,
    };
    for element in mesh.elements().values() {
        let children = match &element.kind {
            ElementKind::Tri3(tri) => tri::subdivide(&mut ctx, element.id, tri)?,
            ElementKind::Quad4(quad) => quad::subdivide(&mut ctx, element.id, quad)?,
            ElementKind::Line2(line) => line::subdivide(&mut ctx, element.id, line)?,
            ElementKind::Unsupported(other) => {
                let warning = UnsupportedElementWarning {
                    element: element.id,
                    card: other.card.clone(),
                };
                log::warn!("{warning}");
                report.skipped.push(warning);
                continue;
            }
        };
        let family = element.family();
        *report.refined.entry(family).or_insert(0) += 1;
        *report.produced.entry(family).or_insert(0) += children.len();
        insert_children(&mut elements, children)?;
    }

    report.new_nodes = nodes.issued();
    report.new_elements = ids.issued();
    if report.dropped.total() > 0 {
        log::warn!(
            "dropped {} loads, {} load combinations and {} constraints tied to the old topology",
            report.dropped.loads,
            report.dropped.load_combinations,
            report.dropped.constraints
        );
    }

    let refined = Mesh::from_parts(nodes.into_nodes(), elements, Ancillary::default());
    crate::debug_invariants!(refined.validate_invariants(), "refined mesh invalid");
    log::info!(
        "refined {} elements into {} at ratio {} ({} new nodes, {} edges, {} skipped)",
        report.refined.values().sum::<usize>(),
        report.produced_total(),
        report.ratio,
        report.new_nodes,
        report.edges,
        report.skipped.len()
    );
    Ok(Refinement {
        mesh: refined,
        report,
    })
}

fn insert_children(
    table: &mut Table<ElementId, Element>,
    children: Vec<Element>,
) -> Result<(), MeshRefineError> {
    for child in children {
        table.try_insert(child.id, child)?;
    }
    Ok(())
}

impl Mesh {
    /// Refine this mesh in place.
    ///
    /// Runs [`refine_mesh`] and installs the result only on success; on
    /// error the mesh is left exactly as it was.
    pub fn refine(&mut self, options: &RefineOptions) -> Result<RefineReport, MeshRefineError> {
        let Refinement { mesh, report } = refine_mesh(self, options)?;
        let (nodes, elements, _) = mesh.into_parts();
        self.install(nodes, elements);
        Ok(report)
    }
}

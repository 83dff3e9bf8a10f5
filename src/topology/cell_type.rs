//! Element family metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element families known to the refinement engine.
///
/// `Unsupported` groups every element kind that has no subdivider
/// (solids, springs, masses, ...).
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ElementFamily {
    /// 2-node line (bar/beam).
    Line2,
    /// 3-node triangular shell.
    Tri3,
    /// 4-node quadrilateral shell.
    Quad4,
    /// Any element without a subdivider.
    Unsupported,
}

impl ElementFamily {
    /// Children produced per parent element at refinement ratio `ratio`;
    /// `None` for families that are skipped or cannot refine at `ratio`.
    pub fn children_per_element(self, ratio: u32) -> Option<usize> {
        let r = ratio as usize;
        match self {
            ElementFamily::Line2 => Some(r),
            ElementFamily::Tri3 if ratio == 2 => Some(4),
            ElementFamily::Tri3 => None,
            ElementFamily::Quad4 => Some(r * r),
            ElementFamily::Unsupported => None,
        }
    }
}

impl fmt::Display for ElementFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementFamily::Line2 => "Line2",
            ElementFamily::Tri3 => "Tri3",
            ElementFamily::Quad4 => "Quad4",
            ElementFamily::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

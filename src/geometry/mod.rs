//! Geometry utilities for mesh-refine.
//!
//! This module provides the shell normal and area helpers used to reject
//! degenerate or inverted elements during refinement.

pub mod quality;

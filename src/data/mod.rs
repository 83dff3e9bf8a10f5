//! Data module: ordered record tables and node positions
#![warn(missing_docs)]

pub mod coordinates;
pub mod table;

pub use coordinates::NodePositions;
pub use table::{Table, TableKey};

//! `NodeId` and `ElementId`: strong, zero-cost handles for mesh entities
//!
//! Every node and every element of a mesh carries a positive integer id, as
//! in card-based finite-element decks. Both handles wrap a `NonZeroU64` so 0
//! stays reserved as an invalid or sentinel value, and so that node and
//! element ids can never be mixed up at a call site.
//!
//! This module provides:
//! - Transparent newtypes around `NonZeroU64` with the layout of a `u64`.
//! - Fallible constructors and cheap accessors.
//! - Implementations of common traits (`Debug`, `Display`, ordering,
//!   hashing, serde) so ids can be used in maps, sets, and printed easily.

use crate::mesh_error::MeshRefineError;
use std::{fmt, num::NonZeroU64};

macro_rules! mesh_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "u64", into = "u64")]
        #[repr(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Creates a new id from a raw `u64` value.
            ///
            /// # Errors
            /// Returns [`MeshRefineError::InvalidId`] if `raw == 0`.
            #[inline]
            pub fn new(raw: u64) -> Result<Self, MeshRefineError> {
                NonZeroU64::new(raw)
                    .map($name)
                    .ok_or(MeshRefineError::InvalidId)
            }

            /// Returns the inner `u64` value.
            #[inline]
            pub const fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl TryFrom<u64> for $name {
            type Error = MeshRefineError;

            fn try_from(raw: u64) -> Result<Self, Self::Error> {
                Self::new(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.get()).finish()
            }
        }

        /// Prints only the raw integer.
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.get())
            }
        }
    };
}

mesh_id!(
    /// Identifier of a node (grid point).
    NodeId
);

mesh_id!(
    /// Identifier of an element.
    ElementId
);

//! Identifier newtypes.
//!
//! [`NodeId`] and [`EdgeId`] are the durable, monotonically increasing 64-bit
//! identifiers allocated by the store (§3: "id 0 is reserved as 'none'").
//! [`LabelId`]/[`EdgeTypeId`] are process-local interned ids the store uses
//! internally to keep label and edge-type names out of every node/edge
//! record; callers never see them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($name:ident, $repr:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name($repr);

        impl $name {
            /// The reserved "none" sentinel value.
            pub const NONE: Self = Self(0);

            /// Constructs an id from its raw representation.
            #[must_use]
            pub const fn new(raw: $repr) -> Self {
                Self(raw)
            }

            /// Returns the raw representation.
            #[must_use]
            pub const fn get(self) -> $repr {
                self.0
            }

            /// Returns `false` for the reserved "none" id.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NONE
            }
        }
    };
}

id_type!(NodeId, u64, "A node identifier. 0 is reserved and never allocated.");
id_type!(EdgeId, u64, "An edge identifier. 0 is reserved and never allocated.");
id_type!(LabelId, u32, "An interned label id, internal to the store.");
id_type!(EdgeTypeId, u32, "An interned edge-type id, internal to the store.");

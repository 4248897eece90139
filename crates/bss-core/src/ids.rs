//! Strongly typed identifier wrappers.
//!
//! Station ids are the operator's bikepoint numbers, so they are sparse and
//! never used as `Vec` indices directly; the `Network` arena in
//! `bss-station` maps them to slots.  All ids are `Copy + Ord + Hash` so they
//! can be used as map keys and sorted collection elements without ceremony.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw identifier value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Operator identifier of a docking station (bikepoint).
    pub struct StationId(u32);
}

typed_id! {
    /// Identifier of a shared overflow warehouse.
    pub struct WarehouseId(u16);
}

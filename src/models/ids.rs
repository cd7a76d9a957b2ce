//! Typed identifiers for marketplace entities.
//!
//! Every entity gets its own newtype over `Uuid` so that a booking id can
//! never be passed where a listing id is expected. Ids are generated by the
//! repository on insert, like a database default.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Raw uuid value.
            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of an authenticated user (owned by the external auth system).
    UserId
);
entity_id!(
    /// Identifier of a host profile.
    HostId
);
entity_id!(
    /// Identifier of a tutor profile.
    TutorId
);
entity_id!(
    /// Identifier of a listing.
    ListingId
);
entity_id!(
    /// Identifier of a booking.
    BookingId
);

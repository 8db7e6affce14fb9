//! Opaque identifier types.
//!
//! The simulation names everything with strings. Object ids, receptacle ids
//! and object types are kept as distinct types so one can't be used as a key
//! where the other is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Raw identifier string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of any simulated object
    ObjectId
);

string_id!(
    /// Identifier of an object acting as a receptacle
    ReceptacleId
);

string_id!(
    /// Object category, e.g. `Mug` or `Cabinet`
    ObjectType
);

impl ObjectId {
    /// View this object as a receptacle.
    ///
    /// Only valid for objects the simulation flags as receptacles.
    pub fn as_receptacle(&self) -> ReceptacleId {
        ReceptacleId(self.0.clone())
    }
}

impl ReceptacleId {
    /// The receptacle's id in the general object namespace
    pub fn as_object(&self) -> ObjectId {
        ObjectId(self.0.clone())
    }
}

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// A course category. `CategoryId::TOP` marks "no parent".
    CategoryId
);
entity_id!(CourseId);
entity_id!(SectionId);
entity_id!(ActivityId);
entity_id!(UserId);

impl CategoryId {
    /// Sentinel parent for top-level categories.
    pub const TOP: Self = Self(0);
}

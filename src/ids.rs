//! Identifiers
//!
//! String identifiers for the entities the engine looks up through its
//! collaborators. Each is a distinct type so a product id can never be passed
//! where a discount id is expected.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
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
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Product identifier
    ProductId
}

string_id! {
    /// Discount rule identifier
    DiscountId
}

string_id! {
    /// Store identifier
    StoreId
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;

    #[test]
    fn display_matches_inner_string() {
        assert_eq!(ProductId::new("apple").to_string(), "apple", "display");
        assert_eq!(DiscountId::from("d-1").as_str(), "d-1", "as_str");
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = FxHashMap::default();
        map.insert(StoreId::from("store-1"), 1);

        assert_eq!(map.get("store-1"), Some(&1), "borrowed str lookup");
    }
}

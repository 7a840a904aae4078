//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Cities and temperature readings each get their own ID type so a reading
//! ID can never be passed where a city ID is expected. IDs are generated
//! app-side as UUID v7 (time-ordered), which keeps primary key inserts
//! append-mostly and makes ID order follow creation order.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            /// Accepts every textual form [`Uuid::parse_str`] does:
            /// hyphenated, simple, braced and `urn:uuid:` prefixed.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a city.
    CityId
}

define_id! {
    /// Unique identifier for a single temperature reading.
    TemperatureId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_not_nil() {
        assert_ne!(CityId::new().into_inner(), Uuid::nil());
        assert_ne!(TemperatureId::new().into_inner(), Uuid::nil());
    }

    #[test]
    fn new_ids_are_time_ordered() {
        let first = CityId::new();
        let second = CityId::new();
        assert!(first < second);
    }

    #[test]
    fn id_serializes_as_bare_uuid_string() {
        let id = CityId::new();
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json, Some(format!("\"{}\"", id.into_inner())));
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = CityId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn parse_accepts_all_uuid_forms() {
        let id = CityId::new();
        let uuid = id.into_inner();
        let forms = [
            uuid.hyphenated().to_string(),
            uuid.simple().to_string(),
            uuid.braced().to_string(),
            uuid.urn().to_string(),
        ];
        for form in forms {
            assert_eq!(form.parse::<CityId>().ok(), Some(id), "form {form}");
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("invalid-uuid".parse::<CityId>().is_err());
        assert!("".parse::<CityId>().is_err());
        assert!("017a2fa4-e4c2-4704-82fe".parse::<CityId>().is_err());
    }
}

//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a random-UUID identifier: `Display`/`FromStr` as the hyphenated
/// form, serde as a bare string.
macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

uuid_id!(
    /// A sensor in the shared catalog.
    SensorId
);

uuid_id!(
    /// A programmable controller in the shared catalog.
    PlcId
);

uuid_id!(
    /// One live connection; tells a user's current socket from a superseded one.
    ConnectionId
);

uuid_id!(
    /// One published event.
    EventId
);

/// Identity of a user, taken from the subject of their bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-text location key identifying a place (usually a city name).
///
/// Surrounding whitespace is trimmed. A blank key is representable because
/// sensors may be drawn before a place is chosen for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlaceKey(String);

impl PlaceKey {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self(key.trim().to_string())
    }

    /// True when no place has been chosen.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlaceKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for PlaceKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PlaceKey> for String {
    fn from(key: PlaceKey) -> Self {
        key.0
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_ids_are_unique() {
        assert_ne!(SensorId::new(), SensorId::new());
    }

    #[test]
    fn plc_id_parses_with_surrounding_whitespace() {
        let uuid = Uuid::new_v4();
        let parsed: PlcId = format!(" {} ", uuid).parse().unwrap();
        assert_eq!(parsed.as_uuid(), &uuid);
    }

    #[test]
    fn plc_id_rejects_garbage() {
        assert!("plc-1".parse::<PlcId>().is_err());
    }

    #[test]
    fn user_id_rejects_blank_string() {
        match UserId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn user_id_decoding_applies_the_same_check() {
        assert!(serde_json::from_str::<UserId>(r#""  ""#).is_err());
        assert!(serde_json::from_str::<UserId>(r#""""#).is_err());

        let id: UserId = serde_json::from_str(r#""alice""#).unwrap();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""alice""#);
    }

    #[test]
    fn place_key_trims_and_detects_blank() {
        assert_eq!(PlaceKey::new("  Vienna ").as_str(), "Vienna");
        assert!(PlaceKey::new("   ").is_blank());
        assert!(!PlaceKey::new("Lyon").is_blank());
    }

    #[test]
    fn place_key_deserializes_trimmed() {
        let key: PlaceKey = serde_json::from_str(r#"" Berlin""#).unwrap();
        assert_eq!(key, PlaceKey::new("Berlin"));
        assert_eq!(serde_json::to_string(&key).unwrap(), r#""Berlin""#);
    }
}

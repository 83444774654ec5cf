//! Identifier wrappers shared by the pantry review crates.
//!
//! `PantryId` is an opaque, caller-supplied string that ends up in URL path
//! segments (ours and the backend's), so it is validated once at the boundary.
//! The remaining identifiers are server-minted UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Longest pantry identifier accepted.
pub const MAX_PANTRY_ID_LEN: usize = 128;

/// Error returned when parsing an identifier fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("pantry ID is empty")]
    EmptyPantryId,
    #[error("pantry ID is longer than {MAX_PANTRY_ID_LEN} characters")]
    PantryIdTooLong,
    #[error("pantry ID contains unsupported character {0:?}")]
    PantryIdCharacter(char),
    #[error("invalid {label}: {reason}")]
    Uuid { label: &'static str, reason: String },
}

/// Opaque identifier scoping uploads and drafts to one physical pantry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PantryId(String);

impl PantryId {
    /// Accepts 1..=128 characters from the URL "unreserved" set.
    pub fn parse(value: &str) -> Result<Self, IdParseError> {
        if value.is_empty() {
            return Err(IdParseError::EmptyPantryId);
        }
        if value.chars().count() > MAX_PANTRY_ID_LEN {
            return Err(IdParseError::PantryIdTooLong);
        }
        if let Some(bad) = value.chars().find(|ch| !is_unreserved(*ch)) {
            return Err(IdParseError::PantryIdCharacter(bad));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '~')
}

impl fmt::Display for PantryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PantryId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PantryId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PantryId> for String {
    fn from(value: PantryId) -> Self {
        value.0
    }
}

macro_rules! define_uuid_id {
    ($name:ident, $label:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn parse(value: &str) -> Result<Self, IdParseError> {
                let parsed = Uuid::parse_str(value).map_err(|e| IdParseError::Uuid {
                    label: $label,
                    reason: e.to_string(),
                })?;
                Ok(Self(parsed.to_string()))
            }

            pub fn as_str(&self) -> &str {
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
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

define_uuid_id!(SessionId, "session ID");
define_uuid_id!(PreviewId, "preview ID");
define_uuid_id!(RequestId, "request ID");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pantry_id_accepts_unreserved() {
        let id = PantryId::parse("p123_north-side.v2~a").unwrap();
        assert_eq!(id.as_str(), "p123_north-side.v2~a");
        assert_eq!(id.to_string(), "p123_north-side.v2~a");
    }

    #[test]
    fn test_pantry_id_rejects_path_characters() {
        assert_eq!(
            PantryId::parse("p1/../admin"),
            Err(IdParseError::PantryIdCharacter('/'))
        );
        assert_eq!(
            PantryId::parse("p 1"),
            Err(IdParseError::PantryIdCharacter(' '))
        );
        assert_eq!(PantryId::parse(""), Err(IdParseError::EmptyPantryId));
    }

    #[test]
    fn test_pantry_id_length_limit() {
        let ok = "a".repeat(MAX_PANTRY_ID_LEN);
        assert!(PantryId::parse(&ok).is_ok());
        let long = "a".repeat(MAX_PANTRY_ID_LEN + 1);
        assert_eq!(PantryId::parse(&long), Err(IdParseError::PantryIdTooLong));
    }

    #[test]
    fn test_pantry_id_serde_validates() {
        let id: PantryId = serde_json::from_str("\"p123\"").unwrap();
        assert_eq!(id.as_str(), "p123");
        assert!(serde_json::from_str::<PantryId>("\"bad id\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p123\"");
    }

    #[test]
    fn test_uuid_ids_are_unique_and_parse() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(SessionId::parse(a.as_str()).unwrap(), a);
        assert!(PreviewId::parse("not-a-uuid").is_err());
    }
}

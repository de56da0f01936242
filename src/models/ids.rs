//! Identifier type for FAQ entries
//!
//! Entry ids are opaque strings. New entries get a UUID v4; documents written
//! by older tooling may carry short numeric ids, which the codec normalizes to
//! their decimal text before they ever reach this type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a FAQ entry within one environment's document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaqId(String);

impl FaqId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FaqId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FaqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FaqId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl From<&str> for FaqId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let id1 = FaqId::new();
        let id2 = FaqId::new();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(id1.as_str()).is_ok());
    }

    #[test]
    fn test_legacy_numeric_id() {
        let id: FaqId = " 17 ".parse().unwrap();
        assert_eq!(id.as_str(), "17");
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn test_id_serialization_is_plain_string() {
        let id = FaqId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}

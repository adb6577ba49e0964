//! Document identifiers.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not a valid document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document id: {0}")]
pub struct IdError(pub String);

/// Identifier of a stored document (12-byte object id).
///
/// Travels over the wire as a 24-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Generate a new identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a hex string into an identifier.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        ObjectId::parse_str(s.trim())
            .map(Self)
            .map_err(|_| IdError(s.to_string()))
    }

    /// Hex representation.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Underlying object id, for store adapters.
    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for DocumentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentIdVisitor)
    }
}

struct DocumentIdVisitor;

impl<'de> Visitor<'de> for DocumentIdVisitor {
    type Value = DocumentId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a 24-character hex object id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        DocumentId::parse(v).map_err(E::custom)
    }

    // Extended JSON form: {"$oid": "<hex>"}
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut hex: Option<String> = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "$oid" {
                hex = Some(map.next_value()?);
            } else {
                map.next_value::<de::IgnoredAny>()?;
            }
        }
        let hex = hex.ok_or_else(|| de::Error::missing_field("$oid"))?;
        DocumentId::parse(&hex).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_hex() {
        let id = DocumentId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DocumentId::parse("not-an-id").is_err());
        assert!(DocumentId::parse("").is_err());
        assert!("65a1b2c3d4e5f60718293a4".parse::<DocumentId>().is_err());
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let id = DocumentId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("65a1b2c3d4e5f60718293a4b"));
    }

    #[test]
    fn test_deserializes_extended_json() {
        let id: DocumentId =
            serde_json::from_value(serde_json::json!({ "$oid": "65a1b2c3d4e5f60718293a4b" }))
                .unwrap();
        assert_eq!(id.to_hex(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_new_ids_are_ordered() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert!(a < b);
    }
}

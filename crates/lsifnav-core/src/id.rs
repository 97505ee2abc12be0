//! Graph identifiers.
//!
//! LSIF dumps encode the same vertex id either as a JSON number or as a
//! string of decimal digits, sometimes both within one file. Everything
//! past the decoding boundary works with the canonical [`Id`].

use crate::error::IdError;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical graph identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id(u64);

impl Id {
    /// Creates an identifier from its numeric value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Normalizes a raw JSON token.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, IdError> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(Self(v))
                } else if let Some(v) = n.as_i64() {
                    Err(IdError::Negative(v))
                } else {
                    Err(IdError::WrongType("float"))
                }
            }
            serde_json::Value::String(s) => s.parse(),
            serde_json::Value::Null => Err(IdError::WrongType("null")),
            serde_json::Value::Bool(_) => Err(IdError::WrongType("boolean")),
            serde_json::Value::Array(_) => Err(IdError::WrongType("array")),
            serde_json::Value::Object(_) => Err(IdError::WrongType("object")),
        }
    }

    /// Big-endian key bytes, so byte order matches numeric order.
    pub fn to_key(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Inverse of [`Id::to_key`]. Returns `None` for slices of the wrong length.
    pub fn from_key(key: &[u8]) -> Option<Self> {
        let bytes: [u8; 8] = key.try_into().ok()?;
        Some(Self(u64::from_be_bytes(bytes)))
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u64::from_str accepts a leading '+', LSIF never emits one
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::NotNumeric(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| IdError::NotNumeric(s.to_string()))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Binary formats (the range store) carry a plain u64.
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(IdVisitor)
        } else {
            deserializer.deserialize_u64(IdVisitor)
        }
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string of decimal digits")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Id, E> {
        Ok(Id(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Id, E> {
        u64::try_from(v)
            .map(Id)
            .map_err(|_| E::custom(IdError::Negative(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
        v.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_and_string_normalize_equal() {
        for n in [0u64, 1, 42, 4_294_967_296, u64::MAX] {
            let from_number: Id = serde_json::from_value(json!(n)).unwrap();
            let from_string: Id = serde_json::from_value(json!(n.to_string())).unwrap();
            assert_eq!(from_number, from_string);
            assert_eq!(from_number.get(), n);
        }
    }

    #[test]
    fn test_from_value_rejects_malformed() {
        assert!(matches!(
            Id::from_value(&json!(-3)),
            Err(IdError::Negative(-3))
        ));
        assert!(matches!(
            Id::from_value(&json!("abc")),
            Err(IdError::NotNumeric(_))
        ));
        assert!(matches!(
            Id::from_value(&json!("-3")),
            Err(IdError::NotNumeric(_))
        ));
        assert!(matches!(
            Id::from_value(&json!("+3")),
            Err(IdError::NotNumeric(_))
        ));
        assert!(matches!(
            Id::from_value(&json!(1.5)),
            Err(IdError::WrongType("float"))
        ));
        assert!(matches!(
            Id::from_value(&json!(true)),
            Err(IdError::WrongType("boolean"))
        ));
        assert!(Id::from_value(&json!(null)).is_err());
        assert!(Id::from_value(&json!([1])).is_err());
    }

    #[test]
    fn test_deserialize_rejects_malformed() {
        assert!(serde_json::from_str::<Id>("-1").is_err());
        assert!(serde_json::from_str::<Id>("\"12a\"").is_err());
        assert!(serde_json::from_str::<Id>("\"\"").is_err());
        assert!(serde_json::from_str::<Id>("2.5").is_err());
        assert!(serde_json::from_str::<Id>("{}").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let id: Id = serde_json::from_str("\"15\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "15");
    }

    #[test]
    fn test_key_order_matches_numeric_order() {
        let small = Id::new(255).to_key();
        let large = Id::new(256).to_key();
        assert!(small < large);
        assert_eq!(Id::from_key(&large), Some(Id::new(256)));
        assert_eq!(Id::from_key(&[1, 2, 3]), None);
    }
}

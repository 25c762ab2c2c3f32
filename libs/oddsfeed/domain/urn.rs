//! Resource identifiers of the form `prefix:type:id`

use crate::error::{FeedError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Resource identifier such as `sr:match:9536715`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Urn {
    prefix: String,
    kind: String,
    id: i64,
}

impl Urn {
    pub fn new(prefix: impl Into<String>, kind: impl Into<String>, id: i64) -> Self {
        Self {
            prefix: prefix.into(),
            kind: kind.into(),
            id,
        }
    }

    /// Urn of a sport, e.g. `sr:sport:6`
    pub fn sport(id: i64) -> Self {
        Self::new("sr", "sport", id)
    }

    /// Parse `prefix:type:id`
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.trim().split(':');
        let (prefix, kind, id) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(kind), Some(id), None) => (prefix, kind, id),
            _ => {
                return Err(FeedError::InvalidFormat(format!(
                    "'{}' is not a valid urn (expected prefix:type:id)",
                    value
                )))
            }
        };

        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(FeedError::InvalidFormat(format!(
                "urn '{}' has an invalid prefix",
                value
            )));
        }

        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FeedError::InvalidFormat(format!(
                "urn '{}' has an invalid type",
                value
            )));
        }

        let id = id.parse::<i64>().map_err(|_| {
            FeedError::InvalidFormat(format!("urn '{}' has a non-numeric id", value))
        })?;

        Ok(Self::new(prefix, kind, id))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The type segment (`match`, `stage`, `sport`, ...)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.prefix, self.kind, self.id)
    }
}

impl FromStr for Urn {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Urn {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Urn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Urn::parse(&raw).map_err(serde::de::Error::custom)
    }
}

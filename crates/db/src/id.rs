use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a stored book: a 12-byte ObjectId rendered as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(ObjectId);

/// The raw value did not match the identifier format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid book id")]
pub struct InvalidBookId(pub String);

impl BookId {
    /// Generate a fresh, never-before-issued identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.len() != 24 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(InvalidBookId(raw.to_string()));
        }
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidBookId(raw.to_string()))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<ObjectId> for BookId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

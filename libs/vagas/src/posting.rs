//! Posting data model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Store-assigned posting identifier.
///
/// Identifiers are monotonic integers. A store never hands out the same
/// value twice, even after the posting that held it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PostingId(i64);

impl PostingId {
    /// Creates a new PostingId from an i64.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PostingId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<PostingId> for i64 {
    fn from(id: PostingId) -> Self {
        id.0
    }
}

impl FromStr for PostingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl Serialize for PostingId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for PostingId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self(id))
    }
}

/// The five fields of a posting, holding normalized values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingFields {
    /// Job title, upper-cased.
    pub titulo: String,

    /// Company name, first letter capitalized.
    pub empresa: String,

    /// Contact phone, always starting with the "19" area code.
    pub telefone: String,

    /// Free-text description.
    pub descricao: String,

    /// Company contact email.
    pub email: String,
}

/// A persisted posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub id: PostingId,

    #[serde(flatten)]
    pub fields: PostingFields,
}

impl Posting {
    pub fn new(id: PostingId, fields: PostingFields) -> Self {
        Self { id, fields }
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.titulo)
    }
}

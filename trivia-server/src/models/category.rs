//! Category records and category references

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Categories seeded into a fresh store
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

/// Category record
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Category {
    pub id: i32,
    /// Display label
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
}

impl Category {
    /// Text form of the id, as stored in `Question::category`.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

/// Category id -> label, serialized as a JSON object ordered by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryMap(BTreeMap<i32, String>);

impl CategoryMap {
    pub fn get(&self, id: i32) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Category> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self(iter.into_iter().map(|c| (c.id, c.kind)).collect())
    }
}

/// Reference to a category as clients send it: a number or its string form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(i64),
    Text(String),
}

impl CategoryRef {
    /// False for `0` and `""`, the values treated as "not provided".
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Id(id) => *id != 0,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Resolve to an integer category id.
    pub fn id(&self, field: &'static str) -> Result<i32, ValidationError> {
        let invalid = ValidationError::InvalidFormat {
            field,
            reason: "must be an integer",
        };
        match self {
            Self::Id(id) => i32::try_from(*id).map_err(|_| invalid),
            Self::Text(s) => s.trim().parse::<i32>().map_err(|_| invalid),
        }
    }

    /// Text stored in `Question::category`.
    pub fn into_text(self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Text(s) => s,
        }
    }
}

//! Data models for shelf
//!
//! Defines the catalog record (`Book`), its lending `Status`, and the
//! closed set of `SearchField`s a book can be searched by.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Lending status of a book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Status {
    /// On the shelf
    #[default]
    #[serde(rename = "in stock")]
    InStock,
    /// Lent out
    #[serde(rename = "checked out")]
    CheckedOut,
}

impl Status {
    /// Every status, in display order
    pub const ALL: [Status; 2] = [Status::InStock, Status::CheckedOut];

    /// The canonical stored string
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InStock => "in stock",
            Status::CheckedOut => "checked out",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    /// Accepts `in stock`, `In-Stock`, `checked_out` and the like
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', '_'], " ");
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

/// A book attribute that can be used as a search key
///
/// Serialized lowercase; deserialized through `FromStr`, so config files
/// accept any case just like the command line does.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Id,
    Title,
    Author,
    Year,
    Status,
}

impl SearchField {
    /// Every attribute of a book
    pub const ALL: [SearchField; 5] = [
        SearchField::Id,
        SearchField::Title,
        SearchField::Author,
        SearchField::Year,
        SearchField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Year => "year",
            SearchField::Status => "status",
        }
    }

    /// Comma-separated list of every field name, for error messages
    pub fn allowed() -> String {
        join_fields(&SearchField::ALL)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SearchField::ALL
            .into_iter()
            .find(|field| field.as_str() == needle)
            .ok_or_else(|| Error::InvalidField {
                field: s.to_string(),
                allowed: SearchField::allowed(),
            })
    }
}

impl<'de> Deserialize<'de> for SearchField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Join field names with ", "
pub fn join_fields(fields: &[SearchField]) -> String {
    fields
        .iter()
        .map(SearchField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Unique identifier, never reassigned
    pub id: u64,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: i32,
    pub status: Status,
}

impl Book {
    /// Create a new book, initially in stock
    pub fn new(id: u64, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: Status::InStock,
        }
    }

    /// Convert to a field-name → value mapping
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), Value::from(self.id));
        map.insert("title".into(), Value::from(self.title.clone()));
        map.insert("author".into(), Value::from(self.author.clone()));
        map.insert("year".into(), Value::from(self.year));
        map.insert("status".into(), Value::from(self.status.as_str()));
        map
    }

    /// Rebuild a book from a mapping produced by [`Book::to_mapping`]
    ///
    /// Fails on missing keys or mistyped values.
    pub fn from_mapping(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }

    /// String form of one field, as matched by search
    pub fn field_value(&self, field: SearchField) -> String {
        match field {
            SearchField::Id => self.id.to_string(),
            SearchField::Title => self.title.clone(),
            SearchField::Author => self.author.clone(),
            SearchField::Year => self.year.to_string(),
            SearchField::Status => self.status.to_string(),
        }
    }

    /// Case-insensitive substring match of `query` against `field`
    pub fn matches(&self, field: SearchField, query: &str) -> bool {
        self.field_value(field)
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reading progress of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookStatus {
    Unread,
    Reading,
    Completed,
    Abandoned,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Unread,
        BookStatus::Reading,
        BookStatus::Completed,
        BookStatus::Abandoned,
    ];

    /// Wire and storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            BookStatus::Unread => "UNREAD",
            BookStatus::Reading => "READING",
            BookStatus::Completed => "COMPLETED",
            BookStatus::Abandoned => "ABANDONED",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown book status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for BookStatus {
    type Err = UnknownStatus;

    /// Matching is exact; `reading` is not `READING`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BookStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// A stored book record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier for the book
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub status: Option<BookStatus>,
    /// 1 to 5 inclusive
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, normalized client payload for create and full-replacement update.
///
/// Optional fields are always explicit: absent or blank input is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub status: Option<BookStatus>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
}

impl BookInput {
    /// Minimal payload with every optional field cleared
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: None,
            status: None,
            rating: None,
            notes: None,
        }
    }
}

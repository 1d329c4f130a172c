use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Author name used whenever a source record carries no author at all.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Reading status of a book in a user's collection.
/// Corresponds to the `book_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "book_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BookStatus {
    /// On the shelf, not started yet.
    ToRead,
    /// Currently being read.
    Reading,
    /// Finished.
    Read,
}

impl Default for BookStatus {
    fn default() -> Self {
        BookStatus::ToRead
    }
}

impl BookStatus {
    /// Parses a status string, returning `None` for anything outside the
    /// three known values. Import normalization maps `None` back to `ToRead`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "to-read" => Some(BookStatus::ToRead),
            "reading" => Some(BookStatus::Reading),
            "read" => Some(BookStatus::Read),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::ToRead => "to-read",
            BookStatus::Reading => "reading",
            BookStatus::Read => "read",
        }
    }
}

/// Deserializes an author field given either as a single string or as a list
/// of strings, always producing a list. Mirrors what file imports and the
/// manual-entry form are allowed to send.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    })
}

fn opt_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    one_or_many(deserializer).map(Some)
}

/// Canonical book record carrying the six semantic fields and nothing else.
///
/// This is what the import pipeline produces, what export serializes, and
/// what a bulk-import commit submits. Identity, ownership, and timestamps are
/// assigned by the persistence layer only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    #[serde(rename = "author", deserialize_with = "one_or_many")]
    pub authors: Vec<String>,
    #[serde(rename = "publishYear", default)]
    pub publish_year: Option<i32>,
    #[serde(rename = "ISBN", alias = "isbn", default)]
    pub isbn: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: BookStatus,
}

/// Input structure for creating a book through the manual-entry endpoint.
///
/// Unlike the import path, a missing title or empty author list is rejected
/// here before anything reaches the database.
#[derive(Debug, Deserialize, Validate)]
pub struct BookInput {
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    #[validate(length(min = 1, message = "at least one author is required"))]
    #[serde(rename = "author", deserialize_with = "one_or_many")]
    pub authors: Vec<String>,

    #[serde(rename = "publishYear", default)]
    pub publish_year: Option<i32>,

    #[serde(rename = "ISBN", alias = "isbn", default)]
    pub isbn: String,

    #[validate(length(max = 5000))]
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: BookStatus,
}

/// Partial update payload: only fields that are present are overwritten.
#[derive(Debug, Deserialize, Validate)]
pub struct BookUpdate {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,

    #[serde(rename = "author", default, deserialize_with = "opt_one_or_many")]
    pub authors: Option<Vec<String>>,

    #[serde(rename = "publishYear")]
    pub publish_year: Option<i32>,

    #[serde(rename = "ISBN", alias = "isbn")]
    pub isbn: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    pub status: Option<BookStatus>,
}

/// Represents a book entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Unique identifier for the book (UUID v4).
    pub id: Uuid,
    /// Identifier of the user who owns this book.
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub title: String,
    /// Ordered list of author names; never empty.
    #[serde(rename = "author", deserialize_with = "one_or_many")]
    pub authors: Vec<String>,
    #[serde(rename = "publishYear")]
    pub publish_year: Option<i32>,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub description: String,
    pub status: BookStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Creates a new `Book` from a canonical record and the owner's user id.
    /// Sets `created_at`/`updated_at` to now and `id` to a fresh UUID.
    pub fn new(record: NewBook, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: record.title,
            authors: record.authors,
            publish_year: record.publish_year,
            isbn: record.isbn,
            description: record.description,
            status: record.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Strips persistence-only fields, leaving the six semantic fields.
    /// This is the shape written out by every export format.
    pub fn to_record(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            authors: self.authors.clone(),
            publish_year: self.publish_year,
            isbn: self.isbn.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

impl From<BookInput> for NewBook {
    fn from(input: BookInput) -> Self {
        NewBook {
            title: input.title,
            authors: input.authors,
            publish_year: input.publish_year,
            isbn: input.isbn,
            description: input.description,
            status: input.status,
        }
    }
}

//! Client for the Google Books volumes API.
//!
//! The remote API is a read-only data source: search results become
//! [`CandidateRecord`]s carrying the canonical book fields plus the external
//! volume id and an optional cover thumbnail. Candidates pre-fill the manual
//! entry form or are added to the collection directly; they are never
//! persisted as-is.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{BookStatus, NewBook, UNKNOWN_AUTHOR};

/// A search result from the remote book-search API, not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "googleId")]
    pub google_id: String,
    pub title: String,
    pub author: Vec<String>,
    #[serde(rename = "publishYear")]
    pub publish_year: Option<i32>,
    #[serde(rename = "ISBN")]
    pub isbn: Option<String>,
    pub description: String,
    pub thumbnail: Option<String>,
}

impl CandidateRecord {
    /// Converts the candidate into a canonical record with the chosen status,
    /// ready for the persistence boundary.
    pub fn into_record(self, status: BookStatus) -> NewBook {
        NewBook {
            title: self.title,
            authors: self.author,
            publish_year: self.publish_year,
            isbn: self.isbn.unwrap_or_default(),
            description: self.description,
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    #[serde(rename = "industryIdentifiers")]
    industry_identifiers: Option<Vec<IndustryIdentifier>>,
    description: Option<String>,
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    id_type: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

pub struct GoogleBooksClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleBooksClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Searches volumes matching the query, returning at most ten candidates.
    pub async fn search(&self, query: &str) -> Result<Vec<CandidateRecord>, AppError> {
        let url = format!("{}/volumes", self.base_url);
        let response: VolumesResponse = self
            .http
            .get(&url)
            .query(&[("q", query), ("maxResults", "10")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .map(candidate_from_volume)
            .collect())
    }

    /// Fetches a single volume by its external identifier.
    pub async fn get(&self, google_id: &str) -> Result<CandidateRecord, AppError> {
        let url = format!("{}/volumes/{}", self.base_url, google_id);
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Book not found".into()));
        }

        let volume: Volume = response.error_for_status()?.json().await?;
        Ok(candidate_from_volume(volume))
    }
}

fn candidate_from_volume(volume: Volume) -> CandidateRecord {
    let info = volume.volume_info;

    let authors = match info.authors {
        Some(authors) if !authors.is_empty() => authors,
        _ => vec![UNKNOWN_AUTHOR.to_string()],
    };

    CandidateRecord {
        google_id: volume.id,
        title: info.title.unwrap_or_default(),
        author: authors,
        publish_year: info.published_date.as_deref().and_then(year_from_date),
        isbn: info.industry_identifiers.and_then(preferred_isbn),
        description: info.description.unwrap_or_default(),
        thumbnail: info.image_links.and_then(|links| links.thumbnail),
    }
}

/// Google publish dates come as "2005", "2005-06", or "2005-06-24";
/// the year is always the first four characters.
fn year_from_date(date: &str) -> Option<i32> {
    date.get(..4).and_then(|year| year.parse().ok())
}

/// ISBN-13 when present, ISBN-10 as a fallback.
fn preferred_isbn(identifiers: Vec<IndustryIdentifier>) -> Option<String> {
    identifiers
        .iter()
        .find(|id| id.id_type == "ISBN_13")
        .or_else(|| identifiers.iter().find(|id| id.id_type == "ISBN_10"))
        .map(|id| id.identifier.clone())
}

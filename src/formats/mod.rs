//! Multi-format book collection import and export.
//!
//! Three serialization formats share one pipeline: a format parser turns raw
//! file text into loosely-typed records, the normalizer coerces those into
//! canonical [`NewBook`](crate::models::NewBook) values, and the export path
//! runs the inverse transformation back to downloadable text.

pub mod export;
pub mod normalize;
pub mod parse;

use serde::Deserialize;

pub use export::{export_books, ExportFile};
pub use normalize::normalize_books;
pub use parse::parse_books;

/// The serialization format of an import or export file, always chosen
/// explicitly by the caller. There is no content sniffing across formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Json,
    Xml,
    Yaml,
}

impl BookFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            BookFormat::Json => "application/json",
            BookFormat::Xml => "application/xml",
            BookFormat::Yaml => "application/yaml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            BookFormat::Json => "json",
            BookFormat::Xml => "xml",
            BookFormat::Yaml => "yaml",
        }
    }
}

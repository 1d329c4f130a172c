//! Export serialization: canonical records back out to downloadable text.
//!
//! The serializer knows nothing about how the result is materialized as a
//! file; it produces a (content, MIME type, filename) triple and leaves the
//! download mechanics to the caller.

use serde::Serialize;

use crate::error::AppError;
use crate::formats::BookFormat;
use crate::models::{Book, NewBook};

/// A serialized collection ready to be handed to the file-output boundary.
#[derive(Debug)]
pub struct ExportFile {
    pub content: String,
    pub mime_type: &'static str,
    pub filename: String,
}

#[derive(Serialize)]
struct BooksDocument<'a> {
    books: &'a [NewBook],
}

/// Serializes a collection to the requested format. Persistence-only fields
/// (id, owner, timestamps) are stripped before serialization.
pub fn export_books(
    books: &[Book],
    format: BookFormat,
    base_name: &str,
) -> Result<ExportFile, AppError> {
    let records: Vec<NewBook> = books.iter().map(Book::to_record).collect();

    let content = match format {
        BookFormat::Json => serde_json::to_string_pretty(&BooksDocument { books: &records })
            .map_err(|e| AppError::InternalServerError(format!("JSON export failed: {}", e)))?,
        BookFormat::Yaml => serde_yaml::to_string(&BooksDocument { books: &records })
            .map_err(|e| AppError::InternalServerError(format!("YAML export failed: {}", e)))?,
        BookFormat::Xml => records_to_xml(&records),
    };

    Ok(ExportFile {
        content,
        mime_type: format.mime_type(),
        filename: format!("{}.{}", base_name, format.extension()),
    })
}

/// Escapes exactly the five XML special characters.
/// Applied to every text node on export.
pub fn escape_xml(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn records_to_xml(records: &[NewBook]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<books>\n");

    for record in records {
        xml.push_str("  <book>\n");
        xml.push_str(&format!("    <title>{}</title>\n", escape_xml(&record.title)));

        // A single author stays a bare element; several are nested under
        // <authors>, even though re-import only reads the first one back.
        if record.authors.len() > 1 {
            xml.push_str("    <authors>\n");
            for author in &record.authors {
                xml.push_str(&format!("      <author>{}</author>\n", escape_xml(author)));
            }
            xml.push_str("    </authors>\n");
        } else if let Some(author) = record.authors.first() {
            xml.push_str(&format!("    <author>{}</author>\n", escape_xml(author)));
        }

        if let Some(year) = record.publish_year {
            xml.push_str(&format!("    <publishYear>{}</publishYear>\n", year));
        }
        xml.push_str(&format!("    <ISBN>{}</ISBN>\n", escape_xml(&record.isbn)));
        xml.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&record.description)
        ));
        xml.push_str(&format!("    <status>{}</status>\n", record.status.as_str()));
        xml.push_str("  </book>\n");
    }

    xml.push_str("</books>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookStatus;

    fn sample_book(title: &str, authors: Vec<&str>) -> Book {
        Book::new(
            NewBook {
                title: title.to_string(),
                authors: authors.into_iter().map(String::from).collect(),
                publish_year: Some(1965),
                isbn: "9780441013593".to_string(),
                description: "Spice and sand.".to_string(),
                status: BookStatus::Read,
            },
            1,
        )
    }

    #[test]
    fn test_escape_xml_covers_five_characters() {
        assert_eq!(
            escape_xml(r#"<a & 'b' "c">"#),
            "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;"
        );
        assert_eq!(escape_xml("plain text"), "plain text");
        assert_eq!(escape_xml(""), "");
    }

    #[test]
    fn test_json_export_wraps_and_strips() {
        let books = vec![sample_book("Dune", vec!["Frank Herbert"])];
        let file = export_books(&books, BookFormat::Json, "my_books").unwrap();

        assert_eq!(file.mime_type, "application/json");
        assert_eq!(file.filename, "my_books.json");

        let value: serde_json::Value = serde_json::from_str(&file.content).unwrap();
        let exported = &value["books"][0];
        assert_eq!(exported["title"], "Dune");
        assert_eq!(exported["author"][0], "Frank Herbert");
        assert_eq!(exported["publishYear"], 1965);
        assert_eq!(exported["ISBN"], "9780441013593");
        assert!(exported.get("id").is_none());
        assert!(exported.get("userId").is_none());
        assert!(exported.get("createdAt").is_none());
    }

    #[test]
    fn test_xml_export_author_shapes() {
        let books = vec![
            sample_book("Dune", vec!["Frank Herbert"]),
            sample_book("Good Omens", vec!["Terry Pratchett", "Neil Gaiman"]),
        ];
        let file = export_books(&books, BookFormat::Xml, "my_books").unwrap();

        assert!(file.content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(file.content.contains("    <author>Frank Herbert</author>"));
        assert!(file.content.contains("    <authors>\n      <author>Terry Pratchett</author>"));
        assert!(file.content.contains("<author>Neil Gaiman</author>"));
        assert_eq!(file.mime_type, "application/xml");
    }

    #[test]
    fn test_xml_export_escapes_text() {
        let mut book = sample_book("Wuthering <Heights>", vec!["Emily & Anne"]);
        book.description = r#"a "classic""#.to_string();

        let file = export_books(&[book], BookFormat::Xml, "my_books").unwrap();
        assert!(file.content.contains("<title>Wuthering &lt;Heights&gt;</title>"));
        assert!(file.content.contains("<author>Emily &amp; Anne</author>"));
        assert!(file.content.contains("<description>a &quot;classic&quot;</description>"));
    }

    #[test]
    fn test_xml_export_omits_missing_year() {
        let mut book = sample_book("Dune", vec!["Frank Herbert"]);
        book.publish_year = None;

        let file = export_books(&[book], BookFormat::Xml, "my_books").unwrap();
        assert!(!file.content.contains("publishYear"));
    }

    #[test]
    fn test_yaml_export_wrapped_shape() {
        let books = vec![sample_book("Dune", vec!["Frank Herbert"])];
        let file = export_books(&books, BookFormat::Yaml, "friend_books").unwrap();

        assert_eq!(file.filename, "friend_books.yaml");
        let value: serde_json::Value = serde_yaml::from_str(&file.content).unwrap();
        assert_eq!(value["books"][0]["title"], "Dune");
        assert_eq!(value["books"][0]["status"], "read");
    }
}

//! Format parsers: raw file text in, loosely-typed book records out.
//!
//! All three parsers share one structural contract: the file is either a
//! top-level list of books or an object wrapping that list in a `books`
//! field. Failures surface as a single [`AppError::ParseError`] carrying a
//! human-readable cause; callers never branch on format-specific subtypes.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde_json::Value;

use crate::error::AppError;
use crate::formats::BookFormat;

/// Parses raw text in the given format into an ordered list of loosely-typed
/// book records. The records are not yet normalized; fields may be missing,
/// scalar where a list is expected, or of the wrong primitive type.
pub fn parse_books(text: &str, format: BookFormat) -> Result<Vec<Value>, AppError> {
    match format {
        BookFormat::Json => parse_json(text),
        BookFormat::Xml => parse_xml(text),
        BookFormat::Yaml => parse_yaml(text),
    }
}

fn parse_json(text: &str) -> Result<Vec<Value>, AppError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|_| AppError::ParseError("invalid JSON book format".into()))?;
    into_book_list(value).ok_or_else(|| AppError::ParseError("invalid JSON book format".into()))
}

fn parse_yaml(text: &str) -> Result<Vec<Value>, AppError> {
    // serde_yaml deserializes straight into a JSON value, which keeps the
    // rest of the pipeline format-agnostic. Non-string keys fail here.
    let value: Value = serde_yaml::from_str(text)
        .map_err(|_| AppError::ParseError("invalid YAML book format".into()))?;
    into_book_list(value).ok_or_else(|| AppError::ParseError("invalid YAML book format".into()))
}

/// Accept-array-or-wrapped-array: a top-level array, or an object with a
/// `books` array field. Anything else is rejected.
fn into_book_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("books") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Per-record accumulator for the XML event reader. Only the first occurrence
/// of each known child element is kept, matching first-match DOM lookups.
#[derive(Default)]
struct XmlBook {
    title: Option<String>,
    author: Option<String>,
    publish_year: Option<String>,
    isbn: Option<String>,
    description: Option<String>,
    status: Option<String>,
}

impl XmlBook {
    fn field_mut(&mut self, tag: &[u8]) -> Option<&mut Option<String>> {
        match tag {
            b"title" => Some(&mut self.title),
            b"author" => Some(&mut self.author),
            b"publishYear" => Some(&mut self.publish_year),
            b"ISBN" => Some(&mut self.isbn),
            b"description" => Some(&mut self.description),
            b"status" => Some(&mut self.status),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(title) = self.title {
            map.insert("title".into(), Value::String(title));
        }
        if let Some(author) = self.author {
            // XML carries a single author per record; the normalizer wraps it.
            map.insert("author".into(), Value::String(author));
        }
        if let Some(year) = self.publish_year {
            map.insert("publishYear".into(), Value::String(year));
        }
        if let Some(isbn) = self.isbn {
            map.insert("ISBN".into(), Value::String(isbn));
        }
        if let Some(description) = self.description {
            map.insert("description".into(), Value::String(description));
        }
        if let Some(status) = self.status {
            map.insert("status".into(), Value::String(status));
        }
        Value::Object(map)
    }
}

fn parse_xml(text: &str) -> Result<Vec<Value>, AppError> {
    let mut reader = Reader::from_str(text);
    let mut buf = Vec::new();

    let mut books: Vec<Value> = Vec::new();
    let mut current: Option<XmlBook> = None;
    // The known child tag whose text content we are currently inside, if any.
    let mut current_tag: Option<Vec<u8>> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if name == b"book" {
                    current = Some(XmlBook::default());
                    current_tag = None;
                } else if current
                    .as_mut()
                    .and_then(|book| book.field_mut(&name))
                    .is_some()
                {
                    current_tag = Some(name);
                } else {
                    // Unknown wrapper such as <authors>; its text is ignored.
                    current_tag = None;
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(book), Some(tag)) = (current.as_mut(), current_tag.as_ref()) {
                    let text = e
                        .unescape()
                        .map_err(|_| AppError::ParseError("invalid XML format".into()))?
                        .into_owned();
                    if let Some(slot) = book.field_mut(tag) {
                        if slot.is_none() {
                            *slot = Some(text);
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                // CDATA arrives raw, no unescaping needed.
                if let (Some(book), Some(tag)) = (current.as_mut(), current_tag.as_ref()) {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(slot) = book.field_mut(tag) {
                        if slot.is_none() {
                            *slot = Some(text);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"book" {
                    if let Some(book) = current.take() {
                        books.push(book.into_value());
                    }
                }
                current_tag = None;
            }
            Ok(Event::Eof) => break,
            Err(_) => return Err(AppError::ParseError("invalid XML format".into())),
            _ => (),
        }
        buf.clear();
    }

    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_top_level_array() {
        let books = parse_books(r#"[{"title": "Dune"}, {"title": "Solaris"}]"#, BookFormat::Json)
            .unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0]["title"], "Dune");
    }

    #[test]
    fn test_json_wrapped_array() {
        let books = parse_books(r#"{"books": [{"title": "Dune"}]}"#, BookFormat::Json).unwrap();
        assert_eq!(books.len(), 1);
    }

    #[test]
    fn test_json_malformed_text() {
        let err = parse_books("{not json", BookFormat::Json).unwrap_err();
        match err {
            AppError::ParseError(msg) => assert_eq!(msg, "invalid JSON book format"),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_json_wrong_shape() {
        // A bare object without a books field is not a collection.
        let err = parse_books(r#"{"title": "Dune"}"#, BookFormat::Json).unwrap_err();
        match err {
            AppError::ParseError(msg) => assert_eq!(msg, "invalid JSON book format"),
            other => panic!("expected ParseError, got {:?}", other),
        }

        assert!(parse_books(r#""just a string""#, BookFormat::Json).is_err());
        assert!(parse_books(r#"{"books": {"title": "Dune"}}"#, BookFormat::Json).is_err());
    }

    #[test]
    fn test_yaml_wrapped_array() {
        let text = "books:\n  - title: Dune\n    author: Frank Herbert\n";
        let books = parse_books(text, BookFormat::Yaml).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0], json!({"title": "Dune", "author": "Frank Herbert"}));
    }

    #[test]
    fn test_yaml_wrong_shape() {
        let err = parse_books("just a scalar", BookFormat::Yaml).unwrap_err();
        match err {
            AppError::ParseError(msg) => assert_eq!(msg, "invalid YAML book format"),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_xml_books() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<books>
  <book>
    <title>Dune</title>
    <author>Frank Herbert</author>
    <publishYear>1965</publishYear>
    <ISBN>9780441013593</ISBN>
    <description>Spice and sand.</description>
    <status>read</status>
  </book>
  <book>
    <title>Solaris</title>
    <author>Stanislaw Lem</author>
  </book>
</books>"#;

        let books = parse_books(text, BookFormat::Xml).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0]["title"], "Dune");
        assert_eq!(books[0]["author"], "Frank Herbert");
        assert_eq!(books[0]["publishYear"], "1965");
        assert_eq!(books[0]["status"], "read");
        assert_eq!(books[1]["title"], "Solaris");
        assert!(books[1].get("status").is_none());
    }

    #[test]
    fn test_xml_first_occurrence_wins() {
        let text = r#"<books><book>
            <title>First</title>
            <title>Second</title>
            <authors><author>Jane Doe</author><author>John Roe</author></authors>
        </book></books>"#;

        let books = parse_books(text, BookFormat::Xml).unwrap();
        assert_eq!(books[0]["title"], "First");
        assert_eq!(books[0]["author"], "Jane Doe");
    }

    #[test]
    fn test_xml_cdata_content() {
        let text = r#"<books><book>
            <title><![CDATA[Dune & Dune Messiah]]></title>
            <description><![CDATA[Spice, sand & <worms>.]]></description>
            <author>Frank Herbert</author>
        </book></books>"#;

        let books = parse_books(text, BookFormat::Xml).unwrap();
        assert_eq!(books[0]["title"], "Dune & Dune Messiah");
        assert_eq!(books[0]["description"], "Spice, sand & <worms>.");
        assert_eq!(books[0]["author"], "Frank Herbert");
    }

    #[test]
    fn test_xml_malformed() {
        let err = parse_books("<books><book><title>Oops</books>", BookFormat::Xml).unwrap_err();
        match err {
            AppError::ParseError(msg) => assert_eq!(msg, "invalid XML format"),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_xml_without_books_is_empty() {
        let books = parse_books("<library></library>", BookFormat::Xml).unwrap();
        assert!(books.is_empty());
    }
}

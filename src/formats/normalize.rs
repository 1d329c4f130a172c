//! Record normalization: loosely-typed parser output into canonical records.
//!
//! This is a pure transformation and it never fails: every input element
//! yields exactly one [`NewBook`], with defaults filled in for missing or
//! malformed fields. Rejection of incomplete records is a manual-entry
//! concern, deliberately not an import concern.

use serde_json::Value;

use crate::models::{BookStatus, NewBook, UNKNOWN_AUTHOR};

/// Normalizes a list of parsed records into canonical book records,
/// preserving order and length.
pub fn normalize_books(records: Vec<Value>) -> Vec<NewBook> {
    records.iter().map(normalize_book).collect()
}

fn normalize_book(record: &Value) -> NewBook {
    NewBook {
        title: text_or_empty(record.get("title")),
        authors: normalize_authors(record.get("author")),
        publish_year: normalize_year(record.get("publishYear")),
        isbn: text_or_empty(record.get("ISBN").or_else(|| record.get("isbn"))),
        description: text_or_empty(record.get("description")),
        status: record
            .get("status")
            .and_then(Value::as_str)
            .and_then(BookStatus::parse)
            .unwrap_or_default(),
    }
}

/// Coerces a scalar to text; missing, null, or structured values become "".
fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// The author field may arrive as a list, a bare scalar, or not at all.
/// A list is kept element-for-element after scalar coercion; the placeholder
/// steps in only when the field is absent, null, blank, or an empty list.
fn normalize_authors(value: Option<&Value>) -> Vec<String> {
    let authors: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text_or_empty(Some(item)))
            .collect(),
        Some(scalar) => {
            let name = text_or_empty(Some(scalar));
            if name.is_empty() {
                Vec::new()
            } else {
                vec![name]
            }
        }
        None => Vec::new(),
    };

    if authors.is_empty() {
        vec![UNKNOWN_AUTHOR.to_string()]
    } else {
        authors
    }
}

/// Keeps a publish year only when it is numeric-like: an integer, or a
/// string that parses as one (XML sources always deliver strings).
fn normalize_year(value: Option<&Value>) -> Option<i32> {
    match value {
        Some(Value::Number(n)) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_author_is_wrapped() {
        let books = normalize_books(vec![json!({"title": "Dune", "author": "Jane Doe"})]);
        assert_eq!(books[0].authors, vec!["Jane Doe"]);
    }

    #[test]
    fn test_missing_author_gets_placeholder() {
        let books = normalize_books(vec![json!({"title": "Dune"})]);
        assert_eq!(books[0].authors, vec![UNKNOWN_AUTHOR]);

        let books = normalize_books(vec![json!({"title": "Dune", "author": []})]);
        assert_eq!(books[0].authors, vec![UNKNOWN_AUTHOR]);

        let books = normalize_books(vec![json!({"title": "Dune", "author": null})]);
        assert_eq!(books[0].authors, vec![UNKNOWN_AUTHOR]);
    }

    #[test]
    fn test_author_list_kept_in_order() {
        let books = normalize_books(vec![json!({"author": ["Jane Doe", "John Roe"]})]);
        assert_eq!(books[0].authors, vec!["Jane Doe", "John Roe"]);
    }

    #[test]
    fn test_author_list_entries_kept_verbatim() {
        // A provided list is never edited, blank entries included.
        let books = normalize_books(vec![
            json!({"author": ["Jane Doe", ""]}),
            json!({"author": ["", "John Roe"]}),
            json!({"author": [null]}),
        ]);
        assert_eq!(books[0].authors, vec!["Jane Doe", ""]);
        assert_eq!(books[1].authors, vec!["", "John Roe"]);
        assert_eq!(books[2].authors, vec![""]);
    }

    #[test]
    fn test_missing_title_defaults_to_empty() {
        // Import path: incomplete records are defaulted, never rejected.
        let books = normalize_books(vec![json!({"author": "Jane Doe"})]);
        assert_eq!(books[0].title, "");
    }

    #[test]
    fn test_publish_year_numeric_like() {
        let books = normalize_books(vec![
            json!({"publishYear": 1965}),
            json!({"publishYear": "1961"}),
            json!({"publishYear": "sometime"}),
            json!({"publishYear": null}),
            json!({}),
        ]);
        assert_eq!(books[0].publish_year, Some(1965));
        assert_eq!(books[1].publish_year, Some(1961));
        assert_eq!(books[2].publish_year, None);
        assert_eq!(books[3].publish_year, None);
        assert_eq!(books[4].publish_year, None);
    }

    #[test]
    fn test_isbn_field_name_variants() {
        let books = normalize_books(vec![
            json!({"ISBN": "9780441013593"}),
            json!({"isbn": "9780156027601"}),
            json!({}),
        ]);
        assert_eq!(books[0].isbn, "9780441013593");
        assert_eq!(books[1].isbn, "9780156027601");
        assert_eq!(books[2].isbn, "");
    }

    #[test]
    fn test_unknown_status_forced_to_default() {
        let books = normalize_books(vec![
            json!({"status": "borrowed"}),
            json!({"status": "reading"}),
            json!({}),
        ]);
        assert_eq!(books[0].status, BookStatus::ToRead);
        assert_eq!(books[1].status, BookStatus::Reading);
        assert_eq!(books[2].status, BookStatus::ToRead);
    }

    #[test]
    fn test_length_preserved() {
        let records = vec![json!({}), json!({"title": 42}), json!({"author": 7})];
        let books = normalize_books(records);
        assert_eq!(books.len(), 3);
        // Scalar coercion also applies to non-string scalars.
        assert_eq!(books[1].title, "42");
        assert_eq!(books[2].authors, vec!["7"]);
    }
}

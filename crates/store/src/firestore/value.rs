//! Firestore typed-value codec for book documents.
//!
//! Firestore REST wraps every field in a single-key object naming its type,
//! e.g. `{"stringValue": "Dune"}` or `{"integerValue": "4"}`.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::error::StoreError;
use crate::record::{BookRecord, NewBook, Rating};

pub const CREATED_AT: &str = "createdAt";

/// A document as returned by `runQuery` or `get`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub create_time: Option<String>,
}

impl Document {
    /// Last path segment of the document name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Encode a draft and its display date as Firestore fields.
///
/// `createdAt` is left out; it is set by a server transform.
pub fn encode_fields(draft: &NewBook, date: &str) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("title".into(), string_value(&draft.title));
    fields.insert("author".into(), optional_string_value(draft.author.as_deref()));
    fields.insert("summary".into(), optional_string_value(draft.summary.as_deref()));
    fields.insert("comment".into(), string_value(&draft.comment));
    fields.insert(
        "rating".into(),
        json!({ "integerValue": draft.rating.get().to_string() }),
    );
    fields.insert("coverUrl".into(), optional_string_value(draft.cover_url.as_deref()));
    fields.insert("date".into(), string_value(date));
    fields
}

/// Decode a stored document back into a record.
pub fn decode_document(doc: &Document) -> Result<BookRecord, StoreError> {
    let fields = &doc.fields;

    let title = read_string(fields, "title")
        .ok_or_else(|| StoreError::Decode(format!("document {} has no title", doc.id())))?;
    let rating = read_integer(fields, "rating")
        .ok_or_else(|| StoreError::Decode(format!("document {} has no rating", doc.id())))?;
    let rating = Rating::new(rating)?;

    let created_at = read_timestamp(fields, CREATED_AT)
        .or_else(|| doc.create_time.as_deref().and_then(parse_timestamp))
        .ok_or_else(|| StoreError::Decode(format!("document {} has no createdAt", doc.id())))?;

    Ok(BookRecord {
        id: doc.id().to_string(),
        title,
        author: read_string(fields, "author").filter(|s| !s.is_empty()),
        summary: read_string(fields, "summary").filter(|s| !s.is_empty()),
        comment: read_string(fields, "comment").unwrap_or_default(),
        rating,
        cover_url: read_string(fields, "coverUrl").filter(|s| !s.is_empty()),
        date: read_string(fields, "date").unwrap_or_default(),
        created_at,
    })
}

pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

// Absent optionals are stored as empty strings, matching what the web form writes.
fn optional_string_value(value: Option<&str>) -> Value {
    string_value(value.unwrap_or_default())
}

fn read_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)?
        .get("stringValue")?
        .as_str()
        .map(str::to_string)
}

fn read_integer(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = fields.get(key)?;
    if let Some(raw) = value.get("integerValue") {
        // Firestore sends int64 as a JSON string.
        return match raw {
            Value::String(s) => s.parse().ok(),
            other => other.as_i64(),
        };
    }
    value
        .get("doubleValue")?
        .as_f64()
        .filter(|f| f.fract() == 0.0)
        .map(|f| f as i64)
}

fn read_timestamp(fields: &Map<String, Value>, key: &str) -> Option<OffsetDateTime> {
    parse_timestamp(fields.get(key)?.get("timestampValue")?.as_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn document(fields: Value) -> Document {
        serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/livres/abc123",
            "fields": fields,
            "createTime": "2024-05-01T09:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn encodes_rating_as_integer_string() {
        let draft = NewBook::new("Dune", "top", Rating::new(5).unwrap());
        let fields = encode_fields(&draft, "01/05/2024");

        assert_eq!(fields["rating"], json!({ "integerValue": "5" }));
        assert_eq!(fields["author"], json!({ "stringValue": "" }));
        assert_eq!(fields["date"], json!({ "stringValue": "01/05/2024" }));
        assert!(!fields.contains_key(CREATED_AT));
    }

    #[test]
    fn decodes_full_document() {
        let doc = document(json!({
            "title": { "stringValue": "Le Petit Prince" },
            "author": { "stringValue": "Antoine de Saint-Exupéry" },
            "summary": { "stringValue": "" },
            "comment": { "stringValue": "Magnifique" },
            "rating": { "integerValue": "5" },
            "coverUrl": { "stringValue": "https://books.google.com/c.jpg" },
            "date": { "stringValue": "02/05/2024" },
            "createdAt": { "timestampValue": "2024-05-02T10:30:00.123456Z" }
        }));

        let record = decode_document(&doc).unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.rating.get(), 5);
        assert_eq!(record.summary, None);
        assert_eq!(record.author.as_deref(), Some("Antoine de Saint-Exupéry"));
        assert_eq!(record.created_at.date(), datetime!(2024-05-02 0:00 UTC).date());
    }

    #[test]
    fn pending_created_at_falls_back_to_create_time() {
        let doc = document(json!({
            "title": { "stringValue": "Dune" },
            "comment": { "stringValue": "ok" },
            "rating": { "doubleValue": 3.0 }
        }));

        let record = decode_document(&doc).unwrap();
        assert_eq!(record.created_at, datetime!(2024-05-01 9:00 UTC));
        assert_eq!(record.rating.get(), 3);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let doc = document(json!({
            "title": { "stringValue": "Dune" },
            "comment": { "stringValue": "ok" },
            "rating": { "integerValue": "7" }
        }));

        assert!(decode_document(&doc).is_err());
    }
}

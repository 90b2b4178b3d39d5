use std::fmt;

use bookshelf_db::BookRecord;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use super::error::BookError;

/// List entry: the book without its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "commentcount")]
    pub comment_count: usize,
}

impl From<&BookRecord> for BookSummary {
    fn from(record: &BookRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            comment_count: record.comment_count(),
        }
    }
}

/// Full representation returned right after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBook {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "commentcount")]
    pub comment_count: usize,
    pub comments: Vec<String>,
}

impl From<BookRecord> for CreatedBook {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id.to_string(),
            comment_count: record.comment_count(),
            title: record.title,
            comments: record.comments,
        }
    }
}

/// Single book with its comments, as returned by lookups and comment appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub comments: Vec<String>,
}

impl From<BookRecord> for BookDetail {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            comments: record.comments,
        }
    }
}

/// Body of `POST /api/books`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub title: Option<String>,
}

impl CreateBook {
    /// The title to persist, or the missing-field error.
    pub fn into_title(self) -> Result<String, BookError> {
        non_empty(self.title).ok_or(BookError::MissingField("title"))
    }
}

/// Body of `POST /api/books/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddComment {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub comment: Option<String>,
}

impl AddComment {
    pub fn into_comment(self) -> Result<String, BookError> {
        non_empty(self.comment).ok_or(BookError::MissingField("comment"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Text fields also accept numbers and booleans, stored in their textual form;
/// `null` counts as absent.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_owned()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_uses_wire_field_names() {
        let mut record = BookRecord::new("Dune");
        record.comments = vec!["great".into(), "long".into()];

        let value = serde_json::to_value(BookSummary::from(&record)).unwrap();
        assert_eq!(
            value,
            json!({ "_id": record.id.to_string(), "title": "Dune", "commentcount": 2 })
        );
    }

    #[test]
    fn detail_omits_comment_count() {
        let record = BookRecord::new("Dune");
        let value = serde_json::to_value(BookDetail::from(record)).unwrap();
        assert!(value.get("commentcount").is_none());
        assert_eq!(value["comments"], json!([]));
    }

    #[test]
    fn created_book_starts_empty() {
        let created = CreatedBook::from(BookRecord::new("Dune"));
        assert_eq!(created.comment_count, 0);
        assert!(created.comments.is_empty());
    }

    #[test]
    fn missing_or_empty_title_is_rejected() {
        for body in [CreateBook { title: None }, CreateBook { title: Some(String::new()) }] {
            assert!(matches!(
                body.into_title(),
                Err(BookError::MissingField("title"))
            ));
        }
    }

    #[test]
    fn whitespace_title_is_kept_verbatim() {
        let title = CreateBook {
            title: Some(" ".to_string()),
        }
        .into_title()
        .unwrap();
        assert_eq!(title, " ");
    }

    #[test]
    fn scalar_fields_are_read_as_text() {
        let body: AddComment = serde_json::from_value(json!({ "comment": 5 })).unwrap();
        assert_eq!(body.into_comment().unwrap(), "5");

        let body: CreateBook = serde_json::from_value(json!({ "title": true })).unwrap();
        assert_eq!(body.into_title().unwrap(), "true");

        let body: CreateBook = serde_json::from_value(json!({ "title": 1.5 })).unwrap();
        assert_eq!(body.into_title().unwrap(), "1.5");
    }

    #[test]
    fn null_field_counts_as_missing() {
        let body: AddComment = serde_json::from_value(json!({ "comment": null })).unwrap();
        assert!(matches!(
            body.into_comment(),
            Err(BookError::MissingField("comment"))
        ));
    }

    #[test]
    fn structured_field_values_are_rejected() {
        assert!(serde_json::from_value::<CreateBook>(json!({ "title": ["a"] })).is_err());
        assert!(serde_json::from_value::<AddComment>(json!({ "comment": { "a": 1 } })).is_err());
    }

    #[test]
    fn empty_comment_is_rejected() {
        let body = AddComment {
            comment: Some(String::new()),
        };
        assert!(matches!(
            body.into_comment(),
            Err(BookError::MissingField("comment"))
        ));
    }
}

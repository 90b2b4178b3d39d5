use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::id::BookId;

/// A book document as persisted in the `books` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(rename = "_id")]
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub comments: Vec<String>,
}

impl BookRecord {
    /// A freshly created book with no comments.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: BookId::generate(),
            title: title.into(),
            comments: Vec::new(),
        }
    }

    /// Number of comments, derived from the stored list on every call.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }
}

/// Document store holding book records.
///
/// Every method is a single store round-trip. Implementations must be safe to
/// share across request tasks.
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// Persist a new book with an empty comment list and return it.
    async fn insert(&self, title: &str) -> StoreResult<BookRecord>;

    /// All books in the store's natural order.
    async fn find_all(&self) -> StoreResult<Vec<BookRecord>>;

    async fn find_by_id(&self, id: &BookId) -> StoreResult<Option<BookRecord>>;

    /// Append `comment` atomically and return the updated book, or `None` if
    /// no book has this id.
    async fn push_comment(&self, id: &BookId, comment: &str) -> StoreResult<Option<BookRecord>>;

    /// Returns `false` when nothing was deleted.
    async fn delete_by_id(&self, id: &BookId) -> StoreResult<bool>;

    /// Remove every book, returning how many were deleted.
    async fn delete_all(&self) -> StoreResult<u64>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, oid::ObjectId};

    #[test]
    fn new_record_has_no_comments() {
        let record = BookRecord::new("Dune");
        assert_eq!(record.title, "Dune");
        assert!(record.comments.is_empty());
        assert_eq!(record.comment_count(), 0);
    }

    #[test]
    fn legacy_documents_decode() {
        let oid = ObjectId::new();
        let document = doc! {
            "_id": oid,
            "title": "Neuromancer",
            "commentcount": 7,
            "__v": 0,
        };

        let record: BookRecord = bson::from_document(document).unwrap();
        assert_eq!(record.id, BookId::from(oid));
        assert!(record.comments.is_empty());
    }

    #[test]
    fn records_encode_id_as_object_id() {
        let record = BookRecord::new("Dune");
        let document = bson::to_document(&record).unwrap();
        assert_eq!(
            document.get_object_id("_id").unwrap(),
            record.id.as_object_id()
        );
        assert!(document.get("commentcount").is_none());
    }
}

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::id::BookId;
use crate::store::{BookRecord, BookStore};

/// Process-local book store. Natural order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<BookRecord>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert(&self, title: &str) -> StoreResult<BookRecord> {
        let record = BookRecord::new(title);
        self.books.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> StoreResult<Vec<BookRecord>> {
        Ok(self.books.read().await.clone())
    }

    async fn find_by_id(&self, id: &BookId) -> StoreResult<Option<BookRecord>> {
        let books = self.books.read().await;
        Ok(books.iter().find(|book| book.id == *id).cloned())
    }

    async fn push_comment(&self, id: &BookId, comment: &str) -> StoreResult<Option<BookRecord>> {
        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|book| book.id == *id).map(|book| {
            book.comments.push(comment.to_string());
            book.clone()
        }))
    }

    async fn delete_by_id(&self, id: &BookId) -> StoreResult<bool> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|book| book.id != *id);
        Ok(books.len() != before)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }
}

use std::sync::Arc;

use bookshelf_db::{BookId, BookStore};

use super::error::BookError;
use super::models::{AddComment, BookDetail, BookSummary, CreateBook, CreatedBook};

/// Book catalog operations over an injected document store.
///
/// Holds no state of its own; every call is one or two store round-trips.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list_books(&self) -> Result<Vec<BookSummary>, BookError> {
        let books = self.store.find_all().await?;
        Ok(books.iter().map(BookSummary::from).collect())
    }

    pub async fn create_book(&self, request: CreateBook) -> Result<CreatedBook, BookError> {
        let title = request.into_title()?;
        let record = self.store.insert(&title).await?;
        tracing::info!(book_id = %record.id, "book created");
        Ok(record.into())
    }

    pub async fn delete_all_books(&self) -> Result<(), BookError> {
        let count = self.store.delete_all().await?;
        tracing::info!(count, "all books deleted");
        Ok(())
    }

    pub async fn get_book(&self, raw_id: &str) -> Result<BookDetail, BookError> {
        let id = parse_id(raw_id)?;
        let record = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or(BookError::NotFound)?;
        Ok(record.into())
    }

    /// The comment is validated only once the book is known to exist.
    pub async fn add_comment(
        &self,
        raw_id: &str,
        request: AddComment,
    ) -> Result<BookDetail, BookError> {
        let id = parse_id(raw_id)?;
        if self.store.find_by_id(&id).await?.is_none() {
            return Err(BookError::NotFound);
        }

        let comment = request.into_comment()?;
        // A concurrent delete can still win between the lookup and the append.
        let record = self
            .store
            .push_comment(&id, &comment)
            .await?
            .ok_or(BookError::NotFound)?;

        tracing::info!(book_id = %id, comments = record.comment_count(), "comment added");
        Ok(record.into())
    }

    pub async fn delete_book(&self, raw_id: &str) -> Result<(), BookError> {
        let id = parse_id(raw_id)?;
        if !self.store.delete_by_id(&id).await? {
            return Err(BookError::NotFound);
        }

        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }
}

fn parse_id(raw_id: &str) -> Result<BookId, BookError> {
    raw_id.parse().map_err(|err| {
        tracing::debug!(error = %err, "rejecting malformed book id");
        BookError::InvalidId
    })
}

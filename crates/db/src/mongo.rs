use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Client, Collection, Database};

use crate::error::StoreResult;
use crate::id::BookId;
use crate::store::{BookRecord, BookStore};

/// Book store backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoBookStore {
    database: Database,
    books: Collection<BookRecord>,
}

impl MongoBookStore {
    /// Build a client for `uri`. The driver connects lazily; call
    /// [`BookStore::ping`] to verify the server is reachable.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        if options.app_name.is_none() {
            options.app_name = Some("bookshelf".to_string());
        }

        let client = Client::with_options(options)?;
        Ok(Self::with_database(client.database(database), collection))
    }

    pub fn with_database(database: Database, collection: &str) -> Self {
        let books = database.collection::<BookRecord>(collection);
        Self { database, books }
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn insert(&self, title: &str) -> StoreResult<BookRecord> {
        let record = BookRecord::new(title);
        self.books.insert_one(&record, None).await?;
        tracing::debug!(book_id = %record.id, "book inserted");
        Ok(record)
    }

    async fn find_all(&self) -> StoreResult<Vec<BookRecord>> {
        let cursor = self.books.find(None, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &BookId) -> StoreResult<Option<BookRecord>> {
        let filter = doc! { "_id": id.as_object_id() };
        Ok(self.books.find_one(filter, None).await?)
    }

    async fn push_comment(&self, id: &BookId, comment: &str) -> StoreResult<Option<BookRecord>> {
        let filter = doc! { "_id": id.as_object_id() };
        let update = doc! { "$push": { "comments": comment } };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .books
            .find_one_and_update(filter, update, options)
            .await?)
    }

    async fn delete_by_id(&self, id: &BookId) -> StoreResult<bool> {
        let filter = doc! { "_id": id.as_object_id() };
        let result = self.books.delete_one(filter, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let result = self.books.delete_many(doc! {}, None).await?;
        tracing::debug!(count = result.deleted_count, "books deleted");
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    const MONGO_URI_VAR: &str = "BOOKSHELF_TEST_MONGO_URI";

    /// Store on a fresh collection, or `None` when no server is configured.
    async fn scratch_store() -> Option<MongoBookStore> {
        let uri = std::env::var(MONGO_URI_VAR).ok()?;
        let collection = format!("books_test_{}", ObjectId::new().to_hex());
        let store = MongoBookStore::connect(&uri, "bookshelf_test", &collection)
            .await
            .unwrap();
        store.ping().await.unwrap();
        Some(store)
    }

    async fn drop_collection(store: MongoBookStore) {
        store.books.drop(None).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB server at BOOKSHELF_TEST_MONGO_URI"]
    async fn inserted_books_can_be_found() {
        let Some(store) = scratch_store().await else {
            return;
        };

        let book = store.insert("Dune").await.unwrap();
        let found = store.find_by_id(&book.id).await.unwrap().unwrap();
        assert_eq!(found, book);
        assert!(found.comments.is_empty());

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![book]);

        drop_collection(store).await;
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB server at BOOKSHELF_TEST_MONGO_URI"]
    async fn push_comment_returns_updated_book() {
        let Some(store) = scratch_store().await else {
            return;
        };

        let book = store.insert("Dune").await.unwrap();
        let first = store.push_comment(&book.id, "first").await.unwrap().unwrap();
        assert_eq!(first.comments, ["first"]);

        let second = store.push_comment(&book.id, "second").await.unwrap().unwrap();
        assert_eq!(second.comments, ["first", "second"]);

        let stored = store.find_by_id(&book.id).await.unwrap().unwrap();
        assert_eq!(stored.comments, ["first", "second"]);

        drop_collection(store).await;
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB server at BOOKSHELF_TEST_MONGO_URI"]
    async fn push_comment_on_absent_book_is_none() {
        let Some(store) = scratch_store().await else {
            return;
        };

        let absent = BookId::generate();
        assert!(store.push_comment(&absent, "lost").await.unwrap().is_none());
        assert!(store.find_by_id(&absent).await.unwrap().is_none());

        drop_collection(store).await;
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB server at BOOKSHELF_TEST_MONGO_URI"]
    async fn delete_by_id_reports_whether_a_book_was_removed() {
        let Some(store) = scratch_store().await else {
            return;
        };

        let book = store.insert("Dune").await.unwrap();
        assert!(store.delete_by_id(&book.id).await.unwrap());
        assert!(!store.delete_by_id(&book.id).await.unwrap());
        assert!(store.find_by_id(&book.id).await.unwrap().is_none());

        drop_collection(store).await;
    }

    #[tokio::test]
    #[ignore = "requires a MongoDB server at BOOKSHELF_TEST_MONGO_URI"]
    async fn delete_all_is_repeatable() {
        let Some(store) = scratch_store().await else {
            return;
        };

        store.insert("a").await.unwrap();
        store.insert("b").await.unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert!(store.find_all().await.unwrap().is_empty());

        drop_collection(store).await;
    }
}

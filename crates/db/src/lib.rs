//! Book document store: identifier format, record shape, and the MongoDB and
//! in-memory backends behind the [`BookStore`] trait.

pub mod error;
pub mod id;
pub mod memory;
pub mod mongo;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::settings::{DatabaseSettings, StoreBackend};

pub use error::{StoreError, StoreResult};
pub use id::{BookId, InvalidBookId};
pub use memory::MemoryBookStore;
pub use mongo::MongoBookStore;
pub use store::{BookRecord, BookStore};

/// Open the configured store and verify it answers before handing it out.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    let store: Arc<dyn BookStore> = match settings.backend {
        StoreBackend::Mongo => {
            let store =
                MongoBookStore::connect(&settings.uri, &settings.name, &settings.collection)
                    .await
                    .context("failed to configure MongoDB client")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!(
                target: "bookshelf-db",
                "using in-memory book store; data will not survive a restart"
            );
            Arc::new(MemoryBookStore::new())
        }
    };

    store
        .ping()
        .await
        .context("document store did not answer ping")?;

    tracing::info!(
        target: "bookshelf-db",
        backend = ?settings.backend,
        database = %settings.name,
        collection = %settings.collection,
        "document store connected"
    );
    Ok(store)
}

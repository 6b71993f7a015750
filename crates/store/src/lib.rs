//! Record store gateway: persists book records in a remote document
//! collection and reads them back newest first.

use async_trait::async_trait;

pub mod error;
pub mod firestore;
pub mod memory;
pub mod record;

pub use error::{StoreError, StoreResult};
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::MemoryStore;
pub use record::{BookRecord, NewBook, Rating, ValidationError, SUMMARY_MAX_CHARS};

/// Gateway to the collection holding book records.
///
/// Each operation is a single remote call with no compensation step.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, most recently created first.
    async fn list(&self) -> StoreResult<Vec<BookRecord>>;

    /// Persist a draft, stamping its date and ordering timestamp, and
    /// return it with the identifier the store assigned.
    async fn create(&self, draft: NewBook) -> StoreResult<BookRecord>;

    /// Remove a record. Deleting an identifier that does not exist succeeds.
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

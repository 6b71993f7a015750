//! In-process record store.

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::record::{self, BookRecord, NewBook};
use crate::RecordStore;

/// Record store kept in memory, with the same ordering and idempotency
/// contract as the remote gateway.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<BookRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<BookRecord>> {
        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn create(&self, draft: NewBook) -> StoreResult<BookRecord> {
        let draft = draft.normalized();
        draft.validate()?;

        let mut records = self.records.write().await;

        // Timestamps must stay strictly increasing so the newest record sorts first.
        let now = OffsetDateTime::now_utc();
        let created_at = match records.iter().map(|r| r.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };

        let record = BookRecord::from_draft(record::new_id(), draft, record::today(), created_at);
        records.push(record.clone());

        tracing::debug!(id = %record.id, count = records.len(), "record stored in memory");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id != id);

        if records.len() == before {
            tracing::debug!(%id, "delete of unknown record ignored");
        }
        Ok(())
    }
}

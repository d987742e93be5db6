use std::path::Path;

use anyhow::{Context, Result};
use rocksdb::{Options, DB};
use tokio::sync::Mutex;

use super::StoreError;
use crate::model::ComplaintRecord;

/// Ticket table on RocksDB. One JSON value per ticket id.
pub struct RocksStore {
    db: DB,
    write_lock: Mutex<()>,
}

impl RocksStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create db dir at {}", parent.display()))?;
        }

        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .with_context(|| format!("Failed to open rocksdb at {}", path.display()))?;

        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    fn complaint_key(ticket_id: &str) -> String {
        format!("complaint:{ticket_id}")
    }

    pub async fn insert(&self, record: &ComplaintRecord) -> Result<(), StoreError> {
        let key = Self::complaint_key(&record.ticket_id);
        let _guard = self.write_lock.lock().await;

        if self.db.get(&key).context("rocksdb read failed")?.is_some() {
            return Err(StoreError::Duplicate(record.ticket_id.clone()));
        }

        let val = serde_json::to_vec(record).context("failed to encode complaint")?;
        self.db.put(&key, val).context("rocksdb write failed")?;
        Ok(())
    }

    pub async fn get(&self, ticket_id: &str) -> Result<Option<ComplaintRecord>> {
        let Some(raw) = self.db.get(Self::complaint_key(ticket_id))? else {
            return Ok(None);
        };
        let record = serde_json::from_slice(&raw)
            .with_context(|| format!("corrupt complaint record {ticket_id}"))?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Language, TicketStatus};

    fn record(id: &str) -> ComplaintRecord {
        ComplaintRecord {
            ticket_id: id.to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            language: Language::Tamil,
            category: Category::WaterLeak,
            status: TicketStatus::New,
            text: "தண்ணீர் கசிவு, pipe".to_string(),
        }
    }

    #[tokio::test]
    async fn stores_and_loads_by_ticket_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksStore::open(dir.path().join("complaints.db")).unwrap();

        store.insert(&record("CIV-9-ZZZZ")).await.unwrap();
        assert_eq!(store.get("CIV-9-ZZZZ").await.unwrap(), Some(record("CIV-9-ZZZZ")));
        assert!(store.get("CIV-9-YYYY").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_ids_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = RocksStore::open(dir.path().join("complaints.db")).unwrap();

        store.insert(&record("CIV-9-ZZZZ")).await.unwrap();
        let err = store.insert(&record("CIV-9-ZZZZ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }
}

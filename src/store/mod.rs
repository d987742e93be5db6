pub mod csv;
pub mod rocks;

use anyhow::Result;
use thiserror::Error;

use crate::{config::StoreConfig, model::ComplaintRecord};

pub use self::csv::CsvStore;
pub use self::rocks::RocksStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket {0} already exists")]
    Duplicate(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Ticket persistence, keyed uniquely by ticket id.
pub enum ComplaintStore {
    Csv(CsvStore),
    Rocks(RocksStore),
}

impl ComplaintStore {
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        match config {
            StoreConfig::Csv { data_dir } => Ok(Self::Csv(CsvStore::open(data_dir).await?)),
            StoreConfig::Rocks { path } => Ok(Self::Rocks(RocksStore::open(path)?)),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Csv(_) => "csv",
            Self::Rocks(_) => "rocksdb",
        }
    }

    pub async fn insert(&self, record: &ComplaintRecord) -> Result<(), StoreError> {
        match self {
            Self::Csv(store) => store.insert(record).await,
            Self::Rocks(store) => store.insert(record).await,
        }
    }

    pub async fn get(&self, ticket_id: &str) -> Result<Option<ComplaintRecord>> {
        match self {
            Self::Csv(store) => store.get(ticket_id).await,
            Self::Rocks(store) => store.get(ticket_id).await,
        }
    }
}

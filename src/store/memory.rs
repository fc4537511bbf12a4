use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

use crate::record::ArticleRecord;
use crate::store::{RecordStore, errors::StoreError};

/// In-memory store with the same uniqueness rules as [`JsonlStore`](super::JsonlStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ArticleRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ArticleRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub async fn records(&self) -> Vec<ArticleRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn seen_urls(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .map(|r| r.url().to_string())
            .collect())
    }

    async fn append(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.url() == record.url()) {
            return Err(StoreError::Duplicate(record.url().to_string()));
        }
        records.push(record.clone());
        Ok(())
    }
}

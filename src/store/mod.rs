//! Output stores and the resume set derived from them.

pub mod errors;
pub mod jsonl;
pub mod memory;
pub mod resume;

pub use errors::StoreError;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use resume::pending_urls;

use async_trait::async_trait;
use std::collections::HashSet;

use crate::record::ArticleRecord;

/// Append-only record sink that can report which URLs it already holds.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn seen_urls(&self) -> Result<HashSet<String>, StoreError>;

    /// Append one record. Refuses a URL the store already holds.
    async fn append(&self, record: &ArticleRecord) -> Result<(), StoreError>;
}

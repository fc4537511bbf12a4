use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record for {url}: {source}")]
    Serialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record for {0} already stored")]
    Duplicate(String),
}

impl StoreError {
    /// A serialization failure points at a data-shape bug rather than a bad page.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialize { .. })
    }
}

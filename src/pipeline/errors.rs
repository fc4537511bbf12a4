use std::path::PathBuf;
use thiserror::Error;

use crate::extractor::ExtractError;
use crate::fetcher::FetchError;
use crate::record::Rejection;
use crate::store::StoreError;

/// Errors that stop a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("cannot read url list {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("worker pool closed: {0}")]
    Pool(#[from] tokio::sync::AcquireError),
}

/// Why a URL produced no record without anything being broken.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Rejected(Rejection),

    #[error("already stored")]
    Duplicate,
}

/// A per-URL failure; logged and counted, never fatal to the batch.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("fetch failed ({category}): {0}", category = .0.category())]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Store(StoreError),

    #[error("worker task aborted: {0}")]
    Task(String),
}

pub mod client;
pub mod decode;
pub mod errors;
pub mod types;

pub use client::{FetchOptions, Fetcher, HttpFetcher};
pub use errors::FetchError;
pub use types::PageResponse;

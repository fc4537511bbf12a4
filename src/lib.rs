pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod normalizer;
pub mod pipeline;
pub mod record;
pub mod store;

//! Drives a batch of URLs through the stages and tallies the outcome.

pub mod errors;
pub mod input;
pub mod runner;

pub use errors::{PipelineError, SkipReason, UrlError};
pub use input::read_url_list;
pub use runner::{Outcome, Pipeline, RunSummary};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::extractor::SiteExtractor;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::pipeline::errors::{PipelineError, SkipReason, UrlError};
use crate::record::{Assembler, AssemblyInput};
use crate::store::{RecordStore, StoreError, pending_urls};

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const MAX_CONCURRENCY: usize = 32;

/// What happened to one URL.
#[derive(Debug)]
pub enum Outcome {
    Scraped { chars: usize },
    Skipped(SkipReason),
    Failed(UrlError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs started in this run.
    pub attempted: usize,
    pub scraped: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Distinct candidates already present in the output before the run.
    pub already_done: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Scraped { .. } => self.scraped += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// The per-URL stages, shared by every worker task.
struct Stages {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn SiteExtractor>,
    normalizer: Normalizer,
    assembler: Assembler,
    store: Arc<dyn RecordStore>,
}

impl Stages {
    async fn process(&self, url: &str) -> Outcome {
        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => return Outcome::Failed(e.into()),
        };
        debug!(
            status = page.status.as_u16(),
            encoding = page.encoding,
            fetched_at = %page.fetched_at.to_rfc3339(),
            final_url = %page.url_final,
            "fetched page"
        );

        let extracted = match self.extractor.extract(&page.body_utf8, &page.url_final) {
            Ok(extracted) => extracted,
            Err(e) => return Outcome::Skipped(e.into()),
        };
        debug!(
            extractor = self.extractor.name(),
            fragments = extracted.fragments.len(),
            recipe = extracted.has_recipe(),
            "extracted page"
        );

        let title = self.normalizer.normalize(&extracted.title);
        let content = self.normalizer.normalize(&extracted.body());

        let record = match self.assembler.assemble(AssemblyInput {
            url,
            title: &title,
            content: &content,
            has_recipe: extracted.has_recipe(),
        }) {
            Ok(record) => record,
            Err(rejection) => return Outcome::Skipped(SkipReason::Rejected(rejection)),
        };

        match self.store.append(&record).await {
            Ok(()) => Outcome::Scraped {
                chars: content.chars().count(),
            },
            Err(StoreError::Duplicate(_)) => Outcome::Skipped(SkipReason::Duplicate),
            Err(e) => Outcome::Failed(UrlError::Store(e)),
        }
    }
}

/// Bounded fan-out of the fetch → extract → normalize → assemble → append
/// chain over a list of URLs.
pub struct Pipeline {
    stages: Arc<Stages>,
    concurrency: usize,
    shutdown: CancellationToken,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn SiteExtractor>,
        normalizer: Normalizer,
        assembler: Assembler,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            stages: Arc::new(Stages {
                fetcher,
                extractor,
                normalizer,
                assembler,
                store,
            }),
            concurrency: DEFAULT_CONCURRENCY,
            shutdown: CancellationToken::new(),
        }
    }

    /// Clamped to `1..=32`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Cancelling this token stops new URLs from starting; in-flight ones finish.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(&self, candidates: &[String]) -> Result<RunSummary, PipelineError> {
        let started = Instant::now();
        let seen = self.stages.store.seen_urls().await?;
        let pending = pending_urls(&seen, candidates);

        let mut summary = RunSummary {
            already_done: candidates
                .iter()
                .filter(|url| seen.contains(*url))
                .collect::<HashSet<_>>()
                .len(),
            ..RunSummary::default()
        };

        info!(
            "Starting run: {} candidates, {} already stored, {} pending, concurrency {}",
            candidates.len(),
            summary.already_done,
            pending.len(),
            self.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for url in pending {
            let permit = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested, not starting remaining URLs");
                    break;
                }
                permit = semaphore.clone().acquire_owned() => permit?,
            };

            while let Some(joined) = tasks.try_join_next() {
                Self::collect(&mut summary, joined);
            }

            summary.attempted += 1;
            let stages = self.stages.clone();
            let span = info_span!("url", url = %url);
            tasks.spawn(
                async move {
                    let _permit = permit;
                    let outcome = stages.process(&url).await;
                    log_outcome(&url, &outcome);
                    outcome
                }
                .instrument(span),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            Self::collect(&mut summary, joined);
        }

        summary.elapsed = started.elapsed();
        info!(
            "Run finished in {:.1}s: attempted {}, scraped {}, skipped {}, failed {}, already stored {}",
            summary.elapsed.as_secs_f64(),
            summary.attempted,
            summary.scraped,
            summary.skipped,
            summary.failed,
            summary.already_done
        );
        Ok(summary)
    }

    fn collect(summary: &mut RunSummary, joined: Result<Outcome, tokio::task::JoinError>) {
        match joined {
            Ok(outcome) => summary.record(&outcome),
            Err(e) => {
                error!("Worker task aborted: {}", e);
                summary.record(&Outcome::Failed(UrlError::Task(e.to_string())));
            }
        }
    }
}

fn log_outcome(url: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Scraped { chars } => info!("Scraped {} ({} chars)", url, chars),
        Outcome::Skipped(SkipReason::Duplicate) => debug!("Skipped {}: already stored", url),
        Outcome::Skipped(reason) => warn!("Skipped {}: {}", url, reason),
        Outcome::Failed(UrlError::Store(e)) if e.is_serialization() => {
            error!("Serialization failed for {}: {}", url, e)
        }
        Outcome::Failed(e) => warn!("Failed {}: {}", url, e),
    }
}

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use harvest::{
    config::Config,
    fetcher::HttpFetcher,
    normalizer::Normalizer,
    pipeline::{Pipeline, read_url_list},
    record::Assembler,
    store::JsonlStore,
};

const ENV_LOG_FORMAT: &str = "HARVEST_LOG_FORMAT";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    info!(
        "Harvesting {} with the {:?} extractor: {} -> {}",
        config.site(),
        config.extractor(),
        config.input().display(),
        config.output().display()
    );

    let urls = read_url_list(config.input()).await?;

    let fetcher = HttpFetcher::new(&config.fetch_options())?;
    let extractor = config
        .extractor()
        .build(config.wordpress_options())
        .context("invalid extractor selectors")?;
    let normalizer =
        Normalizer::new(&config.normalizer_options()).context("invalid anonymizer pattern")?;
    let assembler = Assembler::new(config.site_profile());
    let store = JsonlStore::new(config.output());

    let pipeline = Pipeline::new(
        Arc::new(fetcher),
        extractor,
        normalizer,
        assembler,
        Arc::new(store),
    )
    .with_concurrency(config.workers());

    let shutdown = pipeline.shutdown_token();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Received shutdown signal, finishing in-flight URLs...");
        shutdown.cancel();
    });

    let summary = pipeline.run(&urls).await?;
    if summary.failed > 0 {
        info!("{} URLs failed; rerun to retry them", summary.failed);
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

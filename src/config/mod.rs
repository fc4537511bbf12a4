//! Runtime configuration for a harvest run.
//!
//! Everything is read from `HARVEST_*` environment variables with defaults
//! that reproduce a plain WordPress food-blog crawl. `Config::from_env`
//! validates the values and the `*_options` helpers turn them into the
//! option structs each stage is built from.

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::extractor::{ExtractorKind, WordPressOptions};
use crate::fetcher::{FetchOptions, client::DEFAULT_USER_AGENT};
use crate::normalizer::{AnonymizerConfig, NormalizerOptions};
use crate::record::{RecordType, SiteProfile, SubdomainRule};

pub const ENV_INPUT: &str = "HARVEST_INPUT";
pub const ENV_OUTPUT: &str = "HARVEST_OUTPUT";
pub const ENV_SITE: &str = "HARVEST_SITE";
pub const ENV_WORKERS: &str = "HARVEST_WORKERS";
pub const ENV_EXTRACTOR: &str = "HARVEST_EXTRACTOR";
pub const ENV_RECORD_TYPE: &str = "HARVEST_RECORD_TYPE";
pub const ENV_SUBDOMAIN: &str = "HARVEST_SUBDOMAIN";
pub const ENV_SUBDOMAIN_KEYWORDS: &str = "HARVEST_SUBDOMAIN_KEYWORDS";
pub const ENV_MIN_CHARS: &str = "HARVEST_MIN_CHARS";
pub const ENV_MIN_RECIPE_CHARS: &str = "HARVEST_MIN_RECIPE_CHARS";
pub const ENV_TIMEOUT_SECS: &str = "HARVEST_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "HARVEST_USER_AGENT";
pub const ENV_ASCII_PUNCTUATION: &str = "HARVEST_ASCII_PUNCTUATION";
pub const ENV_MASK_TERMS: &str = "HARVEST_MASK_TERMS";
pub const ENV_REQUIRE_LANG: &str = "HARVEST_REQUIRE_LANG";
pub const ENV_CONTENT_SELECTOR: &str = "HARVEST_CONTENT_SELECTOR";
pub const ENV_TITLE_SELECTOR: &str = "HARVEST_TITLE_SELECTOR";
pub const ENV_EXTRA_NOISE: &str = "HARVEST_EXTRA_NOISE";

const DEFAULT_INPUT: &str = "urls.txt";
const DEFAULT_OUTPUT: &str = "output.jsonl";
const DEFAULT_SITE: &str = "example.com";
const DEFAULT_WORKERS: usize = 4;
const MAX_WORKERS: usize = 32;
const DEFAULT_SUBDOMAIN: &str = "Cooking Tips, food knowledge, food preservation";
const DEFAULT_MIN_CHARS: usize = 150;
const DEFAULT_MIN_RECIPE_CHARS: usize = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    input: PathBuf,
    output: PathBuf,
    site: String,
    workers: usize,
    extractor: ExtractorKind,
    record_type: RecordType,
    subdomain: SubdomainRule,
    min_chars: usize,
    min_recipe_chars: usize,
    timeout: Duration,
    user_agent: String,
    ascii_punctuation: bool,
    mask_terms: Vec<String>,
    require_lang: bool,
    content_selector: Option<String>,
    title_selector: Option<String>,
    extra_noise: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            site: DEFAULT_SITE.to_string(),
            workers: DEFAULT_WORKERS,
            extractor: ExtractorKind::WordPress,
            record_type: RecordType::Article,
            subdomain: SubdomainRule::Fixed(DEFAULT_SUBDOMAIN.to_string()),
            min_chars: DEFAULT_MIN_CHARS,
            min_recipe_chars: DEFAULT_MIN_RECIPE_CHARS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ascii_punctuation: false,
            mask_terms: Vec::new(),
            require_lang: false,
            content_selector: None,
            title_selector: None,
            extra_noise: None,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to the defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let subdomain = match var(ENV_SUBDOMAIN_KEYWORDS) {
            Some(rules) => SubdomainRule::parse_keywords(&rules).map_err(|reason| {
                ConfigError::InvalidValue {
                    field: ENV_SUBDOMAIN_KEYWORDS,
                    reason,
                }
            })?,
            None => var(ENV_SUBDOMAIN)
                .map(SubdomainRule::Fixed)
                .unwrap_or(defaults.subdomain),
        };

        let timeout_secs: u64 = parse_or(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS,
                reason: "must be at least 1".to_string(),
            });
        }

        let workers: usize = parse_or(ENV_WORKERS, DEFAULT_WORKERS)?;

        Ok(Self {
            input: var(ENV_INPUT).map(PathBuf::from).unwrap_or(defaults.input),
            output: var(ENV_OUTPUT).map(PathBuf::from).unwrap_or(defaults.output),
            site: var(ENV_SITE).unwrap_or(defaults.site),
            workers: workers.clamp(1, MAX_WORKERS),
            extractor: parse_or(ENV_EXTRACTOR, defaults.extractor)?,
            record_type: parse_or(ENV_RECORD_TYPE, defaults.record_type)?,
            subdomain,
            min_chars: parse_or(ENV_MIN_CHARS, DEFAULT_MIN_CHARS)?,
            min_recipe_chars: parse_or(ENV_MIN_RECIPE_CHARS, DEFAULT_MIN_RECIPE_CHARS)?,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: var(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            ascii_punctuation: parse_bool(ENV_ASCII_PUNCTUATION, false)?,
            mask_terms: var(ENV_MASK_TERMS)
                .map(|terms| split_list(&terms))
                .unwrap_or_default(),
            require_lang: parse_bool(ENV_REQUIRE_LANG, false)?,
            content_selector: var(ENV_CONTENT_SELECTOR),
            title_selector: var(ENV_TITLE_SELECTOR),
            extra_noise: var(ENV_EXTRA_NOISE),
        })
    }

    /// File holding one candidate URL per line.
    pub fn input(&self) -> &Path {
        &self.input
    }
    /// JSONL file records are appended to and resumed from.
    pub fn output(&self) -> &Path {
        &self.output
    }
    pub fn site(&self) -> &str {
        &self.site
    }
    /// In-flight URL limit, already clamped to `1..=32`.
    pub fn workers(&self) -> usize {
        self.workers
    }
    pub fn extractor(&self) -> ExtractorKind {
        self.extractor
    }

    pub fn site_profile(&self) -> SiteProfile {
        SiteProfile {
            record_type: self.record_type,
            subdomain: self.subdomain.clone(),
            min_content_chars: self.min_chars,
            min_recipe_chars: self.min_recipe_chars,
            require_language: self.require_lang,
            ..SiteProfile::new(self.site.clone())
        }
    }

    pub fn normalizer_options(&self) -> NormalizerOptions {
        NormalizerOptions {
            anonymizer: AnonymizerConfig {
                extra_terms: self.mask_terms.clone(),
                ..AnonymizerConfig::default()
            },
            ascii_punctuation: self.ascii_punctuation,
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }

    pub fn wordpress_options(&self) -> WordPressOptions {
        let mut options = WordPressOptions::default();
        if let Some(selector) = &self.content_selector {
            options.content_selectors = vec![selector.clone()];
        }
        if let Some(selector) = &self.title_selector {
            options.title_selectors = vec![selector.clone()];
        }
        if let Some(selector) = &self.extra_noise {
            options.noise_selectors.push(selector.clone());
        }
        options
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: format!("`{raw}`: {e}"),
        }),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = var(key) else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: key,
            reason: format!("`{raw}` is not a boolean"),
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

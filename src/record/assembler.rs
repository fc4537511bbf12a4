use chrono::{Local, NaiveDate};

use crate::record::{
    model::{ArticleRecord, ContentInfo, DataInfo, RecordMeta, RecordType},
    reject::{self, Rejection},
    subdomain::SubdomainRule,
};

pub const DEFAULT_MIN_CONTENT_CHARS: usize = 150;
pub const DEFAULT_MIN_RECIPE_CHARS: usize = 100;

/// Per-site constants stamped onto every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub source: String,
    pub lang: String,
    pub record_type: RecordType,
    pub delivery_version: String,
    pub domain: String,
    pub subdomain: SubdomainRule,
    pub min_content_chars: usize,
    /// Threshold used instead when the page carried a recipe card.
    pub min_recipe_chars: usize,
    pub require_language: bool,
}

impl SiteProfile {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            lang: "en".to_string(),
            record_type: RecordType::Article,
            delivery_version: "V1.0".to_string(),
            domain: "daily_life".to_string(),
            subdomain: SubdomainRule::Fixed(
                "Cooking Tips, food knowledge, food preservation".to_string(),
            ),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            min_recipe_chars: DEFAULT_MIN_RECIPE_CHARS,
            require_language: false,
        }
    }
}

/// Already-normalized page text waiting to become a record.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub has_recipe: bool,
}

#[derive(Debug, Clone)]
pub struct Assembler {
    profile: SiteProfile,
}

impl Assembler {
    pub fn new(profile: SiteProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn assemble(&self, input: AssemblyInput<'_>) -> Result<ArticleRecord, Rejection> {
        self.assemble_on(input, Local::now().date_naive())
    }

    pub fn assemble_on(
        &self,
        input: AssemblyInput<'_>,
        processing_date: NaiveDate,
    ) -> Result<ArticleRecord, Rejection> {
        let needed = if input.has_recipe {
            self.profile.min_recipe_chars
        } else {
            self.profile.min_content_chars
        };
        reject::check_length(input.content, needed)?;

        if self.profile.require_language {
            reject::check_language(input.content, &self.profile.lang)?;
        }

        let subdomain = self.profile.subdomain.classify(input.title, input.content);

        Ok(ArticleRecord {
            id: record_id(input.url),
            text: format!("{}\n{}", input.title, input.content),
            meta: RecordMeta {
                data_info: DataInfo {
                    lang: self.profile.lang.clone(),
                    url: input.url.to_string(),
                    source: self.profile.source.clone(),
                    record_type: self.profile.record_type,
                    processing_date,
                    delivery_version: self.profile.delivery_version.clone(),
                    title: input.title.to_string(),
                    content: input.content.to_string(),
                    content_info: ContentInfo {
                        domain: self.profile.domain.clone(),
                        subdomain,
                    },
                },
            },
        })
    }
}

/// Hex MD5 of the source URL. Depends on the URL only, never the content.
pub fn record_id(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

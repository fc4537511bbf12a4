pub mod images;
pub mod noise;
pub mod reader;
pub mod recipe;
pub mod wordpress;

#[cfg(test)]
mod tests;

pub use reader::ReadableExtractor;
pub use recipe::RecipeCard;
pub use wordpress::{WordPressExtractor, WordPressOptions};

use scraper::ElementRef;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no content container matched")]
    MissingContainer,

    #[error("page has no title")]
    MissingTitle,

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("readability failed: {0}")]
    Readability(String),
}

/// One unit of article body in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Image(String),
}

impl Fragment {
    pub fn render(&self) -> String {
        match self {
            Fragment::Text(text) => text.clone(),
            Fragment::Image(url) => format!("[image: {url}]"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: String,
    pub fragments: Vec<Fragment>,
    /// Flattened recipe card, kept apart so it lands after the body.
    pub recipe: Option<String>,
}

impl Extracted {
    /// Body text with the recipe card appended: one fragment per line.
    pub fn body(&self) -> String {
        let mut lines: Vec<String> = self.fragments.iter().map(Fragment::render).collect();
        if let Some(recipe) = &self.recipe {
            lines.push(recipe.clone());
        }
        lines.join("\n")
    }

    pub fn has_recipe(&self) -> bool {
        self.recipe.as_deref().is_some_and(|r| !r.trim().is_empty())
    }
}

/// Turns one page of HTML into a title and an ordered body.
///
/// Parsing is synchronous; `scraper::Html` is not `Send`, so callers keep
/// the document out of any `.await`.
pub trait SiteExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, html: &str, base: &Url) -> Result<Extracted, ExtractError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractorKind {
    #[default]
    WordPress,
    Readable,
}

impl ExtractorKind {
    pub fn build(self, options: WordPressOptions) -> Result<Arc<dyn SiteExtractor>, ExtractError> {
        Ok(match self {
            ExtractorKind::WordPress => Arc::new(WordPressExtractor::new(options)?),
            ExtractorKind::Readable => Arc::new(ReadableExtractor::new(options.noise_phrases)),
        })
    }
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wordpress" | "wp" => Ok(ExtractorKind::WordPress),
            "readable" | "readability" => Ok(ExtractorKind::Readable),
            other => Err(format!("unknown extractor `{other}`")),
        }
    }
}

/// Text content of an element with whitespace runs collapsed to one space.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

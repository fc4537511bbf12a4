use readability::extractor;
use url::Url;

use crate::extractor::{ExtractError, Extracted, Fragment, SiteExtractor, noise};

/// Generic fallback for sites without a WordPress layout: lets
/// `readability` find the main column and splits its text into paragraphs.
#[derive(Debug, Clone)]
pub struct ReadableExtractor {
    phrases: Vec<String>,
}

impl ReadableExtractor {
    pub fn new(noise_phrases: Vec<String>) -> Self {
        Self {
            phrases: noise_phrases
                .into_iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

impl Default for ReadableExtractor {
    fn default() -> Self {
        Self::new(noise::default_phrases())
    }
}

impl SiteExtractor for ReadableExtractor {
    fn name(&self) -> &'static str {
        "readable"
    }

    fn extract(&self, html: &str, base: &Url) -> Result<Extracted, ExtractError> {
        let article = extractor::extract(&mut html.as_bytes(), base)
            .map_err(|e| ExtractError::Readability(e.to_string()))?;

        let title = article.title.trim().to_string();
        if title.is_empty() {
            return Err(ExtractError::MissingTitle);
        }

        let fragments: Vec<Fragment> = article
            .text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty() && !noise::is_noise_text(line, &self.phrases))
            .map(Fragment::Text)
            .collect();

        if fragments.is_empty() {
            return Err(ExtractError::MissingContainer);
        }

        Ok(Extracted {
            title,
            fragments,
            recipe: None,
        })
    }
}

//! Text normalization applied to every extracted title and body.
//!
//! The steps run in a fixed order: mojibake repair, emoji stripping,
//! whitespace collapse, then PII masking. Later steps rely on the earlier
//! ones, and the whole chain is idempotent.

pub mod anonymize;
pub mod text;

pub use anonymize::{Anonymizer, AnonymizerConfig};

#[derive(Debug, Clone, Default)]
pub struct NormalizerOptions {
    pub anonymizer: AnonymizerConfig,
    /// Fold curly quotes, dashes and ellipses down to ASCII.
    pub ascii_punctuation: bool,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    anonymizer: Anonymizer,
    ascii_punctuation: bool,
}

impl Normalizer {
    pub fn new(options: &NormalizerOptions) -> Result<Self, regex::Error> {
        Ok(Self {
            anonymizer: Anonymizer::new(&options.anonymizer)?,
            ascii_punctuation: options.ascii_punctuation,
        })
    }

    /// Canonical, privacy-safe form of `raw`. Never fails; empty in, empty out.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let repaired = text::repair_mojibake(raw);
        let stripped = text::strip_emoji(&repaired);
        // Removing an emoji can glue the halves of a mis-decoded sequence.
        let mut text = if stripped.len() == repaired.len() {
            stripped
        } else {
            text::repair_mojibake(&stripped)
        };
        if self.ascii_punctuation {
            text = text::fold_punctuation(&text);
        }
        let text = text::collapse_whitespace(&text);
        self.anonymizer.anonymize(&text)
    }

    pub fn anonymizer(&self) -> &Anonymizer {
        &self.anonymizer
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            anonymizer: Anonymizer::default(),
            ascii_punctuation: false,
        }
    }
}

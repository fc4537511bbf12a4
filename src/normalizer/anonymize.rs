use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,7}\b";
pub const DEFAULT_PHONE_PATTERN: &str = r"(\(?[0-9]{3}\)?[ .-]?)?[0-9]{3}[ .-]?[0-9]{4}";
pub const DEFAULT_MASK: char = 'x';

// Masking can expose a new match (`a@b.co@c.com`), so passes repeat until
// nothing changes. The bound only matters for pathological custom patterns.
const MAX_PASSES: usize = 8;

static IMAGE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[image: [^\]]+\]").unwrap());

/// Patterns used to find PII. Boundaries are heuristic, so they stay
/// configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizerConfig {
    pub email_pattern: String,
    pub phone_pattern: String,
    pub mask: char,
    /// Extra words (author names and the like) masked case-insensitively.
    pub extra_terms: Vec<String>,
}

impl Default for AnonymizerConfig {
    fn default() -> Self {
        Self {
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            phone_pattern: DEFAULT_PHONE_PATTERN.to_string(),
            mask: DEFAULT_MASK,
            extra_terms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Anonymizer {
    patterns: Vec<Regex>,
    mask: char,
}

impl Anonymizer {
    pub fn new(config: &AnonymizerConfig) -> Result<Self, regex::Error> {
        let mut patterns = vec![
            Regex::new(&config.email_pattern)?,
            Regex::new(&config.phone_pattern)?,
        ];

        let terms: Vec<String> = config
            .extra_terms
            .iter()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .map(regex::escape)
            .collect();
        if !terms.is_empty() {
            patterns.push(Regex::new(&format!(r"(?i)\b(?:{})\b", terms.join("|")))?);
        }

        Ok(Self {
            patterns,
            mask: config.mask,
        })
    }

    /// Mask every PII match with a run of the mask character of the same
    /// length. `[image: ...]` markers are copied through untouched.
    pub fn anonymize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for marker in IMAGE_MARKER_REGEX.find_iter(text) {
            out.push_str(&self.mask_segment(&text[last..marker.start()]));
            out.push_str(marker.as_str());
            last = marker.end();
        }
        out.push_str(&self.mask_segment(&text[last..]));
        out
    }

    fn mask_segment(&self, segment: &str) -> String {
        let mut current = segment.to_string();
        for _ in 0..MAX_PASSES {
            let mut changed = false;
            for pattern in &self.patterns {
                if pattern.is_match(&current) {
                    let mask = self.mask;
                    current = pattern
                        .replace_all(&current, |caps: &regex::Captures| {
                            mask.to_string().repeat(caps[0].chars().count())
                        })
                        .into_owned();
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        current
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new(&AnonymizerConfig::default()).unwrap()
    }
}

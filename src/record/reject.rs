use regex::Regex;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;
use whatlang::Lang;

const MIN_LANGUAGE_CONFIDENCE: f64 = 0.25;
const MIN_LANGUAGE_TEXT: usize = 50;

static IMAGE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[image: [^\]]+\]").unwrap());

/// Why assembled content was not turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooShort { chars: usize, needed: usize },
    LanguageMismatch { detected: String, expected: String },
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooShort { chars, needed } => {
                write!(f, "content too short ({chars} chars, needed {needed})")
            }
            Rejection::LanguageMismatch { detected, expected } => {
                write!(f, "language '{detected}' does not match '{expected}'")
            }
        }
    }
}

/// Character count of the body once image markers are taken out.
pub fn substantive_chars(content: &str) -> usize {
    IMAGE_MARKER_REGEX
        .replace_all(content, "")
        .trim()
        .chars()
        .count()
}

pub fn check_length(content: &str, needed: usize) -> Result<(), Rejection> {
    let chars = substantive_chars(content);
    if chars < needed {
        return Err(Rejection::TooShort { chars, needed });
    }
    Ok(())
}

/// Profile language as a whatlang `Lang`. Takes ISO 639-1 codes for the
/// languages blogs are usually scraped in, or any ISO 639-3 code.
fn expected_lang(code: &str) -> Option<Lang> {
    let code = code.trim().to_ascii_lowercase();
    let lang = match code.as_str() {
        "en" => Lang::Eng,
        "es" => Lang::Spa,
        "fr" => Lang::Fra,
        "de" => Lang::Deu,
        "it" => Lang::Ita,
        "pt" => Lang::Por,
        "nl" => Lang::Nld,
        _ => return Lang::from_code(code),
    };
    Some(lang)
}

/// Reject content confidently detected as a language other than `expected`.
/// Text too short or ambiguous to classify passes, as does an expected code
/// whatlang does not know.
pub fn check_language(content: &str, expected: &str) -> Result<(), Rejection> {
    let Some(wanted) = expected_lang(expected) else {
        return Ok(());
    };
    let text = IMAGE_MARKER_REGEX.replace_all(content, "");
    if text.trim().len() < MIN_LANGUAGE_TEXT {
        return Ok(());
    }

    match whatlang::detect(&text) {
        Some(info) if info.confidence() >= MIN_LANGUAGE_CONFIDENCE && info.lang() != wanted => {
            Err(Rejection::LanguageMismatch {
                detected: info.lang().code().to_string(),
                expected: expected.to_string(),
            })
        }
        _ => Ok(()),
    }
}

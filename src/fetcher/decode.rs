use encoding_rs::Encoding;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::fetcher::errors::FetchError;

const SNIFF_BYTES: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Decode an HTML body to UTF-8 using the declared charset, falling back to
/// a statistical guess when nothing is declared or the declaration is wrong.
pub fn decode_html(content_type: &str, body: &[u8]) -> Result<(String, &'static Encoding), FetchError> {
    let declared = declared_encoding(content_type, body);
    let encoding = declared.unwrap_or_else(|| guess_encoding(body));

    let (decoded, _, had_errors) = encoding.decode(body);
    if !had_errors {
        return Ok((decoded.into_owned(), encoding));
    }

    let guessed = guess_encoding(body);
    if declared.is_some() && guessed != encoding {
        debug!(
            "Declared charset {} did not decode cleanly, trying {}",
            encoding.name(),
            guessed.name()
        );
        let (decoded, _, had_errors) = guessed.decode(body);
        if !had_errors {
            return Ok((decoded.into_owned(), guessed));
        }
    }

    Err(FetchError::Charset(format!(
        "body is not valid {}",
        encoding.name()
    )))
}

fn declared_encoding(content_type: &str, body: &[u8]) -> Option<&'static Encoding> {
    if let Some(encoding) = label_from(&CHARSET_REGEX, content_type) {
        return Some(encoding);
    }

    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_BYTES)]);
    label_from(&META_CHARSET_REGEX, &head).or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &head))
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

fn guess_encoding(body: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&body[..body.len().min(SNIFF_BYTES)], body.len() <= SNIFF_BYTES);
    detector.guess(None, true)
}

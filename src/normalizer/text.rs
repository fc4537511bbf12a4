use regex::Regex;
use std::sync::LazyLock;

/// UTF-8 punctuation that was decoded as Windows-1252 somewhere upstream.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€™", "\u{2019}"),
    ("â€˜", "\u{2018}"),
    ("â€œ", "\u{201C}"),
    ("â€\u{9d}", "\u{201D}"),
    ("â€¦", "\u{2026}"),
    ("â€“", "\u{2013}"),
    ("â€”", "\u{2014}"),
    ("Â\u{a0}", "\u{a0}"),
];

const ASCII_PUNCTUATION: &[(char, &str)] = &[
    ('\u{2019}', "'"),
    ('\u{2018}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2026}', "..."),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
];

// Emoticons, pictographs, transport, flags, supplemental and extended-A
// pictographs, misc symbols, dingbats, enclosed alphanumerics, variation
// selectors, combining marks for symbols and tag characters.
const EMOJI_RANGES: &str = concat!(
    r"\x{1F600}-\x{1F64F}",
    r"\x{1F300}-\x{1F5FF}",
    r"\x{1F680}-\x{1F6FF}",
    r"\x{1F1E0}-\x{1F1FF}",
    r"\x{1F900}-\x{1F9FF}",
    r"\x{1FA70}-\x{1FAFF}",
    r"\x{2600}-\x{26FF}",
    r"\x{2702}-\x{27B0}",
    r"\x{24C2}",
    r"\x{2B50}\x{2B55}",
    r"\x{1F170}-\x{1F251}",
    r"\x{FE00}-\x{FE0F}",
    r"\x{20D0}-\x{20FF}",
    r"\x{E0020}-\x{E007F}",
);

static EMOJI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"[ \t]?[{ranges}](?:[{ranges}]|\x{{200D}})*",
        ranges = EMOJI_RANGES
    ))
    .unwrap()
});

static HORIZONTAL_SPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\x{A0}]+").unwrap());

static LINE_EDGE_SPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ | $").unwrap());

static NEWLINE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Replace mis-decoded quote, dash and ellipsis sequences with the
/// punctuation they were meant to be. Clean text comes back unchanged.
pub fn repair_mojibake(text: &str) -> String {
    if !text.contains('â') && !text.contains('Â') {
        return text.to_string();
    }

    let mut repaired = text.to_string();
    for (broken, fixed) in MOJIBAKE {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }
    repaired
}

/// Fold typographic quotes, dashes and ellipses to plain ASCII.
pub fn fold_punctuation(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.chars() {
        match ASCII_PUNCTUATION.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(ch),
        }
    }
    folded
}

/// Remove emoji and pictographs along with one space directly before them.
pub fn strip_emoji(text: &str) -> String {
    EMOJI_REGEX.replace_all(text, "").into_owned()
}

/// Collapse horizontal whitespace and blank lines, then trim.
pub fn collapse_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let spaced = HORIZONTAL_SPACE_REGEX.replace_all(&text, " ");
    let trimmed_lines = LINE_EDGE_SPACE_REGEX.replace_all(&spaced, "");
    let collapsed = NEWLINE_RUN_REGEX.replace_all(&trimmed_lines, "\n");
    collapsed.trim().to_string()
}

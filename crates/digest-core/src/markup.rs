//! The light markup used in generated summaries.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Rewrite `**text**` spans as `<strong>text</strong>`.
///
/// Spans do not cross line breaks; an unmatched `**` is left alone.
pub fn bold_to_html(text: &str) -> String {
    BOLD_RE.replace_all(text, "<strong>$1</strong>").into_owned()
}

/// Remove every `<...>` tag, keeping the text between tags.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Plain text suitable for copying: markup converted, then stripped.
pub fn to_plain_text(summary: &str) -> String {
    strip_tags(&bold_to_html(summary))
}

/// Split `text` into `(segment, is_bold)` runs for terminal rendering.
pub fn bold_segments(text: &str) -> Vec<(&str, bool)> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in BOLD_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push((&text[last..whole.start()], false));
        }
        if !inner.as_str().is_empty() {
            segments.push((inner.as_str(), true));
        }
        last = whole.end();
    }
    if last < text.len() {
        segments.push((&text[last..], false));
    }
    segments
}

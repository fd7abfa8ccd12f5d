//! Keyword-triggered text extraction.
//!
//! A chat transcript is scanned line by line. Consecutive lines mentioning
//! any keyword form a segment; the first line without a keyword closes it.
//! A segment still open when the input ends is dropped, not emitted.

use derive_more::Display;

/// Default lyric keywords.
pub use hoard_config::DEFAULT_KEYWORDS;

/// A run of consecutive keyword lines, joined by `\n` and trimmed.
#[derive(Debug, Clone, Display, PartialEq, Eq)]
pub struct TextSegment(String);
impl TextSegment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extract every closed segment from `lines`. Keyword matching is a
/// case-insensitive substring match.
pub fn extract_segments<'a, I, K>(lines: I, keywords: &[K]) -> Vec<TextSegment>
where
    I: IntoIterator<Item = &'a str>,
    K: AsRef<str>,
{
    let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).filter(|k| !k.is_empty()).collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut collecting = false;
    for line in lines {
        let lowered = line.to_lowercase();
        if keywords.iter().any(|k| lowered.contains(k.as_str())) {
            collecting = true;
            current.push_str(line);
            current.push('\n');
        } else if collecting && !current.is_empty() {
            segments.push(TextSegment(current.trim().to_string()));
            current.clear();
            collecting = false;
        }
    }
    if !current.is_empty() {
        tracing::debug!(lines = current.lines().count(), "Dropping unterminated segment at end of input");
    }
    segments
}

use regex::Regex;

/// Pulls video ids out of an opaque search results page.
///
/// Matches the 11 non-whitespace characters that follow `watch?v=`. The first
/// match in document order wins; there is no ranking or deduplication.
#[derive(Debug, Clone)]
pub struct VideoIdExtractor {
    pattern: Regex,
}

impl VideoIdExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"watch\?v=(\S{11})").expect("video id pattern is valid"),
        }
    }

    /// First video id in the text, if any
    pub fn first_id<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }

    /// Every video id in document order, duplicates included
    pub fn all_ids<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str())
            .collect()
    }
}

impl Default for VideoIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

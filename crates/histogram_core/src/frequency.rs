use std::cmp::Reverse;
use std::collections::HashMap;

/// Number of ranked entries kept when the caller does not choose one.
pub const DEFAULT_TOP_K: usize = 20;

/// One row of the ranked histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub word: String,
    pub count: u32,
}

impl RankedEntry {
    pub fn new(word: impl Into<String>, count: u32) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Ranked entries, count descending, ties in first-occurrence order.
pub type RankedList = Vec<RankedEntry>;

/// Splits text on runs of whitespace. Empty tokens are never yielded.
///
/// Whitespace is `char::is_whitespace`, the Unicode `White_Space` property.
/// This is not the `\s` class of most regex engines: U+0085 (NEL) separates
/// tokens here, while U+FEFF (BOM / zero-width no-break space) does not and
/// stays part of the token it touches.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(char::is_whitespace)
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCount<'a> {
    pub word: &'a str,
    pub count: u32,
    /// Position of the first occurrence in the token sequence.
    pub first_seen: usize,
}

/// Occurrence counts keyed by token, borrowing from the source text.
///
/// Entries are stored in first-occurrence order next to a lookup index, so
/// tie-breaking never depends on hash iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap<'a> {
    entries: Vec<WordCount<'a>>,
    slots: HashMap<&'a str, usize>,
    total_tokens: usize,
}

impl<'a> FrequencyMap<'a> {
    pub fn from_text(text: &'a str) -> Self {
        Self::from_tokens(tokenize(text))
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = Self::default();
        for (position, token) in tokens.into_iter().enumerate() {
            map.record(token, position);
        }
        map
    }

    fn record(&mut self, token: &'a str, position: usize) {
        self.total_tokens += 1;
        match self.slots.get(token) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.count = entry.count.saturating_add(1);
            }
            None => {
                self.slots.insert(token, self.entries.len());
                self.entries.push(WordCount {
                    word: token,
                    count: 1,
                    first_seen: position,
                });
            }
        }
    }

    pub fn get(&self, token: &str) -> Option<u32> {
        self.slots.get(token).map(|&slot| self.entries[slot].count)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Iterates in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &WordCount<'a>> {
        self.entries.iter()
    }

    /// Sorts by count descending, breaks ties by first occurrence and keeps
    /// the first `k` entries.
    pub fn rank(&self, k: usize) -> RankedList {
        if k == 0 {
            return Vec::new();
        }
        let mut ordered: Vec<&WordCount<'a>> = self.entries.iter().collect();
        ordered.sort_unstable_by_key(|entry| (Reverse(entry.count), entry.first_seen));
        ordered.truncate(k);
        ordered
            .into_iter()
            .map(|entry| RankedEntry::new(entry.word, entry.count))
            .collect()
    }
}

/// Tokenize, count and rank in one call.
pub fn word_histogram(text: &str, k: usize) -> RankedList {
    FrequencyMap::from_text(text).rank(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_leading_and_trailing_whitespace() {
        let tokens: Vec<_> = tokenize("  \tone\n\ntwo,  three.\r\n").collect();
        assert_eq!(tokens, vec!["one", "two,", "three."]);
    }

    #[test]
    fn tokenize_whitespace_only_is_empty() {
        assert_eq!(tokenize(" \n\t  ").count(), 0);
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn tokenize_uses_unicode_white_space() {
        let tokens: Vec<_> = tokenize("a\u{0085}b \u{FEFF}c\u{00A0}d").collect();
        assert_eq!(tokens, vec!["a", "b", "\u{FEFF}c", "d"]);
    }

    #[test]
    fn count_saturates_instead_of_wrapping() {
        let mut map = FrequencyMap::from_text("w");
        map.entries[0].count = u32::MAX;
        map.record("w", 1);
        assert_eq!(map.get("w"), Some(u32::MAX));
        assert_eq!(map.total_tokens(), 2);
    }

    #[test]
    fn first_seen_tracks_token_position() {
        let map = FrequencyMap::from_text("b a b c");
        let seen: Vec<_> = map.iter().map(|e| (e.word, e.first_seen)).collect();
        assert_eq!(seen, vec![("b", 0), ("a", 1), ("c", 3)]);
    }

    #[test]
    fn rank_zero_is_empty() {
        assert!(FrequencyMap::from_text("a a b").rank(0).is_empty());
    }
}

//! Tokenizer - turns free text into the set of significant words.

use std::collections::BTreeSet;

use super::stop_words::is_stop_word;

/// Tokens shorter than this are discarded.
const MIN_TOKEN_LEN: usize = 3;

/// A set of significant lowercase tokens.
///
/// Backed by an ordered set so iteration is reproducible; callers must not
/// attach meaning to that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(BTreeSet<String>);

impl TokenSet {
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of tokens shared with another set.
    pub fn overlap(&self, other: &TokenSet) -> usize {
        self.0.intersection(&other.0).count()
    }
}

impl FromIterator<String> for TokenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Text normalization and significant-word extraction.
pub struct Tokenizer;

impl Tokenizer {
    /// Tokenizes text into a set of significant words.
    ///
    /// Lowercases, blanks everything outside `[a-z0-9]` and whitespace,
    /// splits on whitespace, keeps tokens longer than two characters and
    /// drops stop words. Empty or whitespace-only input yields an empty set.
    pub fn tokenize(text: &str) -> TokenSet {
        Self::significant_words(text).into_iter().collect()
    }

    /// Same tokens as `tokenize`, de-duplicated in first-occurrence order.
    pub fn tokens_in_order(text: &str) -> Vec<String> {
        let mut ordered: Vec<String> = Vec::new();
        for word in Self::significant_words(text) {
            if !ordered.contains(&word) {
                ordered.push(word);
            }
        }
        ordered
    }

    fn significant_words(text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        normalized
            .split_whitespace()
            .filter(|w| w.len() >= MIN_TOKEN_LEN && !is_stop_word(w))
            .map(str::to_string)
            .collect()
    }
}

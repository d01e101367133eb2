//! Words that carry no signal when matching notes to use-cases.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Common English function words plus words that show up in almost every
/// engagement note regardless of topic.
pub const STOP_WORDS: &[&str] = &[
    // function words
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "have", "him", "his", "how", "its", "may", "new", "now", "old",
    "see", "two", "way", "who", "did", "get", "got", "let", "say", "she", "too", "use", "with",
    "that", "this", "from", "they", "will", "would", "there", "their", "what", "about", "which",
    "when", "make", "like", "time", "just", "know", "take", "into", "year", "your", "some",
    "could", "them", "than", "then", "look", "only", "come", "over", "think", "also", "back",
    "after", "work", "first", "well", "even", "want", "because", "these", "give", "most",
    "been", "were", "being", "does", "should", "each", "such", "here", "where", "while",
    "very", "more", "much", "many", "other", "those", "upon", "via", "per", "own", "same",
    "both", "few", "why", "yes", "off", "again", "once", "under", "further", "before",
    "during", "above", "below", "between", "through", "against", "without", "within",
    // engagement noise
    "meeting", "meetings", "notes", "note", "phase", "phases", "call", "calls", "agenda",
    "attendees", "discussion", "discussed", "team", "teams", "client", "today", "next",
    "steps", "action", "items", "follow", "update", "updates",
];

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Returns true if the (lowercase) word is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

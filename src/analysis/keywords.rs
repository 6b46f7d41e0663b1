//! Keyword frequency extraction
//!
//! Tokens are maximal runs of word characters in the lower-cased, joined
//! feedback text. Stop words and excluded words (typically the username) are
//! dropped before counting.

use crate::types::KeywordCount;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Number of keywords returned when the caller does not ask for a limit
pub const DEFAULT_KEYWORD_LIMIT: usize = 5;

/// Articles, prepositions, conjunctions, pronouns and auxiliaries
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "me", "my",
    "no", "not", "of", "on", "or", "our", "she", "so", "than", "that", "the", "their", "them",
    "then", "there", "they", "this", "to", "too", "up", "us", "very", "was", "we", "were", "what",
    "when", "which", "who", "why", "will", "with", "you", "your",
];

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("Valid token regex"));

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Whether `word` (already lower-cased) is a stop word
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Rank the most frequent keywords across `texts`
///
/// Words in `exclude` are compared case-insensitively. Equal counts keep the
/// order in which the words were first seen.
pub fn extract_top_keywords<S: AsRef<str>>(
    texts: &[S],
    exclude: &HashSet<String>,
    limit: usize,
) -> Vec<KeywordCount> {
    let joined = texts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let exclude: HashSet<String> = exclude.iter().map(|w| w.to_lowercase()).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for token in TOKEN.find_iter(&joined).map(|m| m.as_str()) {
        if is_stop_word(token) || exclude.contains(token) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<KeywordCount> = order
        .into_iter()
        .map(|word| KeywordCount {
            word: word.to_string(),
            count: counts[word],
        })
        .collect();

    // stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);

    debug!("Extracted {} keywords", ranked.len());
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn exclude(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_counts_across_texts() {
        let texts = [
            "@alice needs to fix shipping, so slow!",
            "Slow again, @alice",
            "slow but worth it",
        ];

        let keywords = extract_top_keywords(&texts, &exclude(&["alice"]), 5);

        assert_eq!(
            keywords[0],
            KeywordCount {
                word: "slow".to_string(),
                count: 3
            }
        );
        assert!(keywords.iter().all(|k| k.word != "alice"));
    }

    #[test]
    fn test_username_excluded_case_insensitively() {
        let texts = ["Thanks @Alice!", "ALICE rocks", "alice alice"];

        let keywords = extract_top_keywords(&texts, &exclude(&["AlIcE"]), 10);

        assert!(keywords.iter().all(|k| k.word != "alice"));
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["thanks", "rocks"]);
    }

    #[test]
    fn test_stop_words_removed() {
        let texts = ["The app is the best in the game and it is fast"];

        let keywords = extract_top_keywords(&texts, &HashSet::new(), 10);
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();

        assert_eq!(words, vec!["app", "best", "game", "fast"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let texts = ["zebra apple", "mango zebra apple mango"];

        let keywords = extract_top_keywords(&texts, &HashSet::new(), 5);
        let ranked: Vec<_> = keywords
            .iter()
            .map(|k| (k.word.as_str(), k.count))
            .collect();

        assert_eq!(ranked, vec![("zebra", 2), ("apple", 2), ("mango", 2)]);
    }

    #[test]
    fn test_limit_applies() {
        let texts = ["one two three four five six seven"];

        assert_eq!(extract_top_keywords(&texts, &HashSet::new(), 5).len(), 5);
        assert_eq!(extract_top_keywords(&texts, &HashSet::new(), 2).len(), 2);
        assert!(extract_top_keywords(&texts, &HashSet::new(), 0).is_empty());
    }

    #[test]
    fn test_digits_and_underscores_are_word_characters() {
        let texts = ["order_42 failed, order_42 again; 404 404 404"];

        let keywords = extract_top_keywords(&texts, &HashSet::new(), 5);

        assert_eq!(keywords[0].word, "404");
        assert_eq!(keywords[1].word, "order_42");
        assert_eq!(keywords[1].count, 2);
    }

    #[test]
    fn test_empty_input() {
        let texts: [&str; 0] = [];
        assert!(extract_top_keywords(&texts, &HashSet::new(), 5).is_empty());
    }

    proptest! {
        #[test]
        fn prop_output_never_contains_stop_words_or_username(
            words in proptest::collection::vec("[a-zA-Z]{1,6}", 0..40),
            username in "[a-zA-Z]{1,6}",
        ) {
            let mut texts = words.clone();
            texts.push(format!("@{} {}", username, username.to_uppercase()));

            let keywords = extract_top_keywords(&texts, &exclude(&[username.as_str()]), 20);
            let lowered = username.to_lowercase();

            for keyword in &keywords {
                prop_assert!(!is_stop_word(&keyword.word));
                prop_assert_ne!(keyword.word.as_str(), lowered.as_str());
                prop_assert!(keyword.count >= 1);
            }
            prop_assert!(keywords.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }
}

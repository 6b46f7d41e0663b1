//! Insight synthesis
//!
//! Maps frequent keywords that show up in negatively classified feedback to
//! canned suggestions.
//!
//! Matching checks the keyword as a case-insensitive substring of the raw
//! feedback text, not against tokens, so a short keyword like "ugh" also
//! matches inside "though".

use crate::types::{Insight, KeywordCount, SentimentResult};
use std::collections::HashMap;
use tracing::debug;

/// Number of insights returned when the caller does not ask for a limit
pub const DEFAULT_INSIGHT_LIMIT: usize = 3;

/// Built-in keyword → suggestion table
pub const SUGGESTIONS: &[(&str, &str)] = &[
    ("shipping", "Fix shipping delays"),
    ("slow", "Improve speed or delivery times"),
    ("crashed", "Stabilize the app and fix crashes"),
    ("expensive", "Review pricing or offer discounts"),
    ("terrible", "Investigate service quality complaints"),
    ("ugh", "Reduce customer frustration points"),
    ("fix", "Prioritize reported fixes"),
];

/// Suggestion lookup keyed by lower-cased keyword
#[derive(Debug, Clone)]
pub struct SuggestionTable {
    entries: HashMap<String, String>,
}

impl SuggestionTable {
    /// Build a table from `(keyword, suggestion)` pairs
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .get(&keyword.to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SuggestionTable {
    fn default() -> Self {
        Self::new(SUGGESTIONS.iter().copied())
    }
}

/// Rank keywords with negative mentions, best first
///
/// Ordered by `(negative_mentions, total_mentions)` descending; equal pairs
/// keep the order of `keyword_counts`.
pub fn rank_insights(
    keyword_counts: &[KeywordCount],
    sentiment_results: &[SentimentResult],
    suggestions: &SuggestionTable,
    top_n: usize,
) -> Vec<Insight> {
    let negative_texts: Vec<String> = sentiment_results
        .iter()
        .filter(|r| r.is_negative())
        .map(|r| r.text.to_lowercase())
        .collect();

    let mut insights: Vec<Insight> = keyword_counts
        .iter()
        .filter_map(|keyword| {
            let suggestion = suggestions.get(&keyword.word)?;
            let needle = keyword.word.to_lowercase();
            let negative_mentions = negative_texts
                .iter()
                .filter(|text| text.contains(&needle))
                .count();

            (negative_mentions > 0).then(|| Insight {
                keyword: keyword.word.clone(),
                suggestion: suggestion.to_string(),
                total_mentions: keyword.count,
                negative_mentions,
            })
        })
        .collect();

    insights.sort_by(|a, b| {
        (b.negative_mentions, b.total_mentions).cmp(&(a.negative_mentions, a.total_mentions))
    });
    insights.truncate(top_n);

    debug!("Synthesized {} insights", insights.len());
    insights
}

/// Rank and format insights as human-readable strings
pub fn synthesize(
    keyword_counts: &[KeywordCount],
    sentiment_results: &[SentimentResult],
    suggestions: &SuggestionTable,
    top_n: usize,
) -> Vec<String> {
    rank_insights(keyword_counts, sentiment_results, suggestions, top_n)
        .iter()
        .map(ToString::to_string)
        .collect()
}

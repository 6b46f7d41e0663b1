//! Word-list sentiment scorer
//!
//! Counts positive and negative cue words per text. Intended for offline
//! development and demos where no model backend is reachable.

use crate::error::Result;
use crate::sentiment::SentimentClassifier;
use crate::types::{SentimentLabel, SentimentResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Model name reported by the lexicon backend
pub const LEXICON_MODEL_NAME: &str = "lexicon";

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "best", "excellent", "fantastic", "glad", "good", "great", "happy",
    "helpful", "love", "nice", "perfect", "quick", "thanks", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "awful", "bad", "broken", "crash", "crashed", "disappointed", "expensive", "fix", "hate",
    "horrible", "poor", "slow", "terrible", "ugh", "worst", "wrong",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("Valid word regex"));

/// Lexicon-based binary sentiment classifier
pub struct LexiconSentimentClassifier {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl LexiconSentimentClassifier {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }

    /// Score a single text
    ///
    /// Ties (including texts with no cue words) are labelled POSITIVE with
    /// confidence 0.5.
    pub fn score(&self, text: &str) -> SentimentResult {
        let lowered = text.to_lowercase();
        let (mut positive, mut negative) = (0usize, 0usize);

        for word in WORD.find_iter(&lowered).map(|m| m.as_str()) {
            if self.positive.contains(word) {
                positive += 1;
            } else if self.negative.contains(word) {
                negative += 1;
            }
        }

        let total = positive + negative;
        let label = if negative > positive {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Positive
        };
        let confidence = if total == 0 {
            0.5
        } else {
            0.5 + 0.5 * positive.abs_diff(negative) as f32 / total as f32
        };

        SentimentResult::new(text, label, confidence)
    }
}

impl Default for LexiconSentimentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentClassifier for LexiconSentimentClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentResult>> {
        Ok(texts.iter().map(|text| self.score(text)).collect())
    }

    fn model_name(&self) -> &str {
        LEXICON_MODEL_NAME
    }
}

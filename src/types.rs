//! Core data types for the feedback analyzer
//!
//! Only [`FeedbackRecord`] is persisted. Sentiment results, keyword counts and
//! insights are derived on every analysis request.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used for persisted and serialized `created_at` values
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unique record identifier assigned by the store
pub type RecordId = i64;

/// One stored piece of feedback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub id: RecordId,
    pub username: String,
    pub text: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// Projection of a record returned when listing a user's feedback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredFeedback {
    pub text: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// Binary sentiment label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Parse a model label, accepting the common spellings used by
    /// text-classification checkpoints
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Some(SentimentLabel::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "POSITIVE"),
            SentimentLabel::Negative => write!(f, "NEGATIVE"),
        }
    }
}

/// Classification of one feedback text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentResult {
    pub text: String,
    #[serde(rename = "sentiment")]
    pub label: SentimentLabel,
    /// Model confidence in `[0, 1]`
    pub confidence: f32,
}

impl SentimentResult {
    pub fn new(text: impl Into<String>, label: SentimentLabel, confidence: f32) -> Self {
        Self {
            text: text.into(),
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.label == SentimentLabel::Negative
    }
}

/// Frequency of one keyword across a user's feedback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Suggestion derived from a keyword with negative mentions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Insight {
    pub keyword: String,
    pub suggestion: String,
    pub total_mentions: usize,
    pub negative_mentions: usize,
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}—mentioned {} times, {} negative",
            self.suggestion, self.total_mentions, self.negative_mentions
        )
    }
}

// Serialize timestamps as `YYYY-MM-DD HH:MM:SS`
pub(crate) mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

//! Synthetic feedback generation
//!
//! Feedback strings are produced by substituting a username into a fixed set
//! of templates. Output is random and not reproducible between calls unless a
//! seeded RNG is supplied through [`FeedbackGenerator::generate_with_rng`].

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Maximum number of feedback items produced per request
pub const MAX_FEEDBACK_COUNT: usize = 10;

/// Number of items produced when the caller does not ask for a count
pub const DEFAULT_FEEDBACK_COUNT: usize = 5;

/// Placeholder replaced by the username in every template
const USERNAME_PLACEHOLDER: &str = "{username}";

/// Built-in feedback templates
pub const FEEDBACK_TEMPLATES: &[&str] = &[
    "Great job @{username}, love your product!",
    "@{username} needs to fix shipping, so slow!",
    "Amazing service from @{username} today!",
    "@{username}, your app crashed again...",
    "Thanks @{username} for the quick response!",
    "Terrible experience with @{username}, ugh.",
    "@{username} is the best in the game!",
    "Why is @{username} so expensive?",
];

/// Template-based feedback generator
#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    templates: Vec<String>,
}

impl FeedbackGenerator {
    /// Create a generator over the built-in templates
    pub fn new() -> Self {
        Self {
            templates: FEEDBACK_TEMPLATES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Number of templates available
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Generate up to [`MAX_FEEDBACK_COUNT`] feedback strings for `username`
    ///
    /// Larger counts are clamped silently rather than rejected.
    pub fn generate(&self, username: &str, count: usize) -> Vec<String> {
        self.generate_with_rng(&mut rand::thread_rng(), username, count)
    }

    /// Same as [`generate`](Self::generate) with a caller-provided RNG
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        username: &str,
        count: usize,
    ) -> Vec<String> {
        let count = clamp_count(count);
        debug!("Generating {} feedback items for '{}'", count, username);

        (0..count)
            .filter_map(|_| self.templates.choose(rng))
            .map(|template| template.replace(USERNAME_PLACEHOLDER, username))
            .collect()
    }
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a requested count to the allowed maximum
pub fn clamp_count(count: usize) -> usize {
    count.min(MAX_FEEDBACK_COUNT)
}

//! Linguistic feature extraction from raw utterance text.
//!
//! Heuristic lexical/structural statistics only — no trained model. The
//! extractor is a pure function of its input: identical text always yields
//! an identical bundle.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::lexicon;
use crate::config::Settings;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9']+").unwrap());
static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Structured lexical/syntactic signals derived from one utterance.
///
/// Immutable once built. Scores are clamped to `[0, 10]`; the vocabulary
/// score is 0 when the token count is 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    /// Number of tokens in the utterance.
    pub token_count: usize,
    /// Distinct tokens divided by total tokens (0 when empty).
    pub unique_token_ratio: f64,
    /// Mean token length in characters (0 when empty).
    pub avg_word_length: f64,
    /// Number of sentences (at least 1 for non-empty text).
    pub sentence_count: usize,
    /// Subject tags matched against the fixed lexicon, in lexicon order.
    pub topic_tags: Vec<String>,
    /// Structural complexity score, clamped to [0, 10].
    pub complexity: f64,
    /// Vocabulary richness score, clamped to [0, 10].
    pub vocabulary: f64,
}

impl FeatureBundle {
    /// The all-zero bundle returned for empty or whitespace-only input.
    pub fn zero() -> Self {
        Self {
            token_count: 0,
            unique_token_ratio: 0.0,
            avg_word_length: 0.0,
            sentence_count: 0,
            topic_tags: Vec::new(),
            complexity: 0.0,
            vocabulary: 0.0,
        }
    }
}

/// Turns raw text into a [`FeatureBundle`].
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    settings: Settings,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl FeatureExtractor {
    /// Create an extractor with the given tuning settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Analyze one utterance.
    ///
    /// Total and deterministic: every input, however degenerate, maps to a
    /// defined bundle. Empty or whitespace-only text yields
    /// [`FeatureBundle::zero`] rather than an error.
    pub fn analyze(&self, text: &str) -> FeatureBundle {
        let tokens: Vec<String> = TOKEN_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        if tokens.is_empty() {
            return FeatureBundle::zero();
        }

        let token_count = tokens.len();
        let unique_count = {
            let mut seen = std::collections::HashSet::new();
            tokens.iter().filter(|t| seen.insert(t.as_str())).count()
        };
        let unique_token_ratio = unique_count as f64 / token_count as f64;

        let total_chars: usize = tokens.iter().map(|t| t.chars().count()).sum();
        let avg_word_length = total_chars as f64 / token_count as f64;

        let sentence_count = SENTENCE_PATTERN.find_iter(text).count().max(1);
        let avg_sentence_length = token_count as f64 / sentence_count as f64;

        let long_word_ratio = tokens
            .iter()
            .filter(|t| t.chars().count() >= self.settings.long_word_min_chars)
            .count() as f64
            / token_count as f64;

        let complexity = self.complexity_score(avg_word_length, avg_sentence_length, long_word_ratio);
        let vocabulary = clamp_score(6.0 * unique_token_ratio + 4.0 * long_word_ratio);

        FeatureBundle {
            token_count,
            unique_token_ratio,
            avg_word_length,
            sentence_count,
            topic_tags: lexicon::topic_tags(&tokens),
            complexity,
            vocabulary,
        }
    }

    /// Weighted mix of word length, sentence length, and long-word ratio,
    /// each term capped at its weight so the total stays within [0, 10].
    fn complexity_score(
        &self,
        avg_word_length: f64,
        avg_sentence_length: f64,
        long_word_ratio: f64,
    ) -> f64 {
        let word_term = (4.0 * avg_word_length / self.settings.word_length_reference).min(4.0);
        let sentence_term =
            (3.0 * avg_sentence_length / self.settings.sentence_length_reference).min(3.0);
        let long_term = 3.0 * long_word_ratio;
        clamp_score(word_term + sentence_term + long_term)
    }
}

/// Clamp a score to the canonical [0, 10] range.
fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::default()
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let text = "Quantum entanglement defies classical intuition. Does it not?";
        let a = extractor().analyze(text);
        let b = extractor().analyze(text);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_input_yields_zero_bundle() {
        assert_eq!(extractor().analyze(""), FeatureBundle::zero());
        assert_eq!(extractor().analyze("   \t\n"), FeatureBundle::zero());
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let samples = [
            "hi",
            "a a a a a a a a a a a a a a a a a a",
            "Epistemologically, phenomenological hermeneutics problematizes \
             intersubjective interpretability notwithstanding methodological \
             incommensurability considerations.",
            "What is gravity?",
            "...!!!???",
        ];
        for text in samples {
            let bundle = extractor().analyze(text);
            assert!((0.0..=10.0).contains(&bundle.complexity), "{text}");
            assert!((0.0..=10.0).contains(&bundle.vocabulary), "{text}");
        }
    }

    #[test]
    fn test_complex_text_scores_above_simple_text() {
        let simple = extractor().analyze("the cat sat on the mat");
        let complex = extractor().analyze(
            "Thermodynamic equilibrium presupposes statistically homogeneous \
             microstate distributions throughout macroscopic observational timescales.",
        );
        assert!(complex.complexity > simple.complexity);
        assert!(complex.vocabulary > simple.vocabulary);
    }

    #[test]
    fn test_sentence_count_defaults_to_one() {
        let bundle = extractor().analyze("no terminal punctuation here");
        assert_eq!(bundle.sentence_count, 1);
    }

    #[test]
    fn test_gravity_question_is_tagged_physics() {
        let bundle = extractor().analyze("What is gravity?");
        assert_eq!(bundle.topic_tags, vec!["physics".to_string()]);
    }

    #[test]
    fn test_unique_ratio_drops_with_repetition() {
        let varied = extractor().analyze("every word here differs completely");
        let repeated = extractor().analyze("word word word word word word");
        assert!(varied.unique_token_ratio > repeated.unique_token_ratio);
    }
}

//! Running intelligence-level estimation with temporal smoothing.
//!
//! The estimator regresses a per-session level toward each turn's blended
//! score with a decaying learning rate and a hard per-turn step bound, so a
//! single utterance ("I am a doctor") can never whiplash the estimate.

use serde::{Deserialize, Serialize};

use crate::analysis::FeatureBundle;
use crate::config::Settings;

/// The running per-session belief about a user's sophistication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceEstimate {
    /// Continuous level on the 0–10 scale.
    pub level: f64,
    /// Saturating confidence in the level, 0–1. Increases with every
    /// sample but with diminishing returns.
    pub confidence: f64,
    /// Exponentially smoothed trend of recent per-turn deltas.
    pub trend: f64,
    /// Number of utterances assessed so far. Monotonically non-decreasing;
    /// `assess` increments it by exactly one.
    pub sample_count: u32,
}

impl Default for IntelligenceEstimate {
    fn default() -> Self {
        Self {
            level: 0.0,
            confidence: 0.0,
            trend: 0.0,
            sample_count: 0,
        }
    }
}

/// Updates an [`IntelligenceEstimate`] from one turn's features.
#[derive(Debug, Clone)]
pub struct IntelligenceEstimator {
    settings: Settings,
}

impl Default for IntelligenceEstimator {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl IntelligenceEstimator {
    /// Create an estimator with the given tuning settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Blend vocabulary and complexity into the single scalar the level
    /// regresses toward.
    pub fn blended_score(&self, bundle: &FeatureBundle) -> f64 {
        let w = self.settings.blend_vocabulary_weight;
        w * bundle.vocabulary + (1.0 - w) * bundle.complexity
    }

    /// Fold one turn's features into the prior estimate.
    ///
    /// Total for any valid bundle. The first-ever assessment (sample count
    /// 0) has no prior to regress toward: the level is seeded directly from
    /// the blended score at low confidence. Every later turn moves the
    /// level by at most `max_step`, scaled by a learning rate that decays
    /// as samples accumulate.
    pub fn assess(
        &self,
        bundle: &FeatureBundle,
        prior: &IntelligenceEstimate,
    ) -> IntelligenceEstimate {
        let blended = self.blended_score(bundle);
        let sample_count = prior.sample_count + 1;

        if prior.sample_count == 0 {
            return IntelligenceEstimate {
                level: blended.clamp(0.0, 10.0),
                confidence: self.confidence_for(sample_count),
                trend: 0.0,
                sample_count,
            };
        }

        let learning_rate = self.settings.base_learning_rate
            / (1.0 + self.settings.learning_rate_decay * prior.sample_count as f64);
        let step = ((blended - prior.level) * learning_rate)
            .clamp(-self.settings.max_step, self.settings.max_step);

        let alpha = self.settings.trend_alpha;
        IntelligenceEstimate {
            level: (prior.level + step).clamp(0.0, 10.0),
            confidence: self.confidence_for(sample_count),
            trend: alpha * step + (1.0 - alpha) * prior.trend,
            sample_count,
        }
    }

    /// Saturating confidence curve: n / (n + half_life).
    fn confidence_for(&self, sample_count: u32) -> f64 {
        let n = sample_count as f64;
        n / (n + self.settings.confidence_half_life)
    }
}

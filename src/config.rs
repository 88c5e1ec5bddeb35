//! Tuning constants and deployment settings for the pipeline.
//!
//! Every scoring weight, smoothing constant, and threshold used by the
//! extractor, estimator, and policy lives here, so the numbers are
//! documented in one place and test fixtures can override them.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for the assessment and response pipeline.
///
/// `Default` yields the documented production constants. All scores live on
/// a 0–10 scale; confidence lives on 0–1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Reference average word length mapped to a full complexity
    /// contribution (characters).
    pub word_length_reference: f64,
    /// Reference average sentence length mapped to a full complexity
    /// contribution (tokens).
    pub sentence_length_reference: f64,
    /// Minimum character count for a token to count as a long word.
    pub long_word_min_chars: usize,
    /// Weight of the vocabulary score in the blended score; complexity
    /// gets the complement.
    pub blend_vocabulary_weight: f64,
    /// Largest movement of the intelligence level in a single turn.
    pub max_step: f64,
    /// Learning rate applied to the first regression step.
    pub base_learning_rate: f64,
    /// Per-sample decay of the learning rate (later turns move less).
    pub learning_rate_decay: f64,
    /// EMA weight for the smoothed trend of per-turn deltas.
    pub trend_alpha: f64,
    /// Sample count at which confidence reaches 0.5 (saturating curve).
    pub confidence_half_life: f64,
    /// Upper bounds of the Novice / Intermediate / Advanced tiers.
    /// A level exactly on a bound resolves to the lower tier.
    pub tier_thresholds: [f64; 3],
    /// Below this confidence the policy hedges and asks a probing
    /// follow-up instead of committing to a register.
    pub hedge_confidence: f64,
    /// Path of the SQLite session database.
    pub db_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_length_reference: 7.0,
            sentence_length_reference: 20.0,
            long_word_min_chars: 7,
            blend_vocabulary_weight: 0.5,
            max_step: 1.5,
            base_learning_rate: 0.6,
            learning_rate_decay: 0.25,
            trend_alpha: 0.3,
            confidence_half_life: 4.0,
            tier_thresholds: [2.5, 5.0, 7.5],
            hedge_confidence: 0.4,
            db_path: default_db_path(),
        }
    }
}

impl Settings {
    /// Load settings, honoring environment overrides.
    ///
    /// `EDUMENTOR_DB` overrides the session database path.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(path) = env::var("EDUMENTOR_DB") {
            settings.db_path = PathBuf::from(path);
        }
        settings
    }
}

/// Returns the default path of the session database.
///
/// Uses the platform-specific data directory, creating it if necessary.
/// On Linux: `~/.local/share/edumentor`; on macOS:
/// `~/Library/Application Support/edumentor`; on Windows:
/// `%LOCALAPPDATA%\edumentor`.
pub fn default_db_path() -> PathBuf {
    let data_dir = if cfg!(target_os = "macos") {
        let home = env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("edumentor")
    } else if cfg!(target_os = "windows") {
        let local_app_data = env::var("LOCALAPPDATA")
            .unwrap_or_else(|_| env::var("APPDATA").unwrap_or_else(|_| "C:\\tmp".to_string()));
        PathBuf::from(local_app_data).join("edumentor")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("edumentor")
    };

    let _ = std::fs::create_dir_all(&data_dir);
    data_dir.join("sessions.db")
}

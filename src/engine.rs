//! One-turn orchestration of the assessment and response pipeline.
//!
//! The per-turn sequence:
//! 1. Load the session snapshot
//! 2. Extract features from the utterance
//! 3. Fold them into the intelligence estimate
//! 4. Checkpoint the update into the store
//! 5. Synthesize the calibrated reply
//! 6. Checkpoint used topics and count the completed turn
//!
//! Every stage is pure and fast; nothing here suspends or blocks, so a turn
//! for one session always runs end-to-end before the next begins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::analysis::FeatureExtractor;
use crate::assessment::IntelligenceEstimator;
use crate::config::Settings;
use crate::knowledge::TopicLookup;
use crate::response::{Reply, ResponsePolicy, TemplateBank};
use crate::session::SessionStore;
use crate::utilities::SessionError;

/// One user utterance. Created per turn, never persisted.
#[derive(Debug, Clone)]
pub struct Utterance {
    /// The session this utterance belongs to.
    pub session_id: Uuid,
    /// The raw text as typed.
    pub text: String,
    /// When the utterance arrived.
    pub timestamp: DateTime<Utc>,
}

impl Utterance {
    /// Capture an utterance for a session at the current instant.
    pub fn new(session_id: Uuid, text: &str) -> Self {
        Self {
            session_id,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Wires the pure stages and the session store into complete turns.
pub struct TurnEngine {
    extractor: FeatureExtractor,
    estimator: IntelligenceEstimator,
    policy: ResponsePolicy,
    store: Arc<SessionStore>,
    knowledge: Arc<dyn TopicLookup>,
}

impl TurnEngine {
    /// Build an engine from settings, a session store, and a fact lookup.
    pub fn new(
        settings: Settings,
        store: Arc<SessionStore>,
        knowledge: Arc<dyn TopicLookup>,
    ) -> Self {
        Self {
            extractor: FeatureExtractor::new(settings.clone()),
            estimator: IntelligenceEstimator::new(settings.clone()),
            policy: ResponsePolicy::new(settings, TemplateBank::default()),
            store,
            knowledge,
        }
    }

    /// The session store this engine mutates.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Process one utterance end-to-end and return the calibrated reply.
    ///
    /// Fails only with [`SessionError`]; the pipeline stages themselves are
    /// total.
    pub fn run_turn(&self, session_id: Uuid, text: &str) -> Result<Reply, SessionError> {
        let utterance = Utterance::new(session_id, text);
        let record = self.store.load(&session_id)?;

        let bundle = self.extractor.analyze(&utterance.text);
        let estimate = self.estimator.assess(&bundle, &record.estimate);
        log::debug!(
            "session {}: level {:.2} -> {:.2} (confidence {:.2}, samples {})",
            session_id,
            record.estimate.level,
            estimate.level,
            estimate.confidence,
            estimate.sample_count
        );

        self.store
            .apply_intelligence_update(&session_id, &bundle, estimate.clone())?;

        let reply = self.policy.respond(
            &utterance.text,
            &estimate,
            &bundle.topic_tags,
            self.knowledge.as_ref(),
        );

        self.store.record_topics(&session_id, &reply.topics_used)?;
        self.store.increment_interaction(&session_id)?;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;

    fn engine() -> TurnEngine {
        TurnEngine::new(
            Settings::default(),
            Arc::new(SessionStore::in_memory()),
            Arc::new(KnowledgeBase::default()),
        )
    }

    #[test]
    fn test_new_session_first_gravity_turn() {
        let engine = engine();
        let id = engine.store().create_or_resume("Ada");
        assert_eq!(engine.store().load(&id).unwrap().estimate.sample_count, 0);

        let reply = engine.run_turn(id, "What is gravity?").unwrap();

        let record = engine.store().load(&id).unwrap();
        assert_eq!(record.estimate.sample_count, 1);
        assert_eq!(record.interaction_count, 1);
        assert!(record.estimate.confidence < 0.4);
        assert!(reply.text.to_lowercase().contains("gravity"));
        assert!(record.topics.contains(&"physics".to_string()));
    }

    #[test]
    fn test_unknown_session_surfaces_not_found() {
        let engine = engine();
        let result = engine.run_turn(Uuid::new_v4(), "hello");
        assert!(matches!(result, Err(SessionError::NotFound { .. })));
    }

    #[test]
    fn test_increasingly_complex_inputs_raise_level_and_confidence() {
        let engine = engine();
        let id = engine.store().create_or_resume("Grace");
        let inputs = [
            "hi",
            "what is a cell",
            "how do cells divide into two cells",
            "explain how dna replication copies genetic instructions",
            "describe how transcription factors regulate gene expression patterns",
            "compare epigenetic methylation against histone acetylation mechanisms",
            "evaluate stochastic transcriptional bursting within single-cell expression variability",
            "formalize regulatory network attractors through dynamical systems terminology rigorously",
            "characterize multistable epigenetic landscapes using bifurcation theoretic formalisms comprehensively",
            "synthesize thermodynamic nonequilibrium constraints governing chromatin remodeling energetics analytically",
        ];

        let mut levels = Vec::new();
        let mut last_confidence = 0.0;
        for text in inputs {
            engine.run_turn(id, text).unwrap();
            let record = engine.store().load(&id).unwrap();
            levels.push(record.estimate.level);
            assert!(record.estimate.confidence > last_confidence);
            last_confidence = record.estimate.confidence;
        }

        // Trend, not strict monotonicity: the tail must sit above the head.
        let head = levels[..3].iter().sum::<f64>() / 3.0;
        let tail = levels[levels.len() - 3..].iter().sum::<f64>() / 3.0;
        assert!(tail > head, "levels {levels:?}");
        assert_eq!(
            engine.store().load(&id).unwrap().estimate.sample_count,
            inputs.len() as u32
        );
    }

    #[test]
    fn test_empty_input_turn_is_total() {
        let engine = engine();
        let id = engine.store().create_or_resume("Ada");
        let reply = engine.run_turn(id, "").unwrap();
        assert!(!reply.text.is_empty());
        let record = engine.store().load(&id).unwrap();
        assert_eq!(record.estimate.sample_count, 1);
        assert_eq!(record.estimate.level, 0.0);
    }
}

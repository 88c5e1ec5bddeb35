//! # edumentor
//!
//! Adaptive educational chatbot core: the Adaptive Assessment & Response
//! Pipeline. Each turn, free-text user input is analyzed into lexical and
//! structural signals, folded into a running per-session intelligence
//! estimate with temporal smoothing, and answered with a reply calibrated
//! to that estimate. Session state lives in a store keyed by session id so
//! the estimation is stateful across turns.
//!
//! The pure stages (extraction, estimation, response) never fail; the only
//! fallible boundary is the session store. A thin interactive front-end
//! ships as the `edumentor` binary.

pub mod analysis;
pub mod assessment;
pub mod config;
pub mod engine;
pub mod knowledge;
pub mod response;
pub mod session;
pub mod utilities;

pub use analysis::{FeatureBundle, FeatureExtractor};
pub use assessment::{IntelligenceEstimate, IntelligenceEstimator};
pub use config::Settings;
pub use engine::{TurnEngine, Utterance};
pub use knowledge::{KnowledgeBase, TopicLookup};
pub use response::{Reply, ResponsePolicy, TemplateBank, Tier};
pub use session::{SessionBackend, SessionRecord, SessionStatus, SessionStore, SqliteSessionStorage};
pub use utilities::SessionError;

/// Library version.
pub const VERSION: &str = "0.3.1";

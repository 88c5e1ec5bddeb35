//! Topic→facts lookup.
//!
//! The pipeline treats fact lookup as a capability: anything implementing
//! [`TopicLookup`] can ground a reply. The built-in [`KnowledgeBase`] embeds
//! a default content file; deployments can load their own JSON instead. A
//! lookup miss is not an error, just an empty fact list.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded topic facts (used when no custom file is provided).
///
/// Facts for each topic are ordered from introductory to advanced; the
/// response policy indexes into that ordering by register.
const EMBEDDED_CONTENT_JSON: &str = include_str!("content.json");

/// Capability consumed by the response policy: facts for a topic tag.
pub trait TopicLookup: Send + Sync {
    /// Return the facts known for `topic`, ordered from introductory to
    /// advanced. Unknown topics yield an empty vector.
    fn facts(&self, topic: &str) -> Vec<String>;
}

/// Static knowledge base backed by an in-memory topic→facts map.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    facts: HashMap<String, Vec<String>>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let facts = serde_json::from_str(EMBEDDED_CONTENT_JSON)
            .expect("Error decoding embedded knowledge content.");
        Self { facts }
    }
}

impl KnowledgeBase {
    /// Load a knowledge base from a JSON file mapping topics to fact lists.
    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let facts = serde_json::from_str(&content)?;
        Ok(Self { facts })
    }

    /// The topic tags this knowledge base has content for.
    pub fn topics(&self) -> Vec<&str> {
        self.facts.keys().map(String::as_str).collect()
    }
}

impl TopicLookup for KnowledgeBase {
    fn facts(&self, topic: &str) -> Vec<String> {
        self.facts.get(topic).cloned().unwrap_or_default()
    }
}

/// Global cached default knowledge base.
static DEFAULT_KB: OnceLock<KnowledgeBase> = OnceLock::new();

/// Get the global default knowledge base with the embedded content.
pub fn get_knowledge_base() -> &'static KnowledgeBase {
    DEFAULT_KB.get_or_init(KnowledgeBase::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content_loads() {
        let kb = KnowledgeBase::default();
        assert!(!kb.facts("physics").is_empty());
        assert!(!kb.facts("history").is_empty());
    }

    #[test]
    fn test_miss_yields_empty_not_error() {
        let kb = KnowledgeBase::default();
        assert!(kb.facts("alchemy").is_empty());
    }

    #[test]
    fn test_every_lexicon_subject_has_facts() {
        let kb = KnowledgeBase::default();
        for &(subject, _) in crate::analysis::LEXICON {
            assert!(
                kb.facts(subject).len() >= 4,
                "subject {subject} needs at least one fact per register"
            );
        }
    }
}

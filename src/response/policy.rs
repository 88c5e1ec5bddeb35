//! Difficulty-calibrated response synthesis.
//!
//! Maps the continuous intelligence estimate onto a small set of discrete
//! registers and renders a reply from the template bank. The mapping rounds
//! conservatively: a level sitting exactly on a tier boundary resolves to
//! the lower tier, because overestimating a learner costs more than
//! underestimating one.

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::assessment::IntelligenceEstimate;
use crate::config::Settings;
use crate::knowledge::TopicLookup;
use crate::response::templates::TemplateBank;

/// Discrete response-calibration registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

impl Tier {
    /// Map a continuous level onto a tier.
    ///
    /// Boundaries are inclusive downward: a level exactly equal to a
    /// threshold lands in the tier below it.
    pub fn from_level(level: f64, thresholds: &[f64; 3]) -> Self {
        if level <= thresholds[0] {
            Tier::Novice
        } else if level <= thresholds[1] {
            Tier::Intermediate
        } else if level <= thresholds[2] {
            Tier::Advanced
        } else {
            Tier::Expert
        }
    }

    /// Template-bank key for this tier.
    pub fn key(&self) -> &'static str {
        match self {
            Tier::Novice => "novice",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
            Tier::Expert => "expert",
        }
    }

    /// Index into a difficulty-ordered fact list for this tier.
    fn fact_index(&self) -> usize {
        match self {
            Tier::Novice => 0,
            Tier::Intermediate => 1,
            Tier::Advanced => 2,
            Tier::Expert => 3,
        }
    }
}

/// A synthesized reply plus the topic tags it actually used, reported back
/// so the session store can append them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// The rendered reply text.
    pub text: String,
    /// Topic tags consumed while building the reply (possibly empty).
    pub topics_used: Vec<String>,
    /// The register the reply was calibrated to.
    pub tier: Tier,
}

/// Selects a register and renders a calibrated reply.
#[derive(Debug, Clone)]
pub struct ResponsePolicy {
    settings: Settings,
    bank: TemplateBank,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::new(Settings::default(), TemplateBank::default())
    }
}

impl ResponsePolicy {
    /// Create a policy with the given settings and template bank.
    pub fn new(settings: Settings, bank: TemplateBank) -> Self {
        Self { settings, bank }
    }

    /// Synthesize a reply for one turn.
    ///
    /// Total: a topic-lookup miss falls back to a generic template, and a
    /// template rendering failure falls back to plain text. When confidence
    /// is below the hedge threshold the reply opens with a hedging preamble
    /// and closes with a probing follow-up to elicit more signal.
    pub fn respond(
        &self,
        _text: &str,
        estimate: &IntelligenceEstimate,
        topics: &[String],
        lookup: &dyn TopicLookup,
    ) -> Reply {
        let tier = Tier::from_level(estimate.level, &self.settings.tier_thresholds);
        let hedging = estimate.confidence < self.settings.hedge_confidence;

        // First tagged topic with any facts wins.
        let grounding = topics.iter().find_map(|topic| {
            let facts = lookup.facts(topic);
            if facts.is_empty() {
                None
            } else {
                Some((topic.clone(), facts))
            }
        });

        let (mut text, topics_used) = match grounding {
            Some((topic, facts)) => {
                let fact = facts[tier.fact_index().min(facts.len() - 1)].clone();
                (self.render_answer(tier, &topic, &fact), vec![topic])
            }
            None => (self.template(tier, "fallback").to_string(), Vec::new()),
        };

        if hedging {
            let hedge = self.bank.get("shared", "hedge").unwrap_or_default();
            let probe = self.template(tier, "probe");
            text = format!("{hedge}{text}{probe}");
        }

        Reply {
            text,
            topics_used,
            tier,
        }
    }

    fn template(&self, tier: Tier, key: &str) -> &str {
        self.bank.get(tier.key(), key).unwrap_or("Tell me more.")
    }

    /// Render the tier's answer template; on failure, fall back to a plain
    /// concatenation so the policy stays total.
    fn render_answer(&self, tier: Tier, topic: &str, fact: &str) -> String {
        let template = self.template(tier, "answer");
        let mut context = Context::new();
        context.insert("topic", topic);
        context.insert("fact", fact);
        match Tera::one_off(template, &context, false) {
            Ok(rendered) => rendered,
            Err(e) => {
                log::warn!("Template rendering failed for tier {:?}: {}", tier, e);
                format!("{topic}: {fact}")
            }
        }
    }
}

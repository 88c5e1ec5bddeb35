//! Linguistic feature extraction.
//!
//! The first pure stage of the pipeline: raw utterance text in, a
//! [`FeatureBundle`] of lexical/structural signals out.

pub mod extractor;
pub mod lexicon;

pub use extractor::{FeatureBundle, FeatureExtractor};
pub use lexicon::{topic_tags, LEXICON};

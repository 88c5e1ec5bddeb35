//! Intelligence-level estimation.
//!
//! The second pure stage: features plus the prior session estimate in, an
//! updated estimate with confidence and smoothed trend out.

pub mod estimator;

pub use estimator::{IntelligenceEstimate, IntelligenceEstimator};

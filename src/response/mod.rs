//! Response synthesis calibrated to the intelligence estimate.

pub mod policy;
pub mod templates;

pub use policy::{Reply, ResponsePolicy, Tier};
pub use templates::TemplateBank;

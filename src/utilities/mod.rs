//! Shared utilities for the edumentor core.

pub mod errors;

pub use errors::SessionError;

//! Test builders for hint types
//!
//! Fluent builders with sensible defaults, for TESTING purposes only.
pub mod builders;

//! Builders for configuration values used in tests and local tooling.

pub mod config;

//! Command-line front end for the trove hint resolver.
//!
//! The binary loads a configuration file, builds the configured collection
//! backend and runs one resolve per invocation. Handlers return plain data so
//! they can be rendered either as a colored summary or as JSON.

pub mod cli;
pub mod commands;

pub use commands::Context;

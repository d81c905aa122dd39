//! Utility functions and constants shared across the workspace.

pub mod constants;
pub mod conversion;
pub mod formatting;

#[cfg(any(test, feature = "testing"))]
pub mod tests;

pub use constants::{
	DECIMAL_PRECISION, DEFAULT_QUERY_TIMEOUT_SECONDS, DEFAULT_RANDOM_SEED,
	DEFAULT_SAMPLING_FACTOR, NICR_PRECISION,
};
pub use conversion::{parse_address, parse_amount};
pub use formatting::format_amount;

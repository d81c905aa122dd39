//! Common types for the trove hint workspace.
//!
//! This crate defines the values that flow between the hint resolver, its
//! remote collection backends, configuration and the command-line front end.
//! Everything here is plain data: no remote calls are made from this crate.

/// Ordering keys (nominal collateral ratios) and their integer derivation.
pub mod key;
/// Network configuration for the chain the collection lives on.
pub mod networks;
/// Partition identifiers for the per-collateral sub-lists.
pub mod partition;
/// Insert positions and redemption hint results.
pub mod position;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Utility functions and constants.
pub mod utils;
/// Configuration validation types.
pub mod validation;

pub use key::{KeyError, OrderingKey};
pub use networks::{NetworkConfig, PartitionConfig, RpcEndpoint};
pub use partition::Partition;
pub use position::{InsertPosition, PositionHint, RedemptionHints, RedemptionPlan};
pub use registry::ImplementationRegistry;
pub use utils::{
	format_amount, parse_address, parse_amount,
	DECIMAL_PRECISION, DEFAULT_QUERY_TIMEOUT_SECONDS, DEFAULT_RANDOM_SEED,
	DEFAULT_SAMPLING_FACTOR, NICR_PRECISION,
};
pub use validation::*;

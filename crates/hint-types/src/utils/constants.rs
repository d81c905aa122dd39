//! Fixed-point scales and resolver defaults.

use alloy_primitives::U256;

/// 1e18, the scale of token amounts and prices.
pub const DECIMAL_PRECISION: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 1e20, the scale of nominal collateral ratios.
pub const NICR_PRECISION: U256 = U256::from_limbs([0x6bc7_5e2d_6310_0000, 0x5, 0, 0]);

/// Approximate-rank trials per list entry.
pub const DEFAULT_SAMPLING_FACTOR: u64 = 15;

/// Seed handed to the approximate-rank query when none is configured.
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Per-query timeout applied by the resolver.
pub const DEFAULT_QUERY_TIMEOUT_SECONDS: u64 = 30;

//! Helpers for building sorted-list fixtures in tests.

use crate::key::OrderingKey;
use crate::position::RedemptionHints;
use crate::utils::DECIMAL_PRECISION;
use alloy_primitives::{Address, U256};

/// Deterministic address for the position holding the `n`-th key.
///
/// The index is written into the low bytes so fixtures are easy to read back
/// from assertion failures.
pub fn ordered_address(n: u64) -> Address {
	let mut bytes = [0u8; 20];
	bytes[12..].copy_from_slice(&n.to_be_bytes());
	bytes[0] = 0xaa;
	Address::from(bytes)
}

/// Key equal to `whole` units at 18 decimals.
pub fn nicr_of(whole: u64) -> OrderingKey {
	OrderingKey::new(U256::from(whole) * DECIMAL_PRECISION)
}

/// Builder for `RedemptionHints` fixtures.
#[derive(Debug, Clone)]
pub struct RedemptionHintsBuilder {
	first_redemption_hint: Address,
	partial_nicr: OrderingKey,
	truncated_amount: U256,
}

impl Default for RedemptionHintsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl RedemptionHintsBuilder {
	/// Starts from a redemption that ends on a full position.
	pub fn new() -> Self {
		Self {
			first_redemption_hint: ordered_address(1),
			partial_nicr: OrderingKey::ZERO,
			truncated_amount: U256::ZERO,
		}
	}

	pub fn first_redemption_hint(mut self, address: Address) -> Self {
		self.first_redemption_hint = address;
		self
	}

	pub fn partial_nicr(mut self, key: OrderingKey) -> Self {
		self.partial_nicr = key;
		self
	}

	pub fn truncated_amount(mut self, amount: U256) -> Self {
		self.truncated_amount = amount;
		self
	}

	pub fn build(self) -> RedemptionHints {
		RedemptionHints {
			first_redemption_hint: self.first_redemption_hint,
			partial_nicr: self.partial_nicr,
			truncated_amount: self.truncated_amount,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ordered_addresses_are_distinct() {
		assert_ne!(ordered_address(1), ordered_address(2));
		assert!(!ordered_address(0).is_zero());
	}

	#[test]
	fn test_builder_defaults_to_full_redemption() {
		let hints = RedemptionHintsBuilder::new()
			.truncated_amount(U256::from(10))
			.build();
		assert!(hints.partial_nicr.is_zero());
		assert_eq!(hints.truncated_amount, U256::from(10));
	}
}

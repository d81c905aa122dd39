//! Ordering keys for the sorted trove list.
//!
//! The remote list orders positions by their nominal collateral ratio (NICR):
//! `collateral * 1e20 / debt`, computed without a price. Keys are uint256 values
//! and every derivation here stays in integer arithmetic, since a key that is
//! off by a single unit sorts differently from the one the contract computes.

use crate::utils::NICR_PRECISION;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing or deriving an ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	/// The input was negative.
	#[error("key must not be negative: {0}")]
	Negative(String),
	/// The input was not a base-10 integer.
	#[error("key is not a decimal integer: {0}")]
	Malformed(String),
	/// The value does not fit in 256 bits.
	#[error("value overflows uint256: {0}")]
	Overflow(String),
}

/// A nominal collateral ratio used as the sort key of the remote list.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderingKey(pub U256);

impl OrderingKey {
	/// The zero key.
	pub const ZERO: Self = Self(U256::ZERO);

	/// Wraps a raw uint256 value.
	pub const fn new(value: U256) -> Self {
		Self(value)
	}

	/// Returns the raw uint256 value.
	pub const fn value(&self) -> U256 {
		self.0
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Derives the nominal collateral ratio for a position.
	///
	/// Both amounts are 18-decimal fixed-point integers. A zero debt maps to
	/// `U256::MAX`, which is how the on-chain math represents an unbounded ratio.
	pub fn nominal(collateral: U256, debt: U256) -> Result<Self, KeyError> {
		if debt.is_zero() {
			return Ok(Self(U256::MAX));
		}

		let scaled = collateral
			.checked_mul(NICR_PRECISION)
			.ok_or_else(|| KeyError::Overflow(format!("{collateral} * 1e20")))?;

		Ok(Self(scaled / debt))
	}
}

/// Sums the debt a new position will carry once fee and reserve are added.
pub fn expected_debt(requested: U256, fee: U256, reserve: U256) -> Result<U256, KeyError> {
	requested
		.checked_add(fee)
		.and_then(|sum| sum.checked_add(reserve))
		.ok_or_else(|| KeyError::Overflow(format!("{requested} + {fee} + {reserve}")))
}

impl From<U256> for OrderingKey {
	fn from(value: U256) -> Self {
		Self(value)
	}
}

impl From<OrderingKey> for U256 {
	fn from(key: OrderingKey) -> Self {
		key.0
	}
}

impl FromStr for OrderingKey {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim().replace('_', "");

		if trimmed.starts_with('-') {
			return Err(KeyError::Negative(s.to_string()));
		}
		if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
			return Err(KeyError::Malformed(s.to_string()));
		}

		// Only digits are left, so a parse failure can only mean overflow.
		U256::from_str_radix(&trimmed, 10)
			.map(Self)
			.map_err(|_| KeyError::Overflow(s.to_string()))
	}
}

impl fmt::Display for OrderingKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ether(n: u64) -> U256 {
		U256::from(n) * U256::from(10u64).pow(U256::from(18))
	}

	#[test]
	fn test_nominal_ratio_matches_contract_scale() {
		// 5 ETH against 2010 debt (1800 + 10 fee + 200 reserve)
		let key = OrderingKey::nominal(ether(5), ether(2010)).unwrap();
		let expected = ether(5) * NICR_PRECISION / ether(2010);
		assert_eq!(key.value(), expected);
		assert_eq!(key.to_string(), "248756218905472636");
	}

	#[test]
	fn test_nominal_ratio_zero_debt_is_max() {
		let key = OrderingKey::nominal(ether(1), U256::ZERO).unwrap();
		assert_eq!(key.value(), U256::MAX);
	}

	#[test]
	fn test_nominal_ratio_overflow() {
		let result = OrderingKey::nominal(U256::MAX, U256::from(1));
		assert!(matches!(result, Err(KeyError::Overflow(_))));
	}

	#[test]
	fn test_parse_key() {
		let key: OrderingKey = "55000000000000000000".parse().unwrap();
		assert_eq!(key.value(), ether(55));

		let key: OrderingKey = " 1_000 ".parse().unwrap();
		assert_eq!(key.value(), U256::from(1000));
	}

	#[test]
	fn test_parse_key_rejects_bad_input() {
		assert!(matches!(
			"-5".parse::<OrderingKey>(),
			Err(KeyError::Negative(_))
		));
		assert!(matches!(
			"12.5".parse::<OrderingKey>(),
			Err(KeyError::Malformed(_))
		));
		assert!(matches!("".parse::<OrderingKey>(), Err(KeyError::Malformed(_))));

		// 2^256 is one past the largest representable key
		let too_big =
			"115792089237316195423570985008687907853269984665640564039457584007913129639936";
		assert!(matches!(
			too_big.parse::<OrderingKey>(),
			Err(KeyError::Overflow(_))
		));
	}

	#[test]
	fn test_expected_debt() {
		let debt = expected_debt(ether(1800), ether(9), ether(200)).unwrap();
		assert_eq!(debt, ether(2009));

		assert!(expected_debt(U256::MAX, U256::from(1), U256::ZERO).is_err());
	}

	#[test]
	fn test_ordering_follows_value() {
		let low = OrderingKey::from(ether(1));
		let high = OrderingKey::from(ether(2));
		assert!(low < high);
	}
}

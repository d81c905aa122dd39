//! Partition identifiers.
//!
//! The sorted trove list is split into one sub-list per collateral asset.
//! Contracts address those sub-lists by a plain uint index.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a per-collateral sub-list.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Partition(pub u32);

impl Partition {
	pub const fn new(index: u32) -> Self {
		Self(index)
	}

	pub const fn index(&self) -> u32 {
		self.0
	}

	/// ABI representation used by the contract calls.
	pub fn as_u256(&self) -> U256 {
		U256::from(self.0)
	}
}

impl From<u32> for Partition {
	fn from(index: u32) -> Self {
		Self(index)
	}
}

impl fmt::Display for Partition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

//! Insert positions and the results of the hint flows.
//!
//! An insert position is the pair of neighbours a write command needs so the
//! contract can splice a position into the sorted list without walking it.
//! The pair is reported in the collection's own order; `Address::ZERO` on
//! either side marks the head or tail of the list.

use crate::key::OrderingKey;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The neighbours bracketing a key in a sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsertPosition {
	/// Neighbour on the head side, or zero when the key goes first.
	pub predecessor: Address,
	/// Neighbour on the tail side, or zero when the key goes last.
	pub successor: Address,
}

impl InsertPosition {
	pub const fn new(predecessor: Address, successor: Address) -> Self {
		Self {
			predecessor,
			successor,
		}
	}

	/// The "insert at head" sentinel used for an empty list.
	pub const fn head() -> Self {
		Self::new(Address::ZERO, Address::ZERO)
	}

	/// Returns true when both neighbours are the zero sentinel.
	pub fn is_head(&self) -> bool {
		self.predecessor.is_zero() && self.successor.is_zero()
	}
}

impl From<(Address, Address)> for InsertPosition {
	fn from((predecessor, successor): (Address, Address)) -> Self {
		Self::new(predecessor, successor)
	}
}

impl fmt::Display for InsertPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.predecessor, self.successor)
	}
}

/// Raw output of the remote redemption hint query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionHints {
	/// First position the redemption will touch.
	pub first_redemption_hint: Address,
	/// NICR the last, partially redeemed position ends up with. Zero when the
	/// redemption ends on a full position.
	pub partial_nicr: OrderingKey,
	/// Amount the redemption can actually take, after truncation.
	pub truncated_amount: U256,
}

/// Result of the position hint flow: derived key plus where it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionHint {
	pub key: OrderingKey,
	/// Requested debt plus borrowing fee plus liquidation reserve.
	pub expected_debt: U256,
	pub position: InsertPosition,
}

/// Everything a redemption command needs, resolved in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionPlan {
	pub first_redemption_hint: Address,
	pub partial_nicr: OrderingKey,
	/// Where the partially redeemed position is re-inserted.
	pub partial_position: InsertPosition,
	pub truncated_amount: U256,
}

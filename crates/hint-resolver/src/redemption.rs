//! Hints for a redemption.

use crate::{HintError, HintResolver};
use alloy_primitives::U256;
use hint_types::{InsertPosition, Partition, RedemptionPlan};
use tracing::instrument;

impl HintResolver {
	/// Resolves everything a redemption of `amount` at `price` needs.
	///
	/// The collection names the first position to redeem from and the NICR the
	/// last, partially redeemed position ends with. That NICR is then resolved
	/// like any other key so the partial position can be re-inserted. A zero
	/// NICR means the redemption ends on a full position and the partial
	/// position is the head sentinel.
	#[instrument(skip_all, fields(partition = %partition, amount = %amount))]
	pub async fn resolve_redemption_hints(
		&self,
		partition: Partition,
		amount: U256,
		price: U256,
		max_iterations: U256,
	) -> Result<RedemptionPlan, HintError> {
		let size = self
			.query("size", self.collection.size(partition))
			.await?;
		if size == 0 {
			return Err(HintError::EmptyCollection(partition.index()));
		}

		let hints = self
			.query(
				"redemption_hints",
				self.collection
					.redemption_hints(partition, amount, price, max_iterations),
			)
			.await?;
		tracing::debug!(
			first = %hints.first_redemption_hint,
			partial_nicr = %hints.partial_nicr,
			truncated = %hints.truncated_amount,
			"Redemption hints"
		);

		let partial_position = if hints.partial_nicr.is_zero() {
			InsertPosition::head()
		} else {
			self.resolve_insert_position(partition, hints.partial_nicr)
				.await?
		};

		Ok(RedemptionPlan {
			first_redemption_hint: hints.first_redemption_hint,
			partial_nicr: hints.partial_nicr,
			partial_position,
			truncated_amount: hints.truncated_amount,
		})
	}
}

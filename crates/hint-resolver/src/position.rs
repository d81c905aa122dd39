//! Hints for opening or adjusting a position.

use crate::{HintError, HintResolver};
use alloy_primitives::U256;
use hint_types::key::expected_debt;
use hint_types::{OrderingKey, Partition, PositionHint};
use tracing::instrument;

impl HintResolver {
	/// Derives the ordering key of a position that is about to hold
	/// `collateral` against `requested_debt` and resolves where it goes.
	///
	/// The debt the position will actually carry includes the borrowing fee
	/// and the liquidation reserve, both quoted by the collection.
	#[instrument(skip_all, fields(partition = %partition, collateral = %collateral, requested_debt = %requested_debt))]
	pub async fn resolve_for_position(
		&self,
		partition: Partition,
		collateral: U256,
		requested_debt: U256,
	) -> Result<PositionHint, HintError> {
		let quotes = self.quotes.as_ref().ok_or_else(|| {
			HintError::Configuration("no debt quote source configured".into())
		})?;

		let reserve = self
			.query("gas_compensation", quotes.gas_compensation())
			.await?;
		let fee = self
			.query("borrowing_fee", quotes.borrowing_fee(requested_debt))
			.await?;

		let expected_debt = expected_debt(requested_debt, fee, reserve)?;
		let key = OrderingKey::nominal(collateral, expected_debt)?;
		tracing::debug!(%fee, %reserve, %expected_debt, %key, "Derived ordering key");

		let position = self.resolve_insert_position(partition, key).await?;

		Ok(PositionHint {
			key,
			expected_debt,
			position,
		})
	}
}

#[cfg(test)]
mod tests {
	use crate::{HintError, HintResolver};
	use alloy_primitives::U256;
	use hint_collection::implementations::memory::MemoryCollection;
	use hint_collection::{CollectionBackend, CollectionError, MockDebtQuoteInterface};
	use hint_config::ResolverSettings;
	use hint_types::utils::tests::builders::{nicr_of, ordered_address};
	use hint_types::{InsertPosition, OrderingKey, Partition, DECIMAL_PRECISION};
	use std::sync::Arc;

	const P0: Partition = Partition::new(0);

	fn tokens(n: u64) -> U256 {
		U256::from(n) * DECIMAL_PRECISION
	}

	#[tokio::test]
	async fn test_key_includes_fee_and_reserve() {
		// 200 token reserve, 0.5% fee.
		let memory = Arc::new(MemoryCollection::new([P0]).with_quotes(tokens(200), 50));
		let resolver =
			HintResolver::from_backend(CollectionBackend::new(memory), ResolverSettings::default())
				.unwrap();

		let hint = resolver
			.resolve_for_position(P0, tokens(5), tokens(1800))
			.await
			.unwrap();

		assert_eq!(hint.expected_debt, tokens(2009));
		assert_eq!(hint.key, "248880039820806371".parse::<OrderingKey>().unwrap());
		assert!(hint.position.is_head());
	}

	#[tokio::test]
	async fn test_position_lands_between_neighbours() {
		let memory = Arc::new(MemoryCollection::new([P0]).with_quotes(U256::ZERO, 0));
		for k in [1u64, 2, 4, 8] {
			memory
				.insert(P0, ordered_address(k), nicr_of(k))
				.await
				.unwrap();
		}
		let resolver =
			HintResolver::from_backend(CollectionBackend::new(memory), ResolverSettings::default())
				.unwrap();

		// 3 collateral against 100 debt, no fee or reserve: NICR = 3e18.
		let hint = resolver
			.resolve_for_position(P0, tokens(3), tokens(100))
			.await
			.unwrap();
		assert_eq!(hint.key, nicr_of(3));
		assert_eq!(
			hint.position,
			InsertPosition::new(ordered_address(2), ordered_address(4))
		);
	}

	#[tokio::test]
	async fn test_missing_quote_source() {
		let memory = Arc::new(MemoryCollection::new([P0]));
		let resolver = HintResolver::new(memory, ResolverSettings::default()).unwrap();
		let err = resolver
			.resolve_for_position(P0, tokens(1), tokens(1))
			.await
			.unwrap_err();
		assert!(matches!(err, HintError::Configuration(_)));
	}

	#[tokio::test]
	async fn test_overflowing_collateral_is_invalid_key() {
		let memory = Arc::new(MemoryCollection::new([P0]).with_quotes(U256::ZERO, 0));
		let resolver =
			HintResolver::from_backend(CollectionBackend::new(memory), ResolverSettings::default())
				.unwrap();
		let err = resolver
			.resolve_for_position(P0, U256::MAX, tokens(1))
			.await
			.unwrap_err();
		assert!(matches!(err, HintError::InvalidKey(_)));
	}

	#[tokio::test]
	async fn test_quote_failure_is_remote() {
		let mut quotes = MockDebtQuoteInterface::new();
		quotes
			.expect_gas_compensation()
			.returning(|| Box::pin(async { Ok(U256::ZERO) }));
		quotes.expect_borrowing_fee().returning(|_| {
			Box::pin(async { Err(CollectionError::Remote("execution reverted".into())) })
		});

		let memory = Arc::new(MemoryCollection::new([P0]));
		let resolver = HintResolver::new(memory, ResolverSettings::default())
			.unwrap()
			.with_quotes(Arc::new(quotes));
		let err = resolver
			.resolve_for_position(P0, tokens(1), tokens(1))
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			HintError::RemoteQueryFailed { ref query, .. } if query == "borrowing_fee"
		));
	}
}

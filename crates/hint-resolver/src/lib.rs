//! Two-phase hint resolution against a remote sorted list.
//!
//! Writing to the sorted trove list is cheap only when the caller says where
//! the new entry goes. Fetching the whole list to find out is not an option,
//! so the resolver asks the list itself, in two steps:
//!
//! 1. `approximate_rank` samples `size × sampling_factor` entries and returns
//!    one whose key is close to the target.
//! 2. `exact_insert_position` walks from that candidate to the true neighbours.
//!
//! The resolver keeps no state between calls and never caches entries. Two
//! resolves against a partition that changes in between may disagree; the
//! contract re-checks the hints on write and falls back to a full walk.

use alloy_primitives::U256;
use hint_collection::{
	CollectionBackend, CollectionError, DebtQuoteInterface, SortedCollectionInterface,
};
use hint_config::ResolverSettings;
use hint_types::{InsertPosition, KeyError, OrderingKey, Partition};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

mod position;
mod redemption;

/// Errors returned by the resolver.
#[derive(Debug, Error)]
pub enum HintError {
	/// The partition is not known to the collection.
	#[error("Invalid partition: {0}")]
	InvalidPartition(u32),
	/// The key, or an amount it is derived from, is out of range.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// A remote query failed. Safe to retry.
	#[error("Remote query '{query}' failed: {cause}")]
	RemoteQueryFailed { query: String, cause: String },
	/// The partition holds no entries.
	#[error("Partition {0} is empty")]
	EmptyCollection(u32),
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl HintError {
	/// Whether repeating the same call may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, HintError::RemoteQueryFailed { .. })
	}
}

impl From<KeyError> for HintError {
	fn from(err: KeyError) -> Self {
		HintError::InvalidKey(err.to_string())
	}
}

/// Resolves insert positions and redemption hints for one collection.
///
/// Holds only shared handles and immutable settings, so one resolver can serve
/// any number of concurrent calls.
#[derive(Clone)]
pub struct HintResolver {
	collection: Arc<dyn SortedCollectionInterface>,
	quotes: Option<Arc<dyn DebtQuoteInterface>>,
	settings: ResolverSettings,
}

impl std::fmt::Debug for HintResolver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HintResolver")
			.field("settings", &self.settings)
			.field("quotes", &self.quotes.is_some())
			.finish_non_exhaustive()
	}
}

impl HintResolver {
	/// Creates a resolver without a debt quote source.
	///
	/// Position hints need one; see [`HintResolver::with_quotes`].
	pub fn new(
		collection: Arc<dyn SortedCollectionInterface>,
		settings: ResolverSettings,
	) -> Result<Self, HintError> {
		settings
			.validate()
			.map_err(|e| HintError::Configuration(e.to_string()))?;
		Ok(Self {
			collection,
			quotes: None,
			settings,
		})
	}

	/// Creates a resolver using both capabilities of a built backend.
	pub fn from_backend(
		backend: CollectionBackend,
		settings: ResolverSettings,
	) -> Result<Self, HintError> {
		Ok(Self::new(backend.sorted, settings)?.with_quotes(backend.quotes))
	}

	pub fn with_quotes(mut self, quotes: Arc<dyn DebtQuoteInterface>) -> Self {
		self.quotes = Some(quotes);
		self
	}

	pub fn settings(&self) -> &ResolverSettings {
		&self.settings
	}

	/// Finds the neighbours `key` should be inserted between.
	///
	/// An empty partition yields the head sentinel without sampling. The pair
	/// is returned exactly as the collection reports it.
	#[instrument(skip_all, fields(partition = %partition, key = %key))]
	pub async fn resolve_insert_position(
		&self,
		partition: Partition,
		key: OrderingKey,
	) -> Result<InsertPosition, HintError> {
		let size = self
			.query("size", self.collection.size(partition))
			.await?;

		if size == 0 {
			tracing::debug!(size, "Partition is empty, inserting at head");
			return Ok(InsertPosition::head());
		}

		// size fits in 64 bits and so does the factor, the product cannot overflow.
		let trials = U256::from(size) * U256::from(self.settings.sampling_factor);
		let seed = U256::from(self.settings.random_seed);
		tracing::debug!(size, %trials, "Sampling approximate hint");

		let candidate = self
			.query(
				"approximate_rank",
				self.collection
					.approximate_rank(partition, key, trials, seed),
			)
			.await?;
		tracing::debug!(%candidate, "Refining from candidate");

		let position = self
			.query(
				"exact_insert_position",
				self.collection
					.exact_insert_position(partition, key, candidate, candidate),
			)
			.await?;
		tracing::debug!(
			predecessor = %position.predecessor,
			successor = %position.successor,
			"Resolved insert position"
		);

		Ok(position)
	}

	/// Runs one remote query under the configured timeout.
	async fn query<T, F>(&self, query: &'static str, call: F) -> Result<T, HintError>
	where
		F: Future<Output = Result<T, CollectionError>>,
	{
		let timeout = self.settings.query_timeout();
		match tokio::time::timeout(timeout, call).await {
			Ok(Ok(value)) => Ok(value),
			Ok(Err(CollectionError::UnknownPartition(partition))) => {
				Err(HintError::InvalidPartition(partition.index()))
			},
			Ok(Err(e)) => {
				tracing::warn!(query, error = %e, "Remote query failed");
				Err(HintError::RemoteQueryFailed {
					query: query.to_string(),
					cause: e.to_string(),
				})
			},
			Err(_) => {
				tracing::warn!(query, timeout_secs = timeout.as_secs(), "Remote query timed out");
				Err(HintError::RemoteQueryFailed {
					query: query.to_string(),
					cause: format!("timed out after {}s", timeout.as_secs()),
				})
			},
		}
	}
}

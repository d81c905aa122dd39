//! Remote sorted collection access for the trove hint workspace.
//!
//! The sorted trove list lives outside this process. This crate defines the
//! capabilities the resolver needs from it, split in two traits:
//!
//! - [`SortedCollectionInterface`]: size, approximate rank, exact insert
//!   position and redemption hints for one partition.
//! - [`DebtQuoteInterface`]: liquidation reserve and borrowing fee, needed to
//!   derive the ordering key of a position that does not exist yet.
//!
//! Backends register themselves through [`ImplementationRegistry`] and are built
//! from their `[collection.implementations.<name>]` table.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use hint_types::{
	ConfigSchema, ImplementationRegistry, InsertPosition, NetworkConfig, OrderingKey, Partition,
	PartitionConfig, RedemptionHints,
};
use std::sync::Arc;
use thiserror::Error;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	pub mod memory;
}

/// Errors raised by collection backends.
#[derive(Debug, Error)]
pub enum CollectionError {
	/// The partition is not part of the deployment.
	#[error("Unknown partition {0}")]
	UnknownPartition(Partition),
	/// The remote call failed: transport error, revert or unreachable node.
	#[error("Remote call failed: {0}")]
	Remote(String),
	/// The remote answered with data that could not be decoded.
	#[error("Decode error: {0}")]
	Decode(String),
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// The backend cannot answer this query.
	#[error("Unsupported: {0}")]
	Unsupported(String),
}

/// Read access to a remote sorted list, partitioned by collateral.
///
/// Every call is a fresh round trip; implementations must not cache entries.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait SortedCollectionInterface: Send + Sync {
	/// Returns the configuration schema for this backend.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Number of entries in the partition.
	async fn size(&self, partition: Partition) -> Result<u64, CollectionError>;

	/// Samples `trials` entries starting from `seed` and returns the one whose
	/// key is closest to `key`. The answer may be inexact.
	async fn approximate_rank(
		&self,
		partition: Partition,
		key: OrderingKey,
		trials: U256,
		seed: U256,
	) -> Result<Address, CollectionError>;

	/// Walks from the two hints to the exact neighbours of `key`.
	async fn exact_insert_position(
		&self,
		partition: Partition,
		key: OrderingKey,
		hint_a: Address,
		hint_b: Address,
	) -> Result<InsertPosition, CollectionError>;

	/// Hints for redeeming `amount` at `price`, looking at no more than
	/// `max_iterations` entries.
	async fn redemption_hints(
		&self,
		partition: Partition,
		amount: U256,
		price: U256,
		max_iterations: U256,
	) -> Result<RedemptionHints, CollectionError> {
		let _ = (amount, price, max_iterations);
		Err(CollectionError::Unsupported(format!(
			"redemption hints for partition {partition}"
		)))
	}
}

/// Quotes needed to compute the debt of a position before it is opened.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait DebtQuoteInterface: Send + Sync {
	/// Debt reserved for liquidation gas compensation.
	async fn gas_compensation(&self) -> Result<U256, CollectionError>;

	/// Borrowing fee charged on `debt`, including base-rate decay.
	async fn borrowing_fee(&self, debt: U256) -> Result<U256, CollectionError>;
}

/// The two capabilities of a built backend.
///
/// Both handles usually point at the same object.
#[derive(Clone)]
pub struct CollectionBackend {
	pub sorted: Arc<dyn SortedCollectionInterface>,
	pub quotes: Arc<dyn DebtQuoteInterface>,
}

impl std::fmt::Debug for CollectionBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CollectionBackend").finish_non_exhaustive()
	}
}

impl CollectionBackend {
	/// Wraps one object serving both capabilities.
	pub fn new<T>(inner: Arc<T>) -> Self
	where
		T: SortedCollectionInterface + DebtQuoteInterface + 'static,
	{
		Self {
			sorted: inner.clone(),
			quotes: inner,
		}
	}
}

/// Type alias for collection factory functions.
pub type CollectionFactory = fn(
	&toml::Value,
	&NetworkConfig,
	&[PartitionConfig],
) -> Result<CollectionBackend, CollectionError>;

/// Get all registered collection implementations.
pub fn get_all_implementations() -> Vec<(&'static str, CollectionFactory)> {
	use implementations::{evm::alloy, memory};

	vec![
		(alloy::Registry::NAME, alloy::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Builds the backend registered under `name`.
pub fn create_collection(
	name: &str,
	config: &toml::Value,
	network: &NetworkConfig,
	partitions: &[PartitionConfig],
) -> Result<CollectionBackend, CollectionError> {
	let factory = get_all_implementations()
		.into_iter()
		.find_map(|(registered, factory)| (registered == name).then_some(factory))
		.ok_or_else(|| {
			CollectionError::Configuration(format!(
				"Collection implementation '{}' is not registered",
				name
			))
		})?;

	tracing::debug!(implementation = %name, "Building collection backend");
	factory(config, network, partitions)
}

//! In-memory sorted collection.
//!
//! Keeps one ascending list of `(id, key)` entries per configured partition and
//! answers the collection queries the same way the on-chain helpers do, so the
//! resolver can be exercised without a node.
//!
//! # Test-Only Backend
//!
//! Contents are fixtures: entries come from the configuration table or from
//! [`MemoryCollection::insert`], redemption hints are canned per partition and
//! debt quotes are a fixed reserve plus a flat fee rate.
//!
//! ```toml
//! [collection.implementations.memory]
//! gas_compensation = "200000000000000000000"
//! borrowing_fee_bps = 50
//!
//! [[collection.implementations.memory.entries]]
//! partition = 0
//! id = "0x00000000000000000000000000000000000000a1"
//! key = "2500000000000000000"
//! ```

use crate::{
	CollectionBackend, CollectionError, DebtQuoteInterface, SortedCollectionInterface,
};
use alloy_primitives::{keccak256, Address, U256};
use async_trait::async_trait;
use hint_types::{
	parse_address, ConfigSchema, Field, FieldType, InsertPosition, NetworkConfig, OrderingKey,
	Partition, PartitionConfig, RedemptionHints, Schema, ValidationError, DECIMAL_PRECISION,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const BPS_DENOMINATOR: u64 = 10_000;

/// Default liquidation reserve: 200 tokens at 18 decimals.
const DEFAULT_GAS_COMPENSATION_UNITS: u64 = 200;
const DEFAULT_BORROWING_FEE_BPS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
	id: Address,
	key: OrderingKey,
}

/// In-memory collection with an ascending list per partition.
pub struct MemoryCollection {
	lists: RwLock<HashMap<Partition, Vec<Entry>>>,
	redemption_fixtures: RwLock<HashMap<Partition, RedemptionHints>>,
	gas_compensation: U256,
	borrowing_fee_bps: u64,
}

impl MemoryCollection {
	/// Creates an empty collection knowing the given partitions.
	pub fn new(partitions: impl IntoIterator<Item = Partition>) -> Self {
		Self {
			lists: RwLock::new(partitions.into_iter().map(|p| (p, Vec::new())).collect()),
			redemption_fixtures: RwLock::new(HashMap::new()),
			gas_compensation: U256::from(DEFAULT_GAS_COMPENSATION_UNITS) * DECIMAL_PRECISION,
			borrowing_fee_bps: DEFAULT_BORROWING_FEE_BPS,
		}
	}

	/// Sets the fixed debt quotes.
	pub fn with_quotes(mut self, gas_compensation: U256, borrowing_fee_bps: u64) -> Self {
		self.gas_compensation = gas_compensation;
		self.borrowing_fee_bps = borrowing_fee_bps;
		self
	}

	/// Inserts or moves `id` so that the list stays sorted by key.
	///
	/// Entries with equal keys keep insertion order.
	pub async fn insert(
		&self,
		partition: Partition,
		id: Address,
		key: OrderingKey,
	) -> Result<(), CollectionError> {
		if id.is_zero() {
			return Err(CollectionError::Unsupported(
				"the zero address is reserved as the list boundary".into(),
			));
		}
		let mut lists = self.lists.write().await;
		let list = lists
			.get_mut(&partition)
			.ok_or(CollectionError::UnknownPartition(partition))?;

		list.retain(|entry| entry.id != id);
		let at = list.partition_point(|entry| entry.key <= key);
		list.insert(at, Entry { id, key });
		Ok(())
	}

	/// Removes `id` from the partition. Returns whether it was present.
	pub async fn remove(&self, partition: Partition, id: Address) -> Result<bool, CollectionError> {
		let mut lists = self.lists.write().await;
		let list = lists
			.get_mut(&partition)
			.ok_or(CollectionError::UnknownPartition(partition))?;

		let before = list.len();
		list.retain(|entry| entry.id != id);
		Ok(list.len() != before)
	}

	/// Snapshot of the partition in list order.
	pub async fn entries(
		&self,
		partition: Partition,
	) -> Result<Vec<(Address, OrderingKey)>, CollectionError> {
		let lists = self.lists.read().await;
		let list = lists
			.get(&partition)
			.ok_or(CollectionError::UnknownPartition(partition))?;
		Ok(list.iter().map(|entry| (entry.id, entry.key)).collect())
	}

	/// Sets the canned answer for redemption hint queries on a partition.
	pub async fn set_redemption_hints(
		&self,
		partition: Partition,
		hints: RedemptionHints,
	) -> Result<(), CollectionError> {
		if !self.lists.read().await.contains_key(&partition) {
			return Err(CollectionError::UnknownPartition(partition));
		}
		self.redemption_fixtures
			.write()
			.await
			.insert(partition, hints);
		Ok(())
	}
}

fn distance(a: OrderingKey, b: OrderingKey) -> U256 {
	if a.value() > b.value() {
		a.value() - b.value()
	} else {
		b.value() - a.value()
	}
}

fn next_seed(seed: U256) -> U256 {
	U256::from_be_bytes(keccak256(seed.to_be_bytes::<32>()).0)
}

/// Closest entry to `key` among the tail and `trials` pseudo-random samples.
fn sample_closest(list: &[Entry], key: OrderingKey, trials: U256, seed: U256) -> Address {
	let Some(tail) = list.last() else {
		return Address::ZERO;
	};

	let size = U256::from(list.len());
	let mut best = *tail;
	let mut best_diff = distance(tail.key, key);
	let mut seed = seed;

	for _ in 0..trials.saturating_to::<u64>() {
		seed = next_seed(seed);
		let index = (seed % size).saturating_to::<usize>();
		let Some(candidate) = list.get(index) else {
			continue;
		};
		let diff = distance(candidate.key, key);
		if diff < best_diff {
			best = *candidate;
			best_diff = diff;
		}
	}

	best.id
}

/// Walks from the hint to the slot where `key` belongs.
///
/// `cursor` counts the entries before the slot, so the result satisfies
/// `list[cursor - 1].key <= key < list[cursor].key`.
fn walk_from_hint(list: &[Entry], key: OrderingKey, hint: Address) -> (InsertPosition, usize) {
	let mut cursor = list
		.iter()
		.position(|entry| !hint.is_zero() && entry.id == hint)
		.map(|index| index + 1)
		.unwrap_or(0);
	let mut steps = 0;

	while cursor < list.len() && list[cursor].key <= key {
		cursor += 1;
		steps += 1;
	}
	while cursor > 0 && list[cursor - 1].key > key {
		cursor -= 1;
		steps += 1;
	}

	let predecessor = cursor
		.checked_sub(1)
		.map(|index| list[index].id)
		.unwrap_or(Address::ZERO);
	let successor = list.get(cursor).map(|entry| entry.id).unwrap_or(Address::ZERO);
	(InsertPosition::new(predecessor, successor), steps)
}

#[async_trait]
impl SortedCollectionInterface for MemoryCollection {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryCollectionSchema)
	}

	async fn size(&self, partition: Partition) -> Result<u64, CollectionError> {
		let lists = self.lists.read().await;
		lists
			.get(&partition)
			.map(|list| list.len() as u64)
			.ok_or(CollectionError::UnknownPartition(partition))
	}

	async fn approximate_rank(
		&self,
		partition: Partition,
		key: OrderingKey,
		trials: U256,
		seed: U256,
	) -> Result<Address, CollectionError> {
		let lists = self.lists.read().await;
		let list = lists
			.get(&partition)
			.ok_or(CollectionError::UnknownPartition(partition))?;
		Ok(sample_closest(list, key, trials, seed))
	}

	async fn exact_insert_position(
		&self,
		partition: Partition,
		key: OrderingKey,
		hint_a: Address,
		hint_b: Address,
	) -> Result<InsertPosition, CollectionError> {
		let lists = self.lists.read().await;
		let list = lists
			.get(&partition)
			.ok_or(CollectionError::UnknownPartition(partition))?;

		// Either hint will do; fall back to the second when the first is gone.
		let hint = if list.iter().any(|entry| entry.id == hint_a) {
			hint_a
		} else {
			hint_b
		};
		let (position, steps) = walk_from_hint(list, key, hint);
		tracing::trace!(%partition, steps, "Walked to insert position");
		Ok(position)
	}

	async fn redemption_hints(
		&self,
		partition: Partition,
		_amount: U256,
		_price: U256,
		_max_iterations: U256,
	) -> Result<RedemptionHints, CollectionError> {
		if !self.lists.read().await.contains_key(&partition) {
			return Err(CollectionError::UnknownPartition(partition));
		}
		self.redemption_fixtures
			.read()
			.await
			.get(&partition)
			.copied()
			.ok_or_else(|| {
				CollectionError::Unsupported(format!(
					"no redemption fixture for partition {partition}"
				))
			})
	}
}

#[async_trait]
impl DebtQuoteInterface for MemoryCollection {
	async fn gas_compensation(&self) -> Result<U256, CollectionError> {
		Ok(self.gas_compensation)
	}

	async fn borrowing_fee(&self, debt: U256) -> Result<U256, CollectionError> {
		debt.checked_mul(U256::from(self.borrowing_fee_bps))
			.map(|scaled| scaled / U256::from(BPS_DENOMINATOR))
			.ok_or_else(|| CollectionError::Remote("borrowing fee overflow".into()))
	}
}

/// Configuration schema for the memory collection.
pub struct MemoryCollectionSchema;

impl MemoryCollectionSchema {
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		Self.validate(config)
	}
}

impl ConfigSchema for MemoryCollectionSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let entry = Schema::new(
			vec![
				Field::new("partition", FieldType::Integer {
					min: Some(0),
					max: Some(u32::MAX as i64),
				}),
				Field::new("id", FieldType::Address),
				Field::new("key", FieldType::Uint),
			],
			vec![],
		);
		let redemption = Schema::new(
			vec![
				Field::new("partition", FieldType::Integer {
					min: Some(0),
					max: Some(u32::MAX as i64),
				}),
				Field::new("first_redemption_hint", FieldType::Address),
				Field::new("partial_nicr", FieldType::Uint),
				Field::new("truncated_amount", FieldType::Uint),
			],
			vec![],
		);

		let schema = Schema::new(
			vec![],
			vec![
				Field::new("gas_compensation", FieldType::Uint),
				Field::new("borrowing_fee_bps", FieldType::Integer {
					min: Some(0),
					max: Some(BPS_DENOMINATOR as i64),
				}),
				Field::new("entries", FieldType::Array(Box::new(FieldType::Table(entry)))),
				Field::new(
					"redemption_hints",
					FieldType::Array(Box::new(FieldType::Table(redemption))),
				),
			],
		);
		schema.validate(config)
	}
}

fn uint_field(table: &toml::Value, name: &str) -> Result<U256, CollectionError> {
	match table.get(name) {
		Some(toml::Value::Integer(i)) => Ok(U256::from(*i as u64)),
		Some(toml::Value::String(s)) => s
			.parse::<OrderingKey>()
			.map(|k| k.value())
			.map_err(|e| CollectionError::Configuration(format!("{name}: {e}"))),
		_ => Err(CollectionError::Configuration(format!("Missing {name}"))),
	}
}

fn partition_field(table: &toml::Value) -> Result<Partition, CollectionError> {
	table
		.get("partition")
		.and_then(|v| v.as_integer())
		.and_then(|i| u32::try_from(i).ok())
		.map(Partition::new)
		.ok_or_else(|| CollectionError::Configuration("Missing partition".into()))
}

fn address_field(table: &toml::Value, name: &str) -> Result<Address, CollectionError> {
	let text = table
		.get(name)
		.and_then(|v| v.as_str())
		.ok_or_else(|| CollectionError::Configuration(format!("Missing {name}")))?;
	parse_address(text).map_err(CollectionError::Configuration)
}

/// Seeds a collection from its configuration table.
///
/// Writes go straight into the maps since nothing else can hold the locks yet.
fn load_fixtures(
	collection: &mut MemoryCollection,
	config: &toml::Value,
) -> Result<(), CollectionError> {
	let lists = collection.lists.get_mut();
	for item in config
		.get("entries")
		.and_then(|v| v.as_array())
		.into_iter()
		.flatten()
	{
		let partition = partition_field(item)?;
		let id = address_field(item, "id")?;
		let key = OrderingKey::new(uint_field(item, "key")?);
		let list = lists
			.get_mut(&partition)
			.ok_or(CollectionError::UnknownPartition(partition))?;
		list.retain(|entry| entry.id != id);
		let at = list.partition_point(|entry| entry.key <= key);
		list.insert(at, Entry { id, key });
	}

	let fixtures = collection.redemption_fixtures.get_mut();
	for item in config
		.get("redemption_hints")
		.and_then(|v| v.as_array())
		.into_iter()
		.flatten()
	{
		let partition = partition_field(item)?;
		if !lists.contains_key(&partition) {
			return Err(CollectionError::UnknownPartition(partition));
		}
		fixtures.insert(partition, RedemptionHints {
			first_redemption_hint: address_field(item, "first_redemption_hint")?,
			partial_nicr: OrderingKey::new(uint_field(item, "partial_nicr")?),
			truncated_amount: uint_field(item, "truncated_amount")?,
		});
	}

	Ok(())
}

/// Factory function to create a memory collection from configuration.
///
/// Configuration parameters (all optional):
/// - `gas_compensation`: liquidation reserve, default 200e18
/// - `borrowing_fee_bps`: flat fee rate, default 50
/// - `entries`: preloaded `{ partition, id, key }` tables
/// - `redemption_hints`: canned `{ partition, first_redemption_hint, partial_nicr, truncated_amount }`
pub fn create_collection(
	config: &toml::Value,
	_network: &NetworkConfig,
	partitions: &[PartitionConfig],
) -> Result<CollectionBackend, CollectionError> {
	MemoryCollectionSchema::validate_config(config)
		.map_err(|e| CollectionError::Configuration(format!("Invalid configuration: {}", e)))?;

	let gas_compensation = match config.get("gas_compensation") {
		Some(_) => uint_field(config, "gas_compensation")?,
		None => U256::from(DEFAULT_GAS_COMPENSATION_UNITS) * DECIMAL_PRECISION,
	};
	let borrowing_fee_bps = config
		.get("borrowing_fee_bps")
		.and_then(|v| v.as_integer())
		.map(|bps| bps as u64)
		.unwrap_or(DEFAULT_BORROWING_FEE_BPS);

	let mut collection =
		MemoryCollection::new(partitions.iter().map(|p| Partition::new(p.index)))
			.with_quotes(gas_compensation, borrowing_fee_bps);
	load_fixtures(&mut collection, config)?;

	Ok(CollectionBackend::new(Arc::new(collection)))
}

/// Registry for the memory collection implementation.
pub struct Registry;

impl hint_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = crate::CollectionFactory;

	fn factory() -> Self::Factory {
		create_collection
	}
}

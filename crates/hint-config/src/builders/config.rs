//! Configuration builder for tests and local tooling.

use crate::{CollectionConfig, Config, ResolverSettings};
use hint_types::{NetworkConfig, PartitionConfig, RpcEndpoint};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to the in-memory collection on a local chain with one partition.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	resolver: ResolverSettings,
	network: Option<NetworkConfig>,
	partitions: Vec<PartitionConfig>,
	collection_primary: String,
	implementations: HashMap<String, toml::Value>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		Self {
			resolver: ResolverSettings::default(),
			network: None,
			partitions: vec![PartitionConfig {
				index: 0,
				symbol: "RBTC".to_string(),
			}],
			collection_primary: "memory".to_string(),
			implementations: HashMap::new(),
		}
	}

	pub fn sampling_factor(mut self, factor: u64) -> Self {
		self.resolver.sampling_factor = factor;
		self
	}

	pub fn random_seed(mut self, seed: u64) -> Self {
		self.resolver.random_seed = seed;
		self
	}

	pub fn query_timeout_seconds(mut self, seconds: u64) -> Self {
		self.resolver.query_timeout_seconds = seconds;
		self
	}

	pub fn network(mut self, network: NetworkConfig) -> Self {
		self.network = Some(network);
		self
	}

	/// Replaces the partition list.
	pub fn partitions(mut self, partitions: Vec<PartitionConfig>) -> Self {
		self.partitions = partitions;
		self
	}

	/// Sets the primary collection implementation.
	pub fn collection_primary(mut self, primary: impl Into<String>) -> Self {
		self.collection_primary = primary.into();
		self
	}

	/// Adds a raw implementation table under `collection.implementations`.
	pub fn implementation(mut self, name: impl Into<String>, table: toml::Value) -> Self {
		self.implementations.insert(name.into(), table);
		self
	}

	/// Builds the `Config`. No validation is applied, so tests can build
	/// deliberately broken configurations.
	pub fn build(self) -> Config {
		let mut implementations = self.implementations;
		implementations
			.entry(self.collection_primary.clone())
			.or_insert_with(|| toml::Value::Table(toml::map::Map::new()));

		Config {
			resolver: self.resolver,
			network: self.network.unwrap_or_else(|| NetworkConfig {
				chain_id: 31337,
				rpc_urls: vec![RpcEndpoint::http_only("http://localhost:8545")],
			}),
			partitions: self.partitions,
			collection: CollectionConfig {
				primary: self.collection_primary,
				implementations,
			},
		}
	}
}

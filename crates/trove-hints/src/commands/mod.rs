//! Command handlers.
//!
//! Each handler takes the loaded [`Context`] and its parsed arguments and
//! returns a serializable result. Rendering is left to the binary.

pub mod config;
pub mod insert;
pub mod position;
pub mod redeem;
pub mod size;

use anyhow::{anyhow, Context as _, Result};
use hint_collection::{create_collection, CollectionBackend};
use hint_config::Config;
use hint_resolver::HintResolver;
use hint_types::{Partition, PartitionConfig};
use std::path::Path;

/// Decimals of every amount taken or printed by the CLI.
pub const TOKEN_DECIMALS: u8 = 18;

/// Everything a command needs: configuration, backend and resolver.
#[derive(Debug, Clone)]
pub struct Context {
	pub config: Config,
	pub backend: CollectionBackend,
	pub resolver: HintResolver,
}

impl Context {
	/// Loads the configuration and builds the primary collection backend.
	pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let config = Config::from_file(path)
			.await
			.with_context(|| format!("Failed to load configuration from {}", path.display()))?;
		Self::from_config(config)
	}

	pub fn from_config(config: Config) -> Result<Self> {
		let (name, table) = config
			.primary_collection()
			.ok_or_else(|| anyhow!("Primary collection '{}' is not configured", config.collection.primary))?;
		let backend = create_collection(name, table, &config.network, &config.partitions)?;
		let resolver = HintResolver::from_backend(backend.clone(), config.resolver)?;

		tracing::debug!(
			collection = %name,
			partitions = config.partitions.len(),
			"Context ready"
		);
		Ok(Self {
			config,
			backend,
			resolver,
		})
	}

	/// Resolves a partition given by index or by collateral symbol.
	pub fn partition(&self, selector: &str) -> Result<(Partition, &PartitionConfig)> {
		let found = match selector.trim().parse::<u32>() {
			Ok(index) => self.config.partition(Partition::new(index)),
			Err(_) => self.config.partition_by_symbol(selector.trim()),
		};
		found
			.map(|p| (Partition::new(p.index), p))
			.ok_or_else(|| anyhow!("Unknown partition '{}'", selector))
	}
}

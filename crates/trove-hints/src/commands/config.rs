//! `config`: summary of the loaded configuration.

use super::Context;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
	pub chain_id: u64,
	pub rpc_url: Option<String>,
	pub collection: String,
	pub sampling_factor: u64,
	pub random_seed: u64,
	pub query_timeout_seconds: u64,
	pub partitions: Vec<PartitionSummary>,
}

#[derive(Debug, Serialize)]
pub struct PartitionSummary {
	pub index: u32,
	pub symbol: String,
}

pub fn run(ctx: &Context) -> Result<ConfigOutput> {
	let config = &ctx.config;
	Ok(ConfigOutput {
		chain_id: config.network.chain_id,
		rpc_url: config.network.get_http_url().map(str::to_string),
		collection: config.collection.primary.clone(),
		sampling_factor: config.resolver.sampling_factor,
		random_seed: config.resolver.random_seed,
		query_timeout_seconds: config.resolver.query_timeout_seconds,
		partitions: config
			.partitions
			.iter()
			.map(|p| PartitionSummary {
				index: p.index,
				symbol: p.symbol.clone(),
			})
			.collect(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::commands::test_support::memory_context;

	#[test]
	fn test_config_summary() {
		let out = run(&memory_context("")).unwrap();
		assert_eq!(out.chain_id, 31337);
		assert_eq!(out.collection, "memory");
		assert_eq!(out.sampling_factor, 15);
		assert_eq!(out.partitions.len(), 2);
		assert_eq!(out.partitions[1].symbol, "WETH");
	}
}

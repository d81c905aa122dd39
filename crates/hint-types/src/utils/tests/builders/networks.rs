//! Builder for network configuration used in tests.

use crate::networks::{NetworkConfig, PartitionConfig, RpcEndpoint};

/// Builder for creating `NetworkConfig` instances with a fluent API.
///
/// Defaults to a local anvil node on chain 31337.
///
/// # Examples
///
/// ```text
/// use hint_types::utils::tests::builders::NetworkConfigBuilder;
///
/// let network = NetworkConfigBuilder::new()
///     .chain_id(30)
///     .add_rpc_url("https://public-node.rsk.co")
///     .build();
/// assert_eq!(network.chain_id, 30);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
	chain_id: Option<u64>,
	rpc_urls: Vec<RpcEndpoint>,
}

impl Default for NetworkConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl NetworkConfigBuilder {
	pub fn new() -> Self {
		Self {
			chain_id: Some(31337),
			rpc_urls: vec![],
		}
	}

	pub fn chain_id(mut self, chain_id: u64) -> Self {
		self.chain_id = Some(chain_id);
		self
	}

	/// Adds an HTTP-only endpoint.
	pub fn add_rpc_url(mut self, url: impl Into<String>) -> Self {
		self.rpc_urls.push(RpcEndpoint::http_only(url));
		self
	}

	pub fn add_endpoint(mut self, endpoint: RpcEndpoint) -> Self {
		self.rpc_urls.push(endpoint);
		self
	}

	/// Builds the config, falling back to `http://localhost:8545` when no
	/// endpoint was added.
	///
	/// # Panics
	///
	/// Panics if the chain id was cleared. Use `try_build()` to handle that.
	pub fn build(self) -> NetworkConfig {
		self.try_build().expect("Missing required fields")
	}

	pub fn try_build(self) -> Result<NetworkConfig, NetworkConfigBuilderError> {
		let chain_id = self
			.chain_id
			.ok_or(NetworkConfigBuilderError::MissingField("chain_id"))?;
		let rpc_urls = if self.rpc_urls.is_empty() {
			vec![RpcEndpoint::http_only("http://localhost:8545")]
		} else {
			self.rpc_urls
		};
		Ok(NetworkConfig { chain_id, rpc_urls })
	}

	/// Partition list matching a two-collateral deployment.
	pub fn default_partitions() -> Vec<PartitionConfig> {
		vec![
			PartitionConfig {
				index: 0,
				symbol: "RBTC".to_string(),
			},
			PartitionConfig {
				index: 1,
				symbol: "WETH".to_string(),
			},
		]
	}
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkConfigBuilderError {
	#[error("Missing required field: {0}")]
	MissingField(&'static str),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let network = NetworkConfigBuilder::new().build();
		assert_eq!(network.chain_id, 31337);
		assert_eq!(network.get_http_url(), Some("http://localhost:8545"));
	}

	#[test]
	fn test_custom_endpoints_replace_default() {
		let network = NetworkConfigBuilder::new()
			.add_endpoint(RpcEndpoint::http_only("http://node:8545"))
			.add_rpc_url("http://backup:8545")
			.build();
		assert_eq!(network.rpc_urls.len(), 2);
		assert_eq!(network.get_http_url(), Some("http://node:8545"));
	}
}

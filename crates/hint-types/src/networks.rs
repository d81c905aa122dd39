//! Network and partition configuration types.
//!
//! A deployment lives on a single chain. The network section says how to reach
//! it, the partition list names the collateral sub-lists the deployment knows.

use serde::{Deserialize, Serialize};

/// A JSON-RPC endpoint. Only HTTP transports are used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcEndpoint {
	pub http: String,
}

impl RpcEndpoint {
	pub fn http_only(url: impl Into<String>) -> Self {
		Self { http: url.into() }
	}
}

/// Chain the collection contracts are deployed on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub chain_id: u64,
	pub rpc_urls: Vec<RpcEndpoint>,
}

impl NetworkConfig {
	/// Get the first configured HTTP URL.
	pub fn get_http_url(&self) -> Option<&str> {
		self.rpc_urls.first().map(|endpoint| endpoint.http.as_str())
	}
}

/// A collateral sub-list known to the deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PartitionConfig {
	/// Index the contracts use for this collateral.
	pub index: u32,
	/// Collateral symbol, for display only.
	pub symbol: String,
}

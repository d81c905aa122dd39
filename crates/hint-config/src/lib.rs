//! Configuration for the trove hint workspace.
//!
//! Configuration is read from a single TOML file. Values of the form `${VAR}`
//! or `${VAR:-default}` are substituted from the environment before parsing,
//! and the parsed result is validated before it is handed to anything else.
//!
//! ```toml
//! [resolver]
//! sampling_factor = 15
//! random_seed = 42
//!
//! [network]
//! chain_id = 31
//! [[network.rpc_urls]]
//! http = "${RPC_URL:-http://localhost:4444}"
//!
//! [[partitions]]
//! index = 0
//! symbol = "RBTC"
//!
//! [collection]
//! primary = "evm_alloy"
//! [collection.implementations.evm_alloy]
//! sorted_troves = "0x..."
//! ```

pub mod builders;

pub use builders::config::ConfigBuilder;

use hint_types::{
	NetworkConfig, Partition, PartitionConfig, DEFAULT_QUERY_TIMEOUT_SECONDS, DEFAULT_RANDOM_SEED,
	DEFAULT_SAMPLING_FACTOR,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message only; the default rendering repeats the whole input.
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Tuning of the two-phase hint search.
	#[serde(default)]
	pub resolver: ResolverSettings,
	/// Chain the collection contracts live on.
	pub network: NetworkConfig,
	/// Collateral partitions known to the deployment.
	pub partitions: Vec<PartitionConfig>,
	/// Which collection backend to use and how to build it.
	pub collection: CollectionConfig,
}

/// Settings of the hint resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverSettings {
	/// Approximate-rank trials per entry in the partition.
	#[serde(default = "default_sampling_factor")]
	pub sampling_factor: u64,
	/// Seed passed to every approximate-rank query.
	#[serde(default = "default_random_seed")]
	pub random_seed: u64,
	/// Upper bound on any single remote query.
	#[serde(default = "default_query_timeout_seconds")]
	pub query_timeout_seconds: u64,
}

impl Default for ResolverSettings {
	fn default() -> Self {
		Self {
			sampling_factor: DEFAULT_SAMPLING_FACTOR,
			random_seed: DEFAULT_RANDOM_SEED,
			query_timeout_seconds: DEFAULT_QUERY_TIMEOUT_SECONDS,
		}
	}
}

impl ResolverSettings {
	pub fn query_timeout(&self) -> Duration {
		Duration::from_secs(self.query_timeout_seconds)
	}

	/// Checks the settings on their own, without the rest of the file.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.sampling_factor == 0 {
			return Err(ConfigError::Validation(
				"resolver.sampling_factor must be at least 1".into(),
			));
		}
		if self.query_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"resolver.query_timeout_seconds must be at least 1".into(),
			));
		}
		Ok(())
	}
}

fn default_sampling_factor() -> u64 {
	DEFAULT_SAMPLING_FACTOR
}

fn default_random_seed() -> u64 {
	DEFAULT_RANDOM_SEED
}

fn default_query_timeout_seconds() -> u64 {
	DEFAULT_QUERY_TIMEOUT_SECONDS
}

/// Configuration of the collection backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Map of implementation names to their raw configuration tables.
	pub implementations: HashMap<String, toml::Value>,
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable, and
/// `${VAR_NAME:-default}` with the value or the default when unset.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	///
	/// Environment variables referenced in the file must already be set;
	/// the binary loads `.env` before calling this.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Configuration table of the primary collection implementation.
	pub fn primary_collection(&self) -> Option<(&str, &toml::Value)> {
		self.collection
			.implementations
			.get(&self.collection.primary)
			.map(|table| (self.collection.primary.as_str(), table))
	}

	/// Looks up a configured partition by index.
	pub fn partition(&self, partition: Partition) -> Option<&PartitionConfig> {
		self.partitions.iter().find(|p| p.index == partition.index())
	}

	/// Looks up a configured partition by collateral symbol, ignoring case.
	pub fn partition_by_symbol(&self, symbol: &str) -> Option<&PartitionConfig> {
		self.partitions
			.iter()
			.find(|p| p.symbol.eq_ignore_ascii_case(symbol))
	}

	/// Validates the configuration.
	///
	/// Registration of the primary implementation is checked later, when the
	/// collection crate builds it; here it only has to be configured.
	fn validate(&self) -> Result<(), ConfigError> {
		self.resolver.validate()?;

		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation(
				"network.chain_id must not be zero".into(),
			));
		}

		if self.partitions.is_empty() {
			return Err(ConfigError::Validation(
				"At least one partition must be configured".into(),
			));
		}
		let mut seen = HashSet::new();
		for partition in &self.partitions {
			if !seen.insert(partition.index) {
				return Err(ConfigError::Validation(format!(
					"Duplicate partition index {}",
					partition.index
				)));
			}
			if partition.symbol.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Partition {} has an empty symbol",
					partition.index
				)));
			}
		}

		if self.collection.primary.is_empty() {
			return Err(ConfigError::Validation(
				"collection.primary cannot be empty".into(),
			));
		}
		if !self
			.collection
			.implementations
			.contains_key(&self.collection.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary collection '{}' has no entry in collection.implementations",
				self.collection.primary
			)));
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const MINIMAL: &str = r#"
[network]
chain_id = 31337
[[network.rpc_urls]]
http = "http://localhost:8545"

[[partitions]]
index = 0
symbol = "RBTC"

[collection]
primary = "memory"
[collection.implementations.memory]
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("HINT_TEST_HOST", "localhost");
		std::env::set_var("HINT_TEST_PORT", "8545");

		let input = "url = \"http://${HINT_TEST_HOST}:${HINT_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "url = \"http://localhost:8545\"");

		std::env::remove_var("HINT_TEST_HOST");
		std::env::remove_var("HINT_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${HINT_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let result = resolve_env_vars("value = \"${HINT_MISSING_VAR}\"");
		assert!(result.unwrap_err().to_string().contains("HINT_MISSING_VAR"));
	}

	#[test]
	fn test_resolver_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.resolver, ResolverSettings::default());
		assert_eq!(config.resolver.sampling_factor, 15);
		assert_eq!(config.resolver.random_seed, 42);
		assert_eq!(config.resolver.query_timeout(), Duration::from_secs(30));
		assert_eq!(config.primary_collection().map(|(name, _)| name), Some("memory"));
	}

	#[test]
	fn test_resolver_overrides() {
		let input = format!(
			"[resolver]\nsampling_factor = 20\nrandom_seed = 7\nquery_timeout_seconds = 5\n{MINIMAL}"
		);
		let config: Config = input.parse().unwrap();
		assert_eq!(config.resolver.sampling_factor, 20);
		assert_eq!(config.resolver.random_seed, 7);
		assert_eq!(config.resolver.query_timeout_seconds, 5);
	}

	#[test]
	fn test_zero_sampling_factor_rejected() {
		let input = format!("[resolver]\nsampling_factor = 0\n{MINIMAL}");
		let err = input.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("sampling_factor")));
	}

	#[test]
	fn test_zero_query_timeout_rejected() {
		let input = format!("[resolver]\nquery_timeout_seconds = 0\n{MINIMAL}");
		let err = input.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("query_timeout_seconds")));

		let settings = ResolverSettings {
			query_timeout_seconds: 0,
			..ResolverSettings::default()
		};
		assert!(settings.validate().is_err());
	}

	#[test]
	fn test_duplicate_partition_rejected() {
		let input = format!("{MINIMAL}\n[[partitions]]\nindex = 0\nsymbol = \"WETH\"\n");
		let err = input.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Duplicate partition index 0"));
	}

	#[test]
	fn test_missing_partitions_rejected() {
		let input = format!(
			"partitions = []\n{}",
			MINIMAL.replace("[[partitions]]\nindex = 0\nsymbol = \"RBTC\"\n", "")
		);
		let err = input.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("At least one partition"));
	}

	#[test]
	fn test_unconfigured_primary_rejected() {
		let input = MINIMAL.replace("primary = \"memory\"", "primary = \"evm_alloy\"");
		let err = input.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("evm_alloy"));
	}

	#[test]
	fn test_parse_error_is_short() {
		let err = "[network\nchain_id = 1".parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}

	#[test]
	fn test_partition_lookup() {
		let input = format!("{MINIMAL}\n[[partitions]]\nindex = 3\nsymbol = \"WETH\"\n");
		let config: Config = input.parse().unwrap();
		assert_eq!(config.partition(Partition::new(3)).map(|p| p.symbol.as_str()), Some("WETH"));
		assert_eq!(config.partition_by_symbol("rbtc").map(|p| p.index), Some(0));
		assert!(config.partition(Partition::new(9)).is_none());
	}

	#[tokio::test]
	async fn test_from_file_resolves_env() {
		std::env::set_var("HINT_TEST_CHAIN_RPC", "http://node:8545");
		let mut file = tempfile::NamedTempFile::new().unwrap();
		let content = MINIMAL.replace("http://localhost:8545", "${HINT_TEST_CHAIN_RPC}");
		file.write_all(content.as_bytes()).unwrap();

		let config = Config::from_file(file.path()).await.unwrap();
		assert_eq!(config.network.get_http_url(), Some("http://node:8545"));
		std::env::remove_var("HINT_TEST_CHAIN_RPC");
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = Config::from_file(dir.path().join("absent.toml"))
			.await
			.unwrap_err();
		assert!(matches!(err, ConfigError::Io(_)));
	}
}

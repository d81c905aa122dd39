//! On-chain collection backend using Alloy.
//!
//! Reads the sorted trove list through `eth_call` against the deployed
//! `SortedTroves`, `HintHelpers` and trove manager contracts. Nothing is sent
//! as a transaction and no transport retry layer is installed: a failed call
//! surfaces to the caller, which decides whether to try again.

use crate::{
	CollectionBackend, CollectionError, DebtQuoteInterface, SortedCollectionInterface,
};
use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use alloy_transport::TransportError;
use async_trait::async_trait;
use hint_types::{
	parse_address, ConfigSchema, Field, FieldType, InsertPosition, NetworkConfig, OrderingKey,
	Partition, PartitionConfig, RedemptionHints, Schema, ValidationError,
};
use std::collections::HashSet;
use std::sync::Arc;

sol! {
	interface ISortedTroves {
		function getSize(uint256 _index) external view returns (uint256);
		function findInsertPosition(
			uint256 _index,
			uint256 _NICR,
			address _prevId,
			address _nextId
		) external view returns (address, address);
	}

	interface IHintHelpers {
		function getApproxHint(
			uint256 _index,
			uint256 _CR,
			uint256 _numTrials,
			uint256 _inputRandomSeed
		) external view returns (address hintAddress, uint256 diff, uint256 latestRandomSeed);
		function getRedemptionHints(
			uint256 _index,
			uint256 _ZUSDamount,
			uint256 _price,
			uint256 _maxIterations
		) external view returns (
			address firstRedemptionHint,
			uint256 partialRedemptionHintNICR,
			uint256 truncatedZUSDamount
		);
	}

	interface ITroveManager {
		function ZUSD_GAS_COMPENSATION() external view returns (uint256);
		function getBorrowingFeeWithDecay(uint256 _ZUSDDebt) external view returns (uint256);
	}
}

/// Deployed contract addresses the backend reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
	pub sorted_troves: Address,
	pub hint_helpers: Address,
	/// Source of the liquidation reserve.
	pub trove_manager: Address,
	/// Source of the borrowing fee. Some deployments split the trove manager
	/// in two and the fee lives on the second half.
	pub fee_manager: Address,
}

/// Collection backend reading a deployed sorted trove list.
pub struct AlloyCollection {
	provider: DynProvider,
	contracts: ContractAddresses,
	partitions: HashSet<Partition>,
}

impl AlloyCollection {
	pub fn new(
		provider: DynProvider,
		contracts: ContractAddresses,
		partitions: impl IntoIterator<Item = Partition>,
	) -> Self {
		Self {
			provider,
			contracts,
			partitions: partitions.into_iter().collect(),
		}
	}

	fn check_partition(&self, partition: Partition) -> Result<(), CollectionError> {
		if self.partitions.contains(&partition) {
			Ok(())
		} else {
			Err(CollectionError::UnknownPartition(partition))
		}
	}

	/// Performs an `eth_call` and decodes the result as the return of `C`.
	async fn view<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, CollectionError> {
		let request = TransactionRequest {
			to: Some(TxKind::Call(to)),
			input: call.abi_encode().into(),
			..Default::default()
		};

		let result = self
			.provider
			.call(request)
			.await
			.map_err(|e| CollectionError::Remote(describe_transport_error(C::SIGNATURE, &e)))?;

		decode_returns::<C>(&result)
	}
}

fn describe_transport_error(signature: &str, error: &TransportError) -> String {
	match error {
		TransportError::ErrorResp(payload) => {
			format!("{signature} rejected by node ({}): {}", payload.code, payload.message)
		},
		other => format!("{signature}: {other}"),
	}
}

fn decode_returns<C: SolCall>(data: &Bytes) -> Result<C::Return, CollectionError> {
	C::abi_decode_returns(data)
		.map_err(|e| CollectionError::Decode(format!("{}: {}", C::SIGNATURE, e)))
}

#[async_trait]
impl SortedCollectionInterface for AlloyCollection {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyCollectionSchema)
	}

	async fn size(&self, partition: Partition) -> Result<u64, CollectionError> {
		self.check_partition(partition)?;
		let size = self
			.view(self.contracts.sorted_troves, ISortedTroves::getSizeCall {
				_index: partition.as_u256(),
			})
			.await?;
		u64::try_from(size)
			.map_err(|_| CollectionError::Decode(format!("list size {size} does not fit in u64")))
	}

	async fn approximate_rank(
		&self,
		partition: Partition,
		key: OrderingKey,
		trials: U256,
		seed: U256,
	) -> Result<Address, CollectionError> {
		self.check_partition(partition)?;
		let answer = self
			.view(self.contracts.hint_helpers, IHintHelpers::getApproxHintCall {
				_index: partition.as_u256(),
				_CR: key.value(),
				_numTrials: trials,
				_inputRandomSeed: seed,
			})
			.await?;
		tracing::trace!(
			%partition,
			hint = %answer.hintAddress,
			diff = %answer.diff,
			"Approximate hint"
		);
		Ok(answer.hintAddress)
	}

	async fn exact_insert_position(
		&self,
		partition: Partition,
		key: OrderingKey,
		hint_a: Address,
		hint_b: Address,
	) -> Result<InsertPosition, CollectionError> {
		self.check_partition(partition)?;
		let answer = self
			.view(self.contracts.sorted_troves, ISortedTroves::findInsertPositionCall {
				_index: partition.as_u256(),
				_NICR: key.value(),
				_prevId: hint_a,
				_nextId: hint_b,
			})
			.await?;
		Ok(InsertPosition::new(answer._0, answer._1))
	}

	async fn redemption_hints(
		&self,
		partition: Partition,
		amount: U256,
		price: U256,
		max_iterations: U256,
	) -> Result<RedemptionHints, CollectionError> {
		self.check_partition(partition)?;
		let answer = self
			.view(self.contracts.hint_helpers, IHintHelpers::getRedemptionHintsCall {
				_index: partition.as_u256(),
				_ZUSDamount: amount,
				_price: price,
				_maxIterations: max_iterations,
			})
			.await?;
		Ok(RedemptionHints {
			first_redemption_hint: answer.firstRedemptionHint,
			partial_nicr: OrderingKey::new(answer.partialRedemptionHintNICR),
			truncated_amount: answer.truncatedZUSDamount,
		})
	}
}

#[async_trait]
impl DebtQuoteInterface for AlloyCollection {
	async fn gas_compensation(&self) -> Result<U256, CollectionError> {
		self.view(
			self.contracts.trove_manager,
			ITroveManager::ZUSD_GAS_COMPENSATIONCall {},
		)
		.await
	}

	async fn borrowing_fee(&self, debt: U256) -> Result<U256, CollectionError> {
		self.view(
			self.contracts.fee_manager,
			ITroveManager::getBorrowingFeeWithDecayCall { _ZUSDDebt: debt },
		)
		.await
	}
}

/// Configuration schema for the Alloy collection.
pub struct AlloyCollectionSchema;

impl AlloyCollectionSchema {
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		Self.validate(config)
	}
}

impl ConfigSchema for AlloyCollectionSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("sorted_troves", FieldType::Address),
				Field::new("hint_helpers", FieldType::Address),
				Field::new("trove_manager", FieldType::Address),
			],
			vec![
				Field::new("fee_manager", FieldType::Address),
				Field::new("rpc_url", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
							Ok(())
						},
						_ => Err("must be an http(s) URL".to_string()),
					}
				}),
			],
		);
		schema.validate(config)
	}
}

fn address_entry(config: &toml::Value, name: &str) -> Result<Option<Address>, CollectionError> {
	config
		.get(name)
		.and_then(|v| v.as_str())
		.map(|text| {
			parse_address(text)
				.map_err(|e| CollectionError::Configuration(format!("{name}: {e}")))
		})
		.transpose()
}

fn required_address(config: &toml::Value, name: &str) -> Result<Address, CollectionError> {
	address_entry(config, name)?
		.ok_or_else(|| CollectionError::Configuration(format!("Missing {name}")))
}

/// Factory function to create an Alloy collection from configuration.
///
/// Configuration parameters:
/// - `sorted_troves`, `hint_helpers`, `trove_manager`: contract addresses
/// - `fee_manager` (optional): contract answering `getBorrowingFeeWithDecay`,
///   defaults to `trove_manager`
/// - `rpc_url` (optional): overrides the network's first HTTP endpoint
pub fn create_collection(
	config: &toml::Value,
	network: &NetworkConfig,
	partitions: &[PartitionConfig],
) -> Result<CollectionBackend, CollectionError> {
	AlloyCollectionSchema::validate_config(config)
		.map_err(|e| CollectionError::Configuration(format!("Invalid configuration: {}", e)))?;

	let trove_manager = required_address(config, "trove_manager")?;
	let contracts = ContractAddresses {
		sorted_troves: required_address(config, "sorted_troves")?,
		hint_helpers: required_address(config, "hint_helpers")?,
		trove_manager,
		fee_manager: address_entry(config, "fee_manager")?.unwrap_or(trove_manager),
	};

	let url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.or_else(|| network.get_http_url())
		.ok_or_else(|| {
			CollectionError::Configuration(format!(
				"No HTTP RPC URL configured for chain {}",
				network.chain_id
			))
		})?;
	let url = url
		.parse()
		.map_err(|e| CollectionError::Configuration(format!("Invalid RPC URL '{url}': {e}")))?;

	let provider = ProviderBuilder::new().connect_http(url).erased();
	let collection = AlloyCollection::new(
		provider,
		contracts,
		partitions.iter().map(|p| Partition::new(p.index)),
	);

	tracing::debug!(
		chain_id = network.chain_id,
		sorted_troves = %contracts.sorted_troves,
		hint_helpers = %contracts.hint_helpers,
		"Created on-chain collection"
	);
	Ok(CollectionBackend::new(Arc::new(collection)))
}

/// Registry for the Alloy collection implementation.
pub struct Registry;

impl hint_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "evm_alloy";
	type Factory = crate::CollectionFactory;

	fn factory() -> Self::Factory {
		create_collection
	}
}

//! Parsing helpers for CLI and config input.

use alloy_primitives::utils::{parse_units, ParseUnits};
use alloy_primitives::{Address, U256};

/// Parses a hex address, with or without the 0x prefix.
pub fn parse_address(input: &str) -> Result<Address, String> {
	let trimmed = input.trim();
	let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);

	if hex_part.len() != 40 {
		return Err(format!(
			"Address must be 20 bytes (40 hex characters), got {}",
			hex_part.len()
		));
	}

	let bytes = hex::decode(hex_part).map_err(|e| format!("Invalid hex in address: {}", e))?;
	Ok(Address::from_slice(&bytes))
}

/// Converts a decimal amount such as `"1800"` or `"1.25"` to its fixed-point
/// integer with `decimals` places. No floating point is involved; fractional
/// digits beyond `decimals` are truncated.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, String> {
	let trimmed = input.trim();
	if trimmed.starts_with('-') {
		return Err(format!("Amount must not be negative: {}", trimmed));
	}

	let parsed = parse_units(trimmed, decimals)
		.map_err(|e| format!("Invalid amount '{}': {}", trimmed, e))?;

	match parsed {
		ParseUnits::U256(value) => Ok(value),
		ParseUnits::I256(_) => Err(format!("Amount must not be negative: {}", trimmed)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_address() {
		let with_prefix = parse_address("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
		let without_prefix = parse_address("5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
		assert_eq!(with_prefix, without_prefix);

		assert!(parse_address("0x1234").is_err());
		assert!(parse_address("0xzz0DB2315678afecb367f032d93F642f64180aa3").is_err());
	}

	#[test]
	fn test_parse_amount() {
		assert_eq!(
			parse_amount("1800", 18).unwrap(),
			U256::from(1_800_000_000_000_000_000_000u128)
		);
		assert_eq!(
			parse_amount("1.25", 18).unwrap(),
			U256::from(1_250_000_000_000_000_000u128)
		);
		assert_eq!(parse_amount("0.5", 6).unwrap(), U256::from(500_000u64));
		assert_eq!(parse_amount("0.0000019", 6).unwrap(), U256::from(1u64));
	}

	#[test]
	fn test_parse_amount_rejects_bad_input() {
		assert!(parse_amount("-1", 18).is_err());
		assert!(parse_amount("abc", 18).is_err());
	}
}

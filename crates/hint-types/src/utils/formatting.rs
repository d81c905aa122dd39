//! Display helpers for fixed-point amounts.

use alloy_primitives::U256;

/// Formats a fixed-point integer with `decimals` places, trimming trailing zeros.
pub fn format_amount(amount: U256, decimals: u8) -> String {
	if amount.is_zero() {
		return "0.0".to_string();
	}

	let divisor = U256::from(10).pow(U256::from(decimals));
	let whole = amount / divisor;
	let fractional = amount % divisor;

	let fractional_str = format!("{:0>width$}", fractional, width = decimals as usize);
	let trimmed = fractional_str.trim_end_matches('0');

	if trimmed.is_empty() {
		format!("{}.0", whole)
	} else {
		format!("{}.{}", whole, trimmed)
	}
}

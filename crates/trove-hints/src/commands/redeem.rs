//! `redeem`: hints for a redemption.

use super::{Context, TOKEN_DECIMALS};
use crate::cli::RedeemArgs;
use alloy_primitives::U256;
use anyhow::{Context as _, Result};
use hint_types::{parse_amount, RedemptionPlan};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RedeemOutput {
	pub partition: u32,
	pub symbol: String,
	#[serde(flatten)]
	pub plan: RedemptionPlan,
}

pub async fn run(ctx: &Context, args: &RedeemArgs) -> Result<RedeemOutput> {
	let (partition, info) = ctx.partition(&args.partition.partition)?;
	let amount = parse_amount(&args.amount, TOKEN_DECIMALS)
		.map_err(anyhow::Error::msg)
		.context("Invalid amount")?;
	let price = parse_amount(&args.price, TOKEN_DECIMALS)
		.map_err(anyhow::Error::msg)
		.context("Invalid price")?;

	let plan = ctx
		.resolver
		.resolve_redemption_hints(partition, amount, price, U256::from(args.max_iterations))
		.await?;
	Ok(RedeemOutput {
		partition: partition.index(),
		symbol: info.symbol.clone(),
		plan,
	})
}

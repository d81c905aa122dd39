//! `position`: hints for opening a position.

use super::{Context, TOKEN_DECIMALS};
use crate::cli::PositionArgs;
use anyhow::{Context as _, Result};
use hint_types::{parse_amount, PositionHint};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PositionOutput {
	pub partition: u32,
	pub symbol: String,
	#[serde(flatten)]
	pub hint: PositionHint,
}

pub async fn run(ctx: &Context, args: &PositionArgs) -> Result<PositionOutput> {
	let (partition, info) = ctx.partition(&args.partition.partition)?;
	let collateral = parse_amount(&args.collateral, TOKEN_DECIMALS)
		.map_err(anyhow::Error::msg)
		.context("Invalid collateral")?;
	let debt = parse_amount(&args.debt, TOKEN_DECIMALS)
		.map_err(anyhow::Error::msg)
		.context("Invalid debt")?;

	let hint = ctx
		.resolver
		.resolve_for_position(partition, collateral, debt)
		.await?;
	Ok(PositionOutput {
		partition: partition.index(),
		symbol: info.symbol.clone(),
		hint,
	})
}

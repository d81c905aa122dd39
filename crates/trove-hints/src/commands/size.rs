//! `size`: number of entries in a partition.

use super::Context;
use crate::cli::SizeArgs;
use anyhow::Result;
use hint_collection::SortedCollectionInterface;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SizeOutput {
	pub partition: u32,
	pub symbol: String,
	pub size: u64,
}

pub async fn run(ctx: &Context, args: &SizeArgs) -> Result<SizeOutput> {
	let (partition, info) = ctx.partition(&args.partition.partition)?;
	let size = ctx.backend.sorted.size(partition).await?;
	Ok(SizeOutput {
		partition: partition.index(),
		symbol: info.symbol.clone(),
		size,
	})
}

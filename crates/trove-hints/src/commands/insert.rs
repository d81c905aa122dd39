//! `insert`: neighbours of a raw ordering key.

use super::Context;
use crate::cli::InsertArgs;
use anyhow::Result;
use hint_types::{InsertPosition, OrderingKey};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InsertOutput {
	pub partition: u32,
	pub key: OrderingKey,
	#[serde(flatten)]
	pub position: InsertPosition,
}

pub async fn run(ctx: &Context, args: &InsertArgs) -> Result<InsertOutput> {
	let (partition, _) = ctx.partition(&args.partition.partition)?;
	let key: OrderingKey = args.key.parse()?;
	let position = ctx.resolver.resolve_insert_position(partition, key).await?;
	Ok(InsertOutput {
		partition: partition.index(),
		key,
		position,
	})
}

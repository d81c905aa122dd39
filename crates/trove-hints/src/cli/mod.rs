//! Command-line interface definitions.

pub mod output;

use clap::{Args, Parser, Subcommand};

/// Resolve sorted-list hints for trove operations.
#[derive(Parser, Debug)]
#[command(name = "trove-hints")]
#[command(about = "Resolve insert and redemption hints for a sorted trove list")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Configuration file
	#[arg(global = true, long, env = "HINT_CONFIG", default_value = "config/local.toml")]
	pub config: String,

	/// Enable debug logging
	#[arg(global = true, long, env = "HINT_DEBUG")]
	pub debug: bool,

	/// Print results as JSON
	#[arg(global = true, long)]
	pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Find the neighbours of a raw ordering key
	Insert(InsertArgs),

	/// Derive the key of a new position and find its neighbours
	Position(PositionArgs),

	/// Resolve the hints of a redemption
	Redeem(RedeemArgs),

	/// Show the number of entries in a partition
	Size(SizeArgs),

	/// Show the loaded configuration
	Config,
}

/// Partition selector shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct PartitionArg {
	/// Partition index or collateral symbol
	#[arg(short, long, default_value = "0")]
	pub partition: String,
}

#[derive(Args, Debug)]
pub struct InsertArgs {
	#[command(flatten)]
	pub partition: PartitionArg,

	/// Ordering key (NICR) as a raw integer, 1e20 precision
	pub key: String,
}

#[derive(Args, Debug)]
pub struct PositionArgs {
	#[command(flatten)]
	pub partition: PartitionArg,

	/// Collateral amount in whole tokens, e.g. "5" or "0.25"
	#[arg(long)]
	pub collateral: String,

	/// Requested debt in whole tokens, before fee and reserve
	#[arg(long)]
	pub debt: String,
}

#[derive(Args, Debug)]
pub struct RedeemArgs {
	#[command(flatten)]
	pub partition: PartitionArg,

	/// Amount to redeem in whole tokens
	#[arg(long)]
	pub amount: String,

	/// Collateral price in whole tokens
	#[arg(long)]
	pub price: String,

	/// Maximum entries the redemption may touch, 0 for no limit
	#[arg(long, default_value_t = 50)]
	pub max_iterations: u64,
}

#[derive(Args, Debug)]
pub struct SizeArgs {
	#[command(flatten)]
	pub partition: PartitionArg,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_insert() {
		let cli = Cli::try_parse_from(["trove-hints", "insert", "-p", "RBTC", "2500000000000000000"])
			.unwrap();
		match cli.command {
			Commands::Insert(args) => {
				assert_eq!(args.partition.partition, "RBTC");
				assert_eq!(args.key, "2500000000000000000");
			},
			other => panic!("unexpected command {other:?}"),
		}
		assert!(!cli.json);
	}

	#[test]
	fn test_parse_redeem_defaults() {
		let cli = Cli::try_parse_from([
			"trove-hints",
			"redeem",
			"--amount",
			"1810",
			"--price",
			"2000",
			"--json",
			"--config",
			"other.toml",
		])
		.unwrap();
		match cli.command {
			Commands::Redeem(args) => {
				assert_eq!(args.partition.partition, "0");
				assert_eq!(args.max_iterations, 50);
			},
			other => panic!("unexpected command {other:?}"),
		}
		assert!(cli.json);
		assert_eq!(cli.config, "other.toml");
	}

	#[test]
	fn test_position_requires_amounts() {
		assert!(Cli::try_parse_from(["trove-hints", "position", "--collateral", "5"]).is_err());
	}
}

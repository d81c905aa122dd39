//! Entry point for the trove-hints CLI.
//!
//! Loads `.env`, sets up logging, parses arguments, builds the context from
//! the configured collection and dispatches to the command handlers.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use trove_hints::{
	cli::{output::Display, Cli, Commands},
	commands::{self, TOKEN_DECIMALS},
	Context,
};

#[tokio::main]
async fn main() -> Result<()> {
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	init_logging(cli.debug);

	let ctx = match Context::load(&cli.config).await {
		Ok(ctx) => ctx,
		Err(e) => {
			Display::error(&format!("{e:#}"));
			std::process::exit(1);
		},
	};
	info!(config = %cli.config, collection = %ctx.config.collection.primary, "Configuration loaded");

	if let Err(e) = dispatch(&ctx, &cli).await {
		Display::error(&format!("{e:#}"));
		std::process::exit(1);
	}
	Ok(())
}

/// Initialize structured logging.
///
/// `RUST_LOG` wins when set; otherwise `--debug` raises the hint crates to
/// debug level.
fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default_filter = if debug {
		"trove_hints=debug,hint_resolver=debug,hint_collection=debug,info"
	} else {
		"trove_hints=info,hint_resolver=info,warn"
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}

#[instrument(skip_all, fields(json = cli.json))]
async fn dispatch(ctx: &Context, cli: &Cli) -> Result<()> {
	match &cli.command {
		Commands::Insert(args) => {
			let out = commands::insert::run(ctx, args).await?;
			render(cli.json, &out, || {
				Display::header("Insert Position");
				Display::kv("Partition", &out.partition.to_string());
				Display::kv("Key", &out.key.to_string());
				Display::kv("Predecessor", &out.position.predecessor.to_string());
				Display::kv("Successor", &out.position.successor.to_string());
				if out.position.is_head() {
					Display::info("Partition is empty; insert at head");
				}
			})
		},
		Commands::Position(args) => {
			let out = commands::position::run(ctx, args).await?;
			render(cli.json, &out, || {
				Display::header("Position Hint");
				Display::kv("Partition", &format!("{} ({})", out.partition, out.symbol));
				Display::kv(
					"Expected debt",
					&hint_types::format_amount(out.hint.expected_debt, TOKEN_DECIMALS),
				);
				Display::kv("NICR", &out.hint.key.to_string());
				Display::kv("Upper hint", &out.hint.position.predecessor.to_string());
				Display::kv("Lower hint", &out.hint.position.successor.to_string());
				Display::success("Hints resolved");
			})
		},
		Commands::Redeem(args) => {
			let out = commands::redeem::run(ctx, args).await?;
			render(cli.json, &out, || {
				Display::header("Redemption Hints");
				Display::kv("Partition", &format!("{} ({})", out.partition, out.symbol));
				Display::kv("First hint", &out.plan.first_redemption_hint.to_string());
				Display::kv("Partial NICR", &out.plan.partial_nicr.to_string());
				Display::kv("Upper partial hint", &out.plan.partial_position.predecessor.to_string());
				Display::kv("Lower partial hint", &out.plan.partial_position.successor.to_string());
				Display::kv(
					"Truncated amount",
					&hint_types::format_amount(out.plan.truncated_amount, TOKEN_DECIMALS),
				);
				if out.plan.truncated_amount.is_zero() {
					Display::warning("Nothing can be redeemed at this price");
				}
			})
		},
		Commands::Size(args) => {
			let out = commands::size::run(ctx, args).await?;
			render(cli.json, &out, || {
				Display::header("Partition Size");
				Display::kv("Partition", &format!("{} ({})", out.partition, out.symbol));
				Display::kv("Entries", &out.size.to_string());
			})
		},
		Commands::Config => {
			let out = commands::config::run(ctx)?;
			render(cli.json, &out, || {
				Display::header("Configuration");
				Display::kv("Chain ID", &out.chain_id.to_string());
				Display::kv("RPC URL", out.rpc_url.as_deref().unwrap_or("-"));
				Display::kv("Collection", &out.collection);
				Display::kv("Sampling factor", &out.sampling_factor.to_string());
				Display::kv("Random seed", &out.random_seed.to_string());
				Display::kv("Query timeout", &format!("{}s", out.query_timeout_seconds));
				Display::section("Partitions");
				for p in &out.partitions {
					println!("  {} {}", p.index, p.symbol);
				}
			})
		},
	}
}

fn render<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> Result<()> {
	if json {
		Display::json(value)
	} else {
		human();
		Ok(())
	}
}

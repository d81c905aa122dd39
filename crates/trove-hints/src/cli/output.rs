//! Terminal output helpers.

use colored::Colorize;

/// Colored status lines and key/value listings for the terminal.
pub struct Display;

impl Display {
	/// Section header with an underline.
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	pub fn success(message: &str) {
		println!("{} {}", "✓".green().bold(), message);
	}

	/// Errors go to stderr so JSON on stdout stays parseable.
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	pub fn warning(message: &str) {
		println!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	pub fn info(message: &str) {
		println!("{} {}", "ℹ".blue().bold(), message);
	}

	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{}:", key).bold(), value);
	}

	pub fn section(title: &str) {
		println!("\n{}", format!("▸ {}", title).bold());
	}

	/// Pretty JSON on stdout.
	pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
		println!("{}", serde_json::to_string_pretty(value)?);
		Ok(())
	}
}

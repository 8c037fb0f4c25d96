//! CLI command implementations for memdump-analyzer.
//!
//! This module provides implementations for all CLI subcommands:
//! - `summary`: Totals and per-type breakdown
//! - `tree`: Type-grouped block hierarchy
//! - `query`: Blocks of a single type
//! - `check`: Dump validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod query;
pub mod summary;
pub mod tree;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use query::command_query;
pub use summary::command_summary;
pub use tree::command_tree;

use anyhow::Result;
use memdump_analyzer::ParseOutcome;
use serde::Serialize;
use std::path::Path;

use crate::cli::OutputFormat;

/// Renders a serializable value as JSON or YAML.
pub(crate) fn to_structured<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
) -> Result<String> {
    let out = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Text => anyhow::bail!("text output has no structured form"),
    };
    Ok(out)
}

/// Prints the format errors a lenient parse collected, on stderr.
pub(crate) fn print_parse_errors(path: &Path, outcome: &ParseOutcome) {
    for err in &outcome.errors {
        eprintln!("⚠️  {}: {}", path.display(), err);
    }
    if outcome.halted {
        eprintln!(
            "⚠️  {}: parse stopped early, results cover the dump up to the bad line",
            path.display()
        );
    }
}

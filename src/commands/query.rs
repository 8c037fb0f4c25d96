//! Query command implementation.
//!
//! Lists the top-level blocks of a single type.

use anyhow::Result;
use memdump_analyzer::report::BlockView;
use memdump_analyzer::{format_size, ParseOptions};
use std::path::Path;

use super::{print_parse_errors, to_structured};
use crate::cli::OutputFormat;
use crate::input::load_dump;

/// Prints every top-level block whose type equals `mem_type`.
/// No match is not an error.
pub fn command_query(
    file: &Path,
    mem_type: &str,
    options: &ParseOptions,
    format: OutputFormat,
) -> Result<()> {
    let outcome = load_dump(file, options)?;
    print_parse_errors(file, &outcome);

    let blocks: Vec<BlockView> = outcome
        .model
        .query_type(mem_type)
        .into_iter()
        .map(BlockView::from)
        .collect();

    match format {
        OutputFormat::Text => {
            if blocks.is_empty() {
                println!("No blocks of type '{}'", mem_type);
                return Ok(());
            }
            let total: u64 = blocks.iter().map(|b| b.size).sum();
            println!(
                "{} block(s) of type '{}', {}",
                blocks.len(),
                mem_type,
                format_size(total)
            );
            for block in &blocks {
                println!(
                    "   ├─ {}..{}  {}  ({} children)",
                    block.start,
                    block.end,
                    format_size(block.size),
                    block.children.len()
                );
            }
        }
        _ => println!("{}", to_structured(&blocks, format)?),
    }

    Ok(())
}

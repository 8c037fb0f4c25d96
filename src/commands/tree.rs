//! Tree command implementation.
//!
//! Prints top-level blocks grouped by type, with their child blocks.

use anyhow::Result;
use memdump_analyzer::{group_by_type, ParseOptions, Totals, TreeView};
use std::path::Path;

use super::{print_parse_errors, to_structured};
use crate::cli::OutputFormat;
use crate::input::load_dump;

/// Prints the type-grouped block hierarchy of one dump.
pub fn command_tree(file: &Path, options: &ParseOptions, format: OutputFormat) -> Result<()> {
    let outcome = load_dump(file, options)?;
    print_parse_errors(file, &outcome);

    let groups = group_by_type(&outcome.model);

    match format {
        OutputFormat::Text => {
            println!("{}", Totals::from_model(&outcome.model));
            print!("{}", TreeView(&groups));
        }
        _ => println!("{}", to_structured(&groups, format)?),
    }

    Ok(())
}

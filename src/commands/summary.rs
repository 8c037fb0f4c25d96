//! Summary command implementation.
//!
//! Parses one or more dumps in parallel and prints totals with the
//! per-type breakdown.

use anyhow::Result;
use memdump_analyzer::{ParseOptions, SummaryReport};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use super::{print_parse_errors, to_structured};
use crate::cli::OutputFormat;
use crate::input::load_dump;

/// Prints summaries for each dump, in argument order.
///
/// Each file is parsed into its own model. A file that fails to load is
/// reported and the remaining files are still summarized.
pub fn command_summary(
    files: &[PathBuf],
    options: &ParseOptions,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();

    let results: Vec<_> = files
        .par_iter()
        .map(|path| load_dump(path, options).map(|outcome| (path, outcome)))
        .collect();

    debug!(
        "Parsed {} dump(s) in {:.2}ms",
        files.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let mut reports = Vec::with_capacity(results.len());
    let mut failed = 0;

    for result in results {
        match result {
            Ok((path, outcome)) => {
                print_parse_errors(path, &outcome);
                let source = (files.len() > 1).then(|| path.display().to_string());
                reports.push(SummaryReport::new(source, &outcome.model));
            }
            Err(e) => {
                eprintln!("❌ {:#}", e);
                failed += 1;
            }
        }
    }

    match format {
        OutputFormat::Text => {
            let texts: Vec<String> = reports.iter().map(|r| r.to_string()).collect();
            print!("{}", texts.join("\n"));
        }
        _ if reports.len() == 1 && files.len() == 1 => {
            println!("{}", to_structured(&reports[0], format)?);
        }
        _ => println!("{}", to_structured(&reports, format)?),
    }

    if failed > 0 {
        eprintln!("❌ {} of {} dump(s) could not be analyzed", failed, files.len());
        std::process::exit(1);
    }

    Ok(())
}

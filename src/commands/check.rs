//! Check command implementation.
//!
//! Validates dumps and reports every malformed record.

use anyhow::Result;
use memdump_analyzer::{format_size, ErrorPolicy, ParseOptions};
use std::path::PathBuf;

use crate::input::load_dump;

/// Parses each dump with the `skip` policy and lists all format errors.
/// Exits with code 1 if any dump is unreadable or malformed.
pub fn command_check(files: &[PathBuf], options: &ParseOptions) -> Result<()> {
    println!("🔍 Memory Dump Analyzer - Dump Check");
    println!("====================================");

    let options = options.clone().with_error_policy(ErrorPolicy::Skip);
    let mut all_ok = true;

    for path in files {
        println!("\n📄 {}", path.display());

        let outcome = match load_dump(path, &options) {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("   ❌ {:#}", e);
                all_ok = false;
                continue;
            }
        };

        let model = &outcome.model;
        if model.is_empty() {
            println!("   ⚠️  No top-level memory blocks found");
        } else {
            let children: usize = model.blocks().iter().map(|b| b.children().len()).sum();
            println!(
                "   ✅ {} blocks, {} child blocks, {} types",
                model.blocks().len(),
                children,
                model.summary().len()
            );
            println!(
                "   ✅ total {}  used {}  free {}",
                format_size(model.total_memory()),
                format_size(model.total_used()),
                format_size(model.total_free())
            );
        }

        if outcome.errors.is_empty() {
            println!("   ✅ No malformed records");
        } else {
            all_ok = false;
            println!("   ❌ {} malformed record(s):", outcome.errors.len());
            for err in &outcome.errors {
                println!("      ├─ {}", err);
            }
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All dumps are well-formed");
        Ok(())
    } else {
        println!("   ❌ Some dumps have problems - see above");
        std::process::exit(1);
    }
}

//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("memdump-analyzer.yaml"));

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Memory Dump Analyzer Configuration
# ===================================
#
# Dump Grammar
# ------------
# begin_marker: "BeginMemOutput"  # Lines up to the first line containing this are ignored
# end_marker: "EndMemOutput"      # Parsing stops at the first line containing this
# free_label: "Free"              # Type label counted as free memory (exact, case-sensitive)
#
# Error Handling
# --------------
# on_format_error: "abort"        # abort | stop (keep blocks before the bad line) | skip
#
# Output
# ------
# default_output: "text"          # text, json, yaml
#
# Logging
# -------
# log_level: "warn"               # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}

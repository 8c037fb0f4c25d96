//! CLI arguments and subcommands for memdump-analyzer.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Output format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Recovery policy for lines with corrupted numeric fields
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OnError {
    /// Fail the parse
    Abort,
    /// Keep everything before the bad line
    Stop,
    /// Skip bad lines and continue
    Skip,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "memdump-analyzer",
    about = "Analyze textual memory-map dumps: block hierarchy, per-type totals, used/free memory",
    long_about = "Analyze textual memory-map dumps.\n\n\
                  Reads dumps made of '<hex-address> <type> <decimal-size>' records between \
                  BeginMemOutput/EndMemOutput markers, where indented records are children of \
                  the preceding top-level record, and reports per-type totals, used/free memory \
                  and the block hierarchy.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (overrides log_level from the config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Substring marking the start of the dump
    #[arg(long)]
    pub begin_marker: Option<String>,

    /// Substring marking the end of the dump
    #[arg(long)]
    pub end_marker: Option<String>,

    /// Type label of free regions (exact, case-sensitive)
    #[arg(long)]
    pub free_label: Option<String>,

    /// What to do with lines whose address or size cannot be parsed
    #[arg(long, value_enum)]
    pub on_error: Option<OnError>,

    /// Output format for analysis results
    #[arg(short = 'o', long, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print totals and per-type breakdown for one or more dumps
    Summary {
        /// Dump files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print blocks grouped by type with their child blocks
    Tree {
        /// Dump file
        file: PathBuf,
    },

    /// List top-level blocks of one type
    Query {
        /// Dump file
        file: PathBuf,

        /// Type label to match (exact)
        #[arg(short = 't', long = "type")]
        mem_type: String,
    },

    /// Report every malformed record in one or more dumps
    Check {
        /// Dump files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}

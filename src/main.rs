//! memdump-analyzer - version 0.1.0
//!
//! Memory-map dump analyzer with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;
mod input;

use clap::{CommandFactory, Parser};
use tracing::{debug, info};
use tracing::level_filters::LevelFilter;

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_query, command_summary, command_tree};
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
/// CLI level wins over the config file; logs go to stderr.
fn setup_logging(config: &Config, args: &Args) {
    let level = match &args.log_level {
        Some(LogLevel::Off) => LevelFilter::OFF,
        Some(LogLevel::Error) => LevelFilter::ERROR,
        Some(LogLevel::Warn) => LevelFilter::WARN,
        Some(LogLevel::Info) => LevelFilter::INFO,
        Some(LogLevel::Debug) => LevelFilter::DEBUG,
        Some(LogLevel::Trace) => LevelFilter::TRACE,
        None => match config.log_level.as_deref() {
            Some("off") => LevelFilter::OFF,
            Some("error") => LevelFilter::ERROR,
            Some("info") => LevelFilter::INFO,
            Some("debug") => LevelFilter::DEBUG,
            Some("trace") => LevelFilter::TRACE,
            _ => LevelFilter::WARN,
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    let Some(command) = &args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    // Config generation does not depend on the effective config
    if let Commands::Config {
        output,
        format,
        commented,
    } = command
    {
        return command_config(output.clone(), format.clone(), *commented);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config, &args);

    let options = config.parse_options();
    let format = config.output_format();
    debug!(
        "Effective parse options: begin={:?} end={:?} free={:?} on_error={}",
        options.begin_marker,
        options.end_marker,
        options.free_label,
        options.error_policy.as_str()
    );

    match command {
        Commands::Summary { files } => command_summary(files, &options, format)?,
        Commands::Tree { file } => command_tree(file, &options, format)?,
        Commands::Query { file, mem_type } => command_query(file, mem_type, &options, format)?,
        Commands::Check { files } => command_check(files, &options)?,
        Commands::Config { .. } => unreachable!("Config handled above"),
    }

    Ok(())
}

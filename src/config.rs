//! Configuration management for memdump-analyzer.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, OnError, OutputFormat};
use memdump_analyzer::dump::{
    ErrorPolicy, ParseOptions, DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER, DEFAULT_FREE_LABEL,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Type labels are single word tokens in the dump grammar.
static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("valid label regex"));

/// Configuration file locations tried when no `--config` is given.
const DEFAULT_CONFIG_PATHS: [&str; 5] = [
    "./memdump-analyzer.yaml",
    "./memdump-analyzer.yml",
    "./memdump-analyzer.json",
    "./memdump-analyzer.toml",
    "/etc/memdump-analyzer/config.yaml",
];

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Dump grammar
    #[serde(alias = "begin-marker")]
    pub begin_marker: Option<String>,
    #[serde(alias = "end-marker")]
    pub end_marker: Option<String>,
    #[serde(alias = "free-label")]
    pub free_label: Option<String>,

    /// "abort" | "stop" | "skip"
    #[serde(alias = "on-format-error")]
    pub on_format_error: Option<String>,

    // Output
    /// "text" | "json" | "yaml"
    #[serde(alias = "default-output")]
    pub default_output: Option<String>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            begin_marker: Some(DEFAULT_BEGIN_MARKER.to_string()),
            end_marker: Some(DEFAULT_END_MARKER.to_string()),
            free_label: Some(DEFAULT_FREE_LABEL.to_string()),
            on_format_error: Some(ErrorPolicy::Abort.as_str().to_string()),
            default_output: Some("text".into()),
            log_level: Some("warn".into()),
        }
    }
}

impl Config {
    /// Builds parse options from the effective config, falling back to defaults.
    ///
    /// Call [`validate_effective_config`] first; an unknown error policy
    /// falls back to `abort` here.
    pub fn parse_options(&self) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            begin_marker: self.begin_marker.clone().unwrap_or(defaults.begin_marker),
            end_marker: self.end_marker.clone().unwrap_or(defaults.end_marker),
            free_label: self.free_label.clone().unwrap_or(defaults.free_label),
            error_policy: self
                .on_format_error
                .as_deref()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Output format from config, text unless set.
    pub fn output_format(&self) -> OutputFormat {
        match self.default_output.as_deref() {
            Some("json") => OutputFormat::Json,
            Some("yaml") => OutputFormat::Yaml,
            _ => OutputFormat::Text,
        }
    }
}

/// Validate effective config (used by --check-config and before every command)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let begin = cfg.begin_marker.as_deref().unwrap_or(DEFAULT_BEGIN_MARKER);
    let end = cfg.end_marker.as_deref().unwrap_or(DEFAULT_END_MARKER);

    if begin.trim().is_empty() {
        return Err("begin_marker must not be empty".into());
    }
    if end.trim().is_empty() {
        return Err("end_marker must not be empty".into());
    }
    if begin == end {
        return Err(format!("begin_marker and end_marker must differ (both '{}')", begin).into());
    }
    // Begin is tested first, so an end line containing it would never halt the parse
    if end.contains(begin) {
        return Err(format!(
            "end_marker '{}' must not contain begin_marker '{}'",
            end, begin
        )
        .into());
    }

    if let Some(label) = cfg.free_label.as_deref() {
        if !LABEL_RE.is_match(label) {
            return Err(format!(
                "Invalid free_label '{}', expected a single word (letters, digits, underscore)",
                label
            )
            .into());
        }
    }

    if let Some(policy) = cfg.on_format_error.as_deref() {
        policy.parse::<ErrorPolicy>()?;
    }

    if let Some(output) = cfg.default_output.as_deref() {
        match output {
            "text" | "json" | "yaml" => {}
            other => {
                return Err(format!(
                    "Invalid default_output '{}', expected 'text', 'json' or 'yaml'",
                    other
                )
                .into());
            }
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(format!("Invalid log_level '{}'", other).into());
            }
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(marker) = &args.begin_marker {
        config.begin_marker = Some(marker.clone());
    }
    if let Some(marker) = &args.end_marker {
        config.end_marker = Some(marker.clone());
    }
    if let Some(label) = &args.free_label {
        config.free_label = Some(label.clone());
    }

    if let Some(on_error) = args.on_error {
        let policy = match on_error {
            OnError::Abort => ErrorPolicy::Abort,
            OnError::Stop => ErrorPolicy::Stop,
            OnError::Skip => ErrorPolicy::Skip,
        };
        config.on_format_error = Some(policy.as_str().to_string());
    }

    if let Some(output) = args.output {
        let name = match output {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        config.default_output = Some(name.to_string());
    }

    Ok(config)
}

/// Loads configuration from `path`, or from the first default location that exists.
/// An explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
        {
            Some(p) => p,
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}

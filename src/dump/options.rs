//! Parse options: structural markers, the free-region sentinel and the
//! recovery policy for malformed numeric tokens.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_BEGIN_MARKER: &str = "BeginMemOutput";
pub const DEFAULT_END_MARKER: &str = "EndMemOutput";
pub const DEFAULT_FREE_LABEL: &str = "Free";

/// How the builder reacts to a [`FormatError`](super::FormatError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail the whole parse.
    #[default]
    Abort,
    /// Stop at the bad line and keep everything parsed before it.
    Stop,
    /// Drop the bad line and keep going.
    Skip,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Abort => "abort",
            ErrorPolicy::Stop => "stop",
            ErrorPolicy::Skip => "skip",
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(ErrorPolicy::Abort),
            "stop" => Ok(ErrorPolicy::Stop),
            "skip" => Ok(ErrorPolicy::Skip),
            other => Err(format!(
                "Invalid error policy '{}', expected 'abort', 'stop' or 'skip'",
                other
            )),
        }
    }
}

/// Options for a single parse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Substring marking the start of the dump.
    pub begin_marker: String,
    /// Substring marking the end of the dump.
    pub end_marker: String,
    /// Type label counted towards `total_free`. Compared exactly, case-sensitive.
    pub free_label: String,
    pub error_policy: ErrorPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            begin_marker: DEFAULT_BEGIN_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            free_label: DEFAULT_FREE_LABEL.to_string(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl ParseOptions {
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn is_free(&self, mem_type: &str) -> bool {
        mem_type == self.free_label
    }
}

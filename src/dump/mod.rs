//! Dump parsing: line classification and model building.
//!
//! This module provides:
//! - `classifier`: recognizes block headers, markers and noise lines
//! - `model`: `MemoryBlock`, `MemoryModel` and the incremental builder
//! - `options`: markers, free-region label and error policy
//! - `error`: `FormatError` for corrupted numeric tokens

pub mod classifier;
pub mod error;
pub mod model;
pub mod options;

// Re-export commonly used types
pub use classifier::{BlockHeader, LineClassifier, LineKind};
pub use error::{FormatError, FormatErrorKind};
pub use model::{MemoryBlock, MemoryModel, MemoryModelBuilder, ParseOutcome};
pub use options::{
    ErrorPolicy, ParseOptions, DEFAULT_BEGIN_MARKER, DEFAULT_END_MARKER, DEFAULT_FREE_LABEL,
};

//! Error types for dump parsing.

use thiserror::Error;

/// What went wrong with a numeric token on a header-shaped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// Address token is not a hexadecimal number that fits in 64 bits.
    InvalidAddress,
    /// Size token is not a decimal number that fits in 64 bits.
    InvalidSize,
    /// `start + size` does not fit in 64 bits.
    AddressOverflow,
    /// Adding the block to the running totals would overflow 64 bits.
    TotalOverflow,
}

impl std::fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FormatErrorKind::InvalidAddress => "invalid hexadecimal address",
            FormatErrorKind::InvalidSize => "invalid decimal size",
            FormatErrorKind::AddressOverflow => "block end address overflows",
            FormatErrorKind::TotalOverflow => "running memory total overflows",
        };
        f.write_str(s)
    }
}

/// A line that looks like a block header but carries an unusable numeric token.
///
/// Line numbers are 1-based and count every line of the input text,
/// including marker and noise lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number}: {kind}: {content:?}")]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub line_number: usize,
    pub content: String,
}

impl FormatError {
    pub fn new(kind: FormatErrorKind, line_number: usize, content: &str) -> Self {
        Self {
            kind,
            line_number,
            content: content.to_string(),
        }
    }
}

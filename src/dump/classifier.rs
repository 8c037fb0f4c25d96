//! Line classification for memory-map dumps.
//!
//! Every input line is one of: a structural marker, a top-level block header
//! (address at column 0), a child block header (indented address), or noise.
//! Hierarchy depth is carried only by indentation, and only depths 0 and 1
//! are distinguished.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::error::{FormatError, FormatErrorKind};
use super::options::ParseOptions;

/// `<hex-address> <type-word> <decimal-size>` starting at column 0.
/// The size token swallows trailing word characters so that a corrupted
/// value such as `12ab`, or a unit-suffixed size such as `512KB`, is
/// reported as a format error instead of silently read as a number.
/// The address token does not: `1000g Heap 12` is not a header at all.
static TOP_LEVEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:0[xX])?([0-9a-fA-F]+)\s+(\w+)\s+(\d\w*)")
        .expect("valid top-level regex")
});

/// Same three fields behind one or more whitespace characters.
static CHILD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+(?:0[xX])?([0-9a-fA-F]+)\s+(\w+)\s+(\d\w*)").expect("valid child regex")
});

/// Fields extracted from a block header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader<'a> {
    pub start: u64,
    pub mem_type: &'a str,
    pub size: u64,
}

/// Classification result for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    BeginMarker,
    EndMarker,
    TopLevel(BlockHeader<'a>),
    Child(BlockHeader<'a>),
    Noise,
}

/// Recognizes dump lines against a pair of structural markers.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'o> {
    begin_marker: &'o str,
    end_marker: &'o str,
}

impl<'o> LineClassifier<'o> {
    pub fn new(begin_marker: &'o str, end_marker: &'o str) -> Self {
        Self {
            begin_marker,
            end_marker,
        }
    }

    pub fn from_options(options: &'o ParseOptions) -> Self {
        Self::new(&options.begin_marker, &options.end_marker)
    }

    /// Classifies `line` (without its trailing newline).
    ///
    /// `line_number` is only used to label a [`FormatError`]. The begin
    /// marker is tested before the end marker, so a line carrying both is
    /// a begin marker. An empty marker never matches.
    pub fn classify<'l>(
        &self,
        line_number: usize,
        line: &'l str,
    ) -> Result<LineKind<'l>, FormatError> {
        if line.is_empty() {
            return Ok(LineKind::Noise);
        }
        if !self.begin_marker.is_empty() && line.contains(self.begin_marker) {
            return Ok(LineKind::BeginMarker);
        }
        if !self.end_marker.is_empty() && line.contains(self.end_marker) {
            return Ok(LineKind::EndMarker);
        }

        if let Some(caps) = TOP_LEVEL_RE.captures(line) {
            return header_from_captures(&caps, line_number, line).map(LineKind::TopLevel);
        }
        if let Some(caps) = CHILD_RE.captures(line) {
            return header_from_captures(&caps, line_number, line).map(LineKind::Child);
        }

        Ok(LineKind::Noise)
    }
}

fn header_from_captures<'l>(
    caps: &Captures<'l>,
    line_number: usize,
    line: &'l str,
) -> Result<BlockHeader<'l>, FormatError> {
    let fail = |kind| FormatError::new(kind, line_number, line);

    let (Some(addr), Some(mem_type), Some(size)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return Err(fail(FormatErrorKind::InvalidAddress));
    };

    let start = u64::from_str_radix(addr.as_str(), 16)
        .map_err(|_| fail(FormatErrorKind::InvalidAddress))?;
    let size: u64 = size
        .as_str()
        .parse()
        .map_err(|_| fail(FormatErrorKind::InvalidSize))?;
    if start.checked_add(size).is_none() {
        return Err(fail(FormatErrorKind::AddressOverflow));
    }

    Ok(BlockHeader {
        start,
        mem_type: mem_type.as_str(),
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier<'static> {
        LineClassifier::new("BeginMemOutput", "EndMemOutput")
    }

    fn classify(line: &str) -> Result<LineKind<'_>, FormatError> {
        classifier().classify(1, line)
    }

    // -------------------------------------------------------------------------
    // Headers
    // -------------------------------------------------------------------------

    #[test]
    fn test_top_level_header() {
        assert_eq!(
            classify("1000 Heap 512").unwrap(),
            LineKind::TopLevel(BlockHeader {
                start: 0x1000,
                mem_type: "Heap",
                size: 512
            })
        );

        // Mixed case hex, tabs, trailing text
        assert_eq!(
            classify("dEaD\tPool\t\t64 trailing words").unwrap(),
            LineKind::TopLevel(BlockHeader {
                start: 0xdead,
                mem_type: "Pool",
                size: 64
            })
        );

        // 0x prefix
        assert_eq!(
            classify("0x2000 Free 1024").unwrap(),
            LineKind::TopLevel(BlockHeader {
                start: 0x2000,
                mem_type: "Free",
                size: 1024
            })
        );
    }

    #[test]
    fn test_child_header() {
        assert_eq!(
            classify("  1100 Alloc 256").unwrap(),
            LineKind::Child(BlockHeader {
                start: 0x1100,
                mem_type: "Alloc",
                size: 256
            })
        );
        assert!(matches!(classify("\t0 X 0").unwrap(), LineKind::Child(_)));
    }

    #[test]
    fn test_zero_size_is_valid() {
        assert_eq!(
            classify("ffff Guard 0").unwrap(),
            LineKind::TopLevel(BlockHeader {
                start: 0xffff,
                mem_type: "Guard",
                size: 0
            })
        );
    }

    // -------------------------------------------------------------------------
    // Markers and noise
    // -------------------------------------------------------------------------

    #[test]
    fn test_markers() {
        assert_eq!(classify("BeginMemOutput").unwrap(), LineKind::BeginMarker);
        assert_eq!(classify("--- BeginMemOutput ---").unwrap(), LineKind::BeginMarker);
        assert_eq!(classify("EndMemOutput").unwrap(), LineKind::EndMarker);
        assert_eq!(classify("  EndMemOutput trailing").unwrap(), LineKind::EndMarker);
        assert_eq!(
            classify("BeginMemOutput EndMemOutput").unwrap(),
            LineKind::BeginMarker
        );
    }

    #[test]
    fn test_empty_markers_never_match() {
        let classifier = LineClassifier::new("", "");
        assert_eq!(classifier.classify(1, "anything").unwrap(), LineKind::Noise);
        assert!(matches!(
            classifier.classify(2, "1000 Heap 1").unwrap(),
            LineKind::TopLevel(_)
        ));
    }

    #[test]
    fn test_noise_lines() {
        for line in [
            "",
            "   ",
            "# comment",
            "Total memory: 1536",
            "1000 Heap",
            "1000 Heap size",
            "zzzz Heap 12",
            "1000g Heap 12",
            "1000 Heap -5",
        ] {
            assert_eq!(classify(line).unwrap(), LineKind::Noise, "line {:?}", line);
        }
    }

    // -------------------------------------------------------------------------
    // Format errors
    // -------------------------------------------------------------------------

    #[test]
    fn test_corrupted_size_is_format_error() {
        let err = classifier().classify(4, "1000 Heap 12ab").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::InvalidSize);
        assert_eq!(err.line_number, 4);
        assert_eq!(err.content, "1000 Heap 12ab");
    }

    #[test]
    fn test_unit_suffixed_size_is_format_error() {
        let err = classify("1000 Heap 512KB").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::InvalidSize);

        let err = classify("  1000 Alloc 4M").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::InvalidSize);

        // A bad address token does not make a header
        assert_eq!(classify("1000g Heap 12").unwrap(), LineKind::Noise);
    }

    #[test]
    fn test_oversized_tokens_are_format_errors() {
        let err = classify("1ffffffffffffffff Heap 1").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::InvalidAddress);

        let err = classify("  1000 Alloc 99999999999999999999999").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::InvalidSize);

        let err = classify("ffffffffffffffff Heap 2").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::AddressOverflow);
    }
}

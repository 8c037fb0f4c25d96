//! Reading dump files from disk.
//!
//! The parser works on text only; this is where bytes become text.
//! Dumps are decoded as UTF-8 and invalid sequences are replaced, so a dump
//! written in a legacy code page still parses (type labels outside ASCII may
//! come out mangled).

use anyhow::{Context, Result};
use memdump_analyzer::{MemoryModel, ParseOptions, ParseOutcome};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Reads a dump file into text.
pub fn read_dump_file(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read dump file {}", path.display()))?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                "{} is not valid UTF-8, undecodable bytes were replaced",
                path.display()
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    };

    Ok(text)
}

/// Reads and parses one dump file.
///
/// Under the `abort` policy a format error fails the whole call; otherwise
/// the errors are carried in the returned outcome.
pub fn load_dump(path: &Path, options: &ParseOptions) -> Result<ParseOutcome> {
    let text = read_dump_file(path)?;
    let outcome = MemoryModel::parse_with(&text, options)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if outcome.model.is_empty() {
        warn!("{} contains no top-level memory blocks", path.display());
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memdump_analyzer::ErrorPolicy;
    use std::io::Write;

    fn temp_dump(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp dump");
        file.write_all(content).expect("write temp dump");
        file
    }

    #[test]
    fn test_read_utf8_dump() {
        let file = temp_dump(b"BeginMemOutput\n1000 Heap 512\nEndMemOutput\n");
        let text = read_dump_file(file.path()).unwrap();
        assert!(text.contains("1000 Heap 512"));
    }

    #[test]
    fn test_read_non_utf8_dump_is_lossy() {
        // GBK-encoded comment line followed by a valid record
        let file = temp_dump(b"\xc4\xda\xb4\xe6\n1000 Heap 512\n");
        let text = read_dump_file(file.path()).unwrap();
        assert!(text.contains('\u{FFFD}'));

        let model = MemoryModel::parse(&text).unwrap();
        assert_eq!(model.total_used(), 512);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_dump_file(Path::new("/nonexistent/dump.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dump.txt"));
    }

    #[test]
    fn test_load_dump_respects_policy() {
        let file = temp_dump(b"1000 Heap 512\n2000 Free 1x\n3000 Free 64\n");

        let abort = ParseOptions::default();
        let err = load_dump(file.path(), &abort).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));

        let skip = ParseOptions::default().with_error_policy(ErrorPolicy::Skip);
        let outcome = load_dump(file.path(), &skip).unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.model.total_memory(), 576);
    }
}

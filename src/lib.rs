//! Memory Dump Analyzer Library
//!
//! This library turns a textual memory-map dump into a typed block hierarchy
//! with aggregate statistics. It performs no I/O: callers hand in text that
//! has already been read and decoded.
//!
//! # Input format
//!
//! ```text
//! BeginMemOutput
//! 1000 Heap 512          <- top-level block: hex address, type, decimal size
//!   1000 Alloc 256       <- child block (indented), attached to the last top-level block
//! 2000 Free 1024
//! EndMemOutput
//! ```
//!
//! # Usage
//!
//! ```rust
//! use memdump_analyzer::{format_size, MemoryModel};
//!
//! let text = "BeginMemOutput\n1000 Heap 512\n  1000 Alloc 256\n2000 Free 1024\nEndMemOutput\n";
//! let model = MemoryModel::parse(text).expect("well-formed dump");
//!
//! assert_eq!(model.total_used(), 512);
//! assert_eq!(model.total_free(), 1024);
//! assert_eq!(format_size(model.total_memory()), "1.50KB");
//!
//! for block in model.query_type("Heap") {
//!     println!("{:#x}..{:#x} ({} children)", block.start(), block.end(), block.children().len());
//! }
//! ```

pub mod dump;
pub mod format;
pub mod report;

// Re-export main types for convenience
pub use dump::{
    ErrorPolicy, FormatError, FormatErrorKind, MemoryBlock, MemoryModel, MemoryModelBuilder,
    ParseOptions, ParseOutcome,
};
pub use format::{format_address, format_size};
pub use report::{chart_slices, group_by_type, SummaryReport, Totals, TreeView, TypeGroup};

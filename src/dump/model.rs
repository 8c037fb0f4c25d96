//! Memory model built from a dump: the block hierarchy plus running totals.
//!
//! A [`MemoryModel`] is produced by a single top-to-bottom pass over the dump
//! text. Top-level blocks feed the per-type summary and the used/free totals;
//! child blocks are attached to the most recent top-level block and never
//! contribute to any counter.

use ahash::AHashMap as HashMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{debug, info, trace, warn};

use super::classifier::{BlockHeader, LineClassifier, LineKind};
use super::error::{FormatError, FormatErrorKind};
use super::options::{ErrorPolicy, ParseOptions};

/// One contiguous region reported by the dump.
///
/// Blocks are only created from validated headers, so `start + size`
/// always fits in a `u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    mem_type: String,
    start: u64,
    size: u64,
    children: Vec<MemoryBlock>,
}

impl MemoryBlock {
    fn from_header(header: &BlockHeader<'_>) -> Self {
        Self {
            mem_type: header.mem_type.to_string(),
            start: header.start,
            size: header.size,
            children: Vec::new(),
        }
    }

    pub fn mem_type(&self) -> &str {
        &self.mem_type
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    /// Child blocks in input order. Always empty for a child block.
    pub fn children(&self) -> &[MemoryBlock] {
        &self.children
    }
}

impl Serialize for MemoryBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MemoryBlock", 5)?;
        state.serialize_field("type", &self.mem_type)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("end", &self.end())?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

/// Parsed memory layout with aggregate statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryModel {
    blocks: Vec<MemoryBlock>,
    summary: HashMap<String, u64>,
    total_used: u64,
    total_free: u64,
}

/// Result of [`MemoryModel::parse_with`].
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub model: MemoryModel,
    /// Format errors that were skipped, or the one that stopped the parse.
    pub errors: Vec<FormatError>,
    /// True when the `Stop` policy cut the parse short.
    pub halted: bool,
}

impl MemoryModel {
    /// Parses `text` with default options, failing on the first format error.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        Self::parse_with(text, &ParseOptions::default()).map(|outcome| outcome.model)
    }

    /// Parses `text` honoring the markers, free label and error policy in `options`.
    ///
    /// When the text contains a begin-marker line, everything up to and
    /// including the first one is ignored. Parsing stops at the first
    /// end-marker line or at end of input.
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<ParseOutcome, FormatError> {
        let first_line = if options.begin_marker.is_empty() {
            0
        } else {
            text.lines()
                .position(|line| line.contains(options.begin_marker.as_str()))
                .map_or(0, |idx| idx + 1)
        };

        let mut builder = MemoryModelBuilder::new(options);
        let mut errors = Vec::new();
        let mut halted = false;

        for (idx, line) in text.lines().enumerate().skip(first_line) {
            if builder.is_done() {
                break;
            }
            if let Err(err) = builder.push_line(idx + 1, line) {
                match options.error_policy {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Stop => {
                        warn!("Stopping parse at {}", err);
                        errors.push(err);
                        halted = true;
                        break;
                    }
                    ErrorPolicy::Skip => {
                        warn!("Skipping {}", err);
                        errors.push(err);
                    }
                }
            }
        }

        let model = builder.finish();
        if model.is_empty() {
            debug!("Dump contains no top-level blocks");
        }
        info!(
            "Parsed {} top-level blocks ({} types): used={} free={} total={}",
            model.blocks.len(),
            model.summary.len(),
            model.total_used,
            model.total_free,
            model.total_memory()
        );

        Ok(ParseOutcome {
            model,
            errors,
            halted,
        })
    }

    /// Replaces this model with a fresh parse of `text`.
    ///
    /// On error the current contents are left untouched.
    pub fn reparse(&mut self, text: &str, options: &ParseOptions) -> Result<(), FormatError> {
        let strict = options.clone().with_error_policy(ErrorPolicy::Abort);
        *self = Self::parse_with(text, &strict)?.model;
        Ok(())
    }

    /// Top-level blocks in input order.
    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    /// Cumulative top-level size per type label.
    pub fn summary(&self) -> &HashMap<String, u64> {
        &self.summary
    }

    /// Summary entries sorted by size (largest first), then by label.
    pub fn summary_sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .summary
            .iter()
            .map(|(label, size)| (label.as_str(), *size))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn total_used(&self) -> u64 {
        self.total_used
    }

    pub fn total_free(&self) -> u64 {
        self.total_free
    }

    /// Always `total_used + total_free`.
    pub fn total_memory(&self) -> u64 {
        self.total_used + self.total_free
    }

    /// Top-level blocks whose type equals `label`, in input order.
    pub fn query_type(&self, label: &str) -> Vec<&MemoryBlock> {
        self.blocks
            .iter()
            .filter(|block| block.mem_type == label)
            .collect()
    }

    /// True when the dump held no top-level records.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    AwaitingData,
    HaveParent,
    /// The last top-level record was rejected; its children are dropped.
    Orphaned,
    Done,
}

/// Folds dump lines into a [`MemoryModel`] one at a time.
///
/// Lines must be pushed in input order. A failed [`push_line`](Self::push_line)
/// leaves the model exactly as it was before the call. When the failed line
/// is a top-level record, the children that follow it are dropped as orphans
/// until the next valid top-level record.
#[derive(Debug)]
pub struct MemoryModelBuilder<'o> {
    options: &'o ParseOptions,
    classifier: LineClassifier<'o>,
    model: MemoryModel,
    state: BuilderState,
}

impl<'o> MemoryModelBuilder<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            classifier: LineClassifier::from_options(options),
            model: MemoryModel::default(),
            state: BuilderState::AwaitingData,
        }
    }

    /// True once an end marker has been consumed.
    pub fn is_done(&self) -> bool {
        self.state == BuilderState::Done
    }

    /// Consumes one line. Lines pushed after the end marker are ignored.
    pub fn push_line(&mut self, line_number: usize, line: &str) -> Result<(), FormatError> {
        if self.is_done() {
            return Ok(());
        }

        let kind = match self.classifier.classify(line_number, line) {
            Ok(kind) => kind,
            Err(err) => {
                if !line.starts_with(char::is_whitespace) {
                    self.state = BuilderState::Orphaned;
                }
                return Err(err);
            }
        };

        match kind {
            LineKind::TopLevel(header) => {
                if let Err(err) = self.open_block(line_number, line, &header) {
                    self.state = BuilderState::Orphaned;
                    return Err(err);
                }
            }
            LineKind::Child(header) => self.attach_child(line_number, &header),
            LineKind::EndMarker => {
                debug!("End marker at line {}", line_number);
                self.state = BuilderState::Done;
            }
            LineKind::BeginMarker | LineKind::Noise => {
                trace!("Ignoring line {}: {:?}", line_number, line);
            }
        }
        Ok(())
    }

    fn open_block(
        &mut self,
        line_number: usize,
        line: &str,
        header: &BlockHeader<'_>,
    ) -> Result<(), FormatError> {
        let is_free = self.options.is_free(header.mem_type);
        let model = &mut self.model;

        // Compute every new total before touching the model.
        let overflow = || FormatError::new(FormatErrorKind::TotalOverflow, line_number, line);
        let (total_used, total_free) = if is_free {
            let free = model.total_free.checked_add(header.size).ok_or_else(overflow)?;
            (model.total_used, free)
        } else {
            let used = model.total_used.checked_add(header.size).ok_or_else(overflow)?;
            (used, model.total_free)
        };
        if total_used.checked_add(total_free).is_none() {
            return Err(overflow());
        }
        let type_total = model
            .summary
            .get(header.mem_type)
            .copied()
            .unwrap_or(0)
            .checked_add(header.size)
            .ok_or_else(overflow)?;

        debug!(
            "Block {} at {:#x} size {} (line {})",
            header.mem_type, header.start, header.size, line_number
        );

        model.total_used = total_used;
        model.total_free = total_free;
        model.summary.insert(header.mem_type.to_string(), type_total);
        model.blocks.push(MemoryBlock::from_header(header));
        self.state = BuilderState::HaveParent;
        Ok(())
    }

    fn attach_child(&mut self, line_number: usize, header: &BlockHeader<'_>) {
        match (self.state, self.model.blocks.last_mut()) {
            (BuilderState::HaveParent, Some(parent)) => {
                trace!(
                    "Child {} at {:#x} size {} under {:#x}",
                    header.mem_type,
                    header.start,
                    header.size,
                    parent.start
                );
                parent.children.push(MemoryBlock::from_header(header));
            }
            _ => {
                debug!("Dropping orphan child block at line {}", line_number);
            }
        }
    }

    /// Returns the finished model.
    pub fn finish(self) -> MemoryModel {
        self.model
    }
}

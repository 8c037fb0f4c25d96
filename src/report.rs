//! Presentation views over a parsed [`MemoryModel`].
//!
//! These are the shapes a front end consumes: proportion-chart slices,
//! a type-grouped block listing and the overall totals. All of them
//! serialize with serde and render as plain text via `Display`.

use ahash::AHashMap as HashMap;
use serde::Serialize;
use std::fmt;

use crate::dump::{MemoryBlock, MemoryModel};
use crate::format::{format_address, format_size};

/// Total, used and free memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl Totals {
    pub fn from_model(model: &MemoryModel) -> Self {
        Self {
            total: model.total_memory(),
            used: model.total_used(),
            free: model.total_free(),
        }
    }
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {}  used {}  free {}",
            format_size(self.total),
            format_size(self.used),
            format_size(self.free)
        )
    }
}

/// One slice of the per-type proportion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub size: u64,
    /// Share of total memory, rounded to one decimal.
    pub percent: f64,
}

/// Chart slices for every type with a non-zero total, largest first.
pub fn chart_slices(model: &MemoryModel) -> Vec<ChartSlice> {
    let total = model.total_memory();
    model
        .summary_sorted()
        .into_iter()
        .filter(|(_, size)| *size > 0)
        .map(|(label, size)| ChartSlice {
            label: label.to_string(),
            size,
            percent: percent_of(size, total),
        })
        .collect()
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = part as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Serializable view of a block with hex addresses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    #[serde(rename = "type")]
    pub mem_type: String,
    pub start: String,
    pub end: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockView>,
}

impl From<&MemoryBlock> for BlockView {
    fn from(block: &MemoryBlock) -> Self {
        Self {
            mem_type: block.mem_type().to_string(),
            start: format_address(block.start()),
            end: format_address(block.end()),
            size: block.size(),
            children: block.children().iter().map(BlockView::from).collect(),
        }
    }
}

/// All top-level blocks of one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeGroup {
    pub label: String,
    pub total_size: u64,
    pub blocks: Vec<BlockView>,
}

/// Groups top-level blocks by type, in order of each type's first appearance.
pub fn group_by_type(model: &MemoryModel) -> Vec<TypeGroup> {
    let mut groups: Vec<TypeGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for block in model.blocks() {
        let idx = *index.entry(block.mem_type()).or_insert_with(|| {
            groups.push(TypeGroup {
                label: block.mem_type().to_string(),
                total_size: 0,
                blocks: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.total_size += block.size();
        group.blocks.push(BlockView::from(block));
    }

    groups
}

/// Text tree over type groups.
pub struct TreeView<'a>(pub &'a [TypeGroup]);

impl fmt::Display for TreeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in self.0 {
            writeln!(f, "{} ({})", group.label, format_size(group.total_size))?;
            for (i, block) in group.blocks.iter().enumerate() {
                let last = i + 1 == group.blocks.len();
                let (branch, indent) = if last { ("└─", "   ") } else { ("├─", "│  ") };
                writeln!(f, "{} {}  {}", branch, block.start, format_size(block.size))?;
                for (j, child) in block.children.iter().enumerate() {
                    let child_branch = if j + 1 == block.children.len() {
                        "└─"
                    } else {
                        "├─"
                    };
                    writeln!(
                        f,
                        "{}{} {} {}  {}",
                        indent,
                        child_branch,
                        child.mem_type,
                        child.start,
                        format_size(child.size)
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Totals plus chart slices for one parsed dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub totals: Totals,
    pub block_count: usize,
    pub types: Vec<ChartSlice>,
}

impl SummaryReport {
    pub fn new(source: Option<String>, model: &MemoryModel) -> Self {
        Self {
            source,
            totals: Totals::from_model(model),
            block_count: model.blocks().len(),
            types: chart_slices(model),
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            writeln!(f, "{}", source)?;
        }
        writeln!(f, "{} ({} blocks)", self.totals, self.block_count)?;
        let width = self.types.iter().map(|s| s.label.len()).max().unwrap_or(0);
        for slice in &self.types {
            writeln!(
                f,
                "  {:<width$}  {:>12}  {:>5.1}%",
                slice.label,
                format_size(slice.size),
                slice.percent,
                width = width
            )?;
        }
        Ok(())
    }
}

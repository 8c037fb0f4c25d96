//! Integration tests for dump parsing.
//!
//! These tests exercise `MemoryModel` through the public API with realistic
//! dumps and check that the aggregates stay consistent with the blocks.

use memdump_analyzer::{format_size, MemoryBlock, MemoryModel};

const SAMPLE: &str = "BeginMemOutput
1000 Heap 512
  1000 Alloc 256
  1100 Alloc 256
2000 Free 1024
EndMemOutput
";

/// Larger dump with several types, children, noise lines and a zero-size block.
const MIXED: &str = "memory report generated by firmware v2
BeginMemOutput
# addr type size
0 Code 65536
  0 Text 60000
  ea60 RoData 5536
10000 Heap 131072
  10000 Alloc 4096
  11000 Alloc 8192

  13000 Alloc 1024
30000 Free 262144
70000 Pool 16384
  70000 Chunk 16384
74000 Heap 4096
75000 Guard 0
75000 Free 45056
EndMemOutput
80000 Heap 999
trailing junk
";

/// Helper: checks the invariants every completed parse must satisfy.
fn assert_consistent(model: &MemoryModel) {
    assert_eq!(
        model.total_memory(),
        model.total_used() + model.total_free()
    );

    let summary_total: u64 = model.summary().values().sum();
    assert_eq!(summary_total, model.total_memory());

    for (label, size) in model.summary() {
        let expected: u64 = model.query_type(label).iter().map(|b| b.size()).sum();
        assert_eq!(*size, expected, "summary mismatch for {}", label);
    }

    for block in model.blocks() {
        assert_eq!(block.end() - block.start(), block.size());
        for child in block.children() {
            assert_eq!(child.end() - child.start(), child.size());
            assert!(child.children().is_empty());
        }
    }
}

fn block_tuple(block: &MemoryBlock) -> (&str, u64, u64, u64) {
    (block.mem_type(), block.start(), block.size(), block.end())
}

#[test]
fn test_reference_example() {
    let model = MemoryModel::parse(SAMPLE).unwrap();

    assert_eq!(model.blocks().len(), 2);

    let heap = &model.blocks()[0];
    assert_eq!(block_tuple(heap), ("Heap", 4096, 512, 4608));
    let children: Vec<_> = heap.children().iter().map(block_tuple).collect();
    assert_eq!(
        children,
        vec![("Alloc", 4096, 256, 4352), ("Alloc", 4352, 256, 4608)]
    );

    let free = &model.blocks()[1];
    assert_eq!(block_tuple(free), ("Free", 8192, 1024, 9216));
    assert!(free.children().is_empty());

    assert_eq!(model.summary().len(), 2);
    assert_eq!(model.summary().get("Heap"), Some(&512));
    assert_eq!(model.summary().get("Free"), Some(&1024));
    assert_eq!(model.total_used(), 512);
    assert_eq!(model.total_free(), 1024);
    assert_eq!(model.total_memory(), 1536);
    assert_eq!(format_size(model.total_memory()), "1.50KB");

    assert_consistent(&model);
}

#[test]
fn test_query_free_returns_single_block() {
    let model = MemoryModel::parse(SAMPLE).unwrap();
    let free = model.query_type("Free");

    assert_eq!(free.len(), 1);
    assert_eq!(free[0].start(), 0x2000);
    assert_eq!(free[0].size(), 1024);
}

#[test]
fn test_mixed_dump() {
    let model = MemoryModel::parse(MIXED).unwrap();
    assert_consistent(&model);

    let types: Vec<&str> = model.blocks().iter().map(|b| b.mem_type()).collect();
    assert_eq!(
        types,
        vec!["Code", "Heap", "Free", "Pool", "Heap", "Guard", "Free"]
    );

    // Blank line between children does not detach the third Alloc
    assert_eq!(model.blocks()[1].children().len(), 3);
    assert_eq!(model.blocks()[1].children()[2].start(), 0x13000);

    assert_eq!(model.summary().get("Heap"), Some(&(131072 + 4096)));
    assert_eq!(model.summary().get("Free"), Some(&(262144 + 45056)));
    assert_eq!(model.summary().get("Guard"), Some(&0));
    assert_eq!(model.total_free(), 307200);
    assert_eq!(model.total_used(), 65536 + 131072 + 16384 + 4096);

    // Children never reach the summary
    assert!(model.summary().get("Alloc").is_none());
    assert!(model.query_type("Alloc").is_empty());

    let heaps = model.query_type("Heap");
    assert_eq!(heaps.len(), 2);
    assert_eq!(heaps[0].start(), 0x10000);
    assert_eq!(heaps[1].start(), 0x74000);
}

#[test]
fn test_parsing_is_deterministic() {
    let first = MemoryModel::parse(MIXED).unwrap();
    let second = MemoryModel::parse(MIXED).unwrap();

    assert_eq!(first.blocks(), second.blocks());
    assert_eq!(first.summary(), second.summary());
    assert_eq!(first.total_used(), second.total_used());
    assert_eq!(first.total_free(), second.total_free());
    assert_eq!(first, second);
}

#[test]
fn test_junk_outside_markers_is_ignored() {
    let framed = "\
9000 Junk 77
  9000 JunkChild 7
noise before
BeginMemOutput
1000 Heap 512
  1000 Alloc 256
2000 Free 1024
EndMemOutput
3000 Heap 4096
noise after
";
    let stripped = "1000 Heap 512\n  1000 Alloc 256\n2000 Free 1024\n";

    assert_eq!(
        MemoryModel::parse(framed).unwrap(),
        MemoryModel::parse(stripped).unwrap()
    );
}

#[test]
fn test_run_of_children_attaches_to_latest_parent() {
    let text = "\
1000 Heap 64
  1000 A 1
2000 Pool 64
  2000 B 1
  2001 C 1
\t2002 D 1
3000 Free 8
";
    let model = MemoryModel::parse(text).unwrap();

    assert_eq!(model.blocks()[0].children().len(), 1);
    let pool_children: Vec<&str> = model.blocks()[1]
        .children()
        .iter()
        .map(|c| c.mem_type())
        .collect();
    assert_eq!(pool_children, vec!["B", "C", "D"]);
    assert!(model.blocks()[2].children().is_empty());
}

#[test]
fn test_orphan_children_are_dropped() {
    let text = "BeginMemOutput\n  1000 Alloc 256\n  1100 Alloc 256\n2000 Free 1024\nEndMemOutput\n";
    let model = MemoryModel::parse(text).unwrap();

    assert_eq!(model.blocks().len(), 1);
    assert!(model.blocks()[0].children().is_empty());
    assert_eq!(model.total_used(), 0);
    assert_eq!(model.total_free(), 1024);
    assert_eq!(model.summary().len(), 1);
}

#[test]
fn test_empty_region_gives_empty_model() {
    for text in [
        "",
        "\n\n",
        "BeginMemOutput\nEndMemOutput\n",
        "BeginMemOutput\n  1000 Alloc 5\nnothing here\nEndMemOutput",
        "EndMemOutput\n1000 Heap 5\n",
    ] {
        let model = MemoryModel::parse(text).unwrap();
        assert!(model.is_empty(), "expected empty model for {:?}", text);
        assert!(model.summary().is_empty());
        assert_eq!(model.total_memory(), 0);
    }
}

#[test]
fn test_windows_line_endings() {
    let text = SAMPLE.replace('\n', "\r\n");
    assert_eq!(
        MemoryModel::parse(&text).unwrap(),
        MemoryModel::parse(SAMPLE).unwrap()
    );
}

#[test]
fn test_missing_end_marker_parses_to_eof() {
    let text = "BeginMemOutput\n1000 Heap 512\n2000 Free 1024\n";
    let model = MemoryModel::parse(text).unwrap();
    assert_eq!(model.blocks().len(), 2);
    assert_eq!(model.total_memory(), 1536);
}

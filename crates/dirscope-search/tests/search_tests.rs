use std::fs;
use std::path::Path;

use dirscope_scan::{ScanConfig, Scanner, TreeScanner};
use dirscope_search::{
    CancellationToken, FileNode, SearchConfig, TreeSearcher, search, search_with_cancel,
};
use tempfile::TempDir;

/// `/data` with `count` files named `log-N.txt` of size N+1, plus noise.
fn log_tree(count: u64) -> FileNode {
    let logs = (0..count)
        .map(|i| FileNode::file(format!("/data/logs/log-{i:03}.txt"), i + 1))
        .collect();
    FileNode::directory(
        "/data",
        vec![
            FileNode::directory("/data/logs", logs),
            FileNode::file("/data/readme.md", 1000),
            FileNode::file("/data/CATALOG", 50),
        ],
    )
}

#[test]
fn test_empty_query_returns_empty_result() {
    for tree in [log_tree(0), log_tree(20)] {
        let result = search(&tree, "", 200);
        assert!(result.matches.is_empty());
        assert_eq!(result.total_match_count, 0);
        assert_eq!(result.total_match_bytes, 0);
        assert!(!result.has_matches());
    }
}

#[test]
fn test_totals_cover_matches_beyond_limit() {
    let tree = log_tree(50);
    let result = search(&tree, "log-", 10);

    assert_eq!(result.matches.len(), 10);
    assert_eq!(result.total_match_count, 50);
    assert_eq!(result.total_match_bytes, (1..=50).sum::<u64>());
    assert_eq!(result.matched_paths.len(), 50);
    assert_eq!(result.omitted_count(), 40);

    let kept: u64 = result.matches.iter().map(|m| m.size()).sum();
    assert!(result.total_match_bytes >= kept);

    let sizes: Vec<u64> = result.matches.iter().map(|m| m.size()).collect();
    assert_eq!(sizes, (41..=50).rev().collect::<Vec<_>>());
}

#[test]
fn test_totals_equal_matches_within_limit() {
    let tree = log_tree(5);
    let result = search(&tree, "LOG", 200);

    // "logs", five files and "CATALOG".
    assert_eq!(result.total_match_count, 7);
    assert_eq!(result.matches.len() as u64, result.total_match_count);
    let kept: u64 = result.matches.iter().map(|m| m.size()).sum();
    assert_eq!(kept, result.total_match_bytes);
}

#[test]
fn test_matches_sorted_by_size_descending() {
    let tree = log_tree(30);
    let result = search(&tree, "a", 7);

    assert!(result.matches.len() <= 7);
    assert!(result.matches.windows(2).all(|w| w[0].size() >= w[1].size()));
    assert_eq!(result.matches[0].node.name(), "data");
}

#[test]
fn test_zero_limit_keeps_totals() {
    let tree = log_tree(12);
    let result = search(&tree, "log-", 0);

    assert!(result.matches.is_empty());
    assert_eq!(result.total_match_count, 12);
    assert_eq!(result.total_match_bytes, (1..=12).sum::<u64>());
    assert!(result.contains_path(Path::new("/data/logs/log-000.txt")));
}

#[test]
fn test_match_depth_is_relative_to_search_root() {
    let tree = log_tree(3);
    let logs = &tree.children()[0];
    let result = search(logs, "log-001", 10);

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].depth, 1);
}

#[test]
fn test_cancelled_search_returns_partial_result() {
    let tree = log_tree(10);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = search_with_cancel(&tree, &SearchConfig::new("log"), &cancel);
    assert!(result.cancelled);
    assert_eq!(result.total_match_count, 0);

    let complete = TreeSearcher::with_config(SearchConfig::new("log")).search(&tree);
    assert!(!complete.cancelled);
    assert_eq!(complete.total_match_count, 12);
}

#[test]
fn test_deep_tree_does_not_overflow() {
    const DEPTH: usize = 100_000;

    let mut node = FileNode::file("/deep/needle", 9);
    for i in (0..DEPTH).rev() {
        node = FileNode::directory(format!("/deep/d{i}"), vec![node]);
    }
    let tree = FileNode::directory("/deep", vec![node]);

    let result = search(&tree, "needle", 5);
    assert_eq!(result.total_match_count, 1);
    assert_eq!(result.matches[0].depth, DEPTH + 1);
    assert_eq!(result.matches[0].size(), 9);

    drop(result);
    drop(tree);
}

#[test]
fn test_search_over_scanned_tree() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src/cache")).unwrap();
    fs::write(temp.path().join("src/cache/blob.bin"), [0u8; 64]).unwrap();
    fs::write(temp.path().join("Cache.db"), [0u8; 16]).unwrap();
    fs::write(temp.path().join("main.rs"), [0u8; 8]).unwrap();

    let tree = TreeScanner::new()
        .scan_blocking(&ScanConfig::new(temp.path()), &CancellationToken::new())
        .unwrap();

    let result = search(&tree, "cache", 200);
    assert_eq!(result.total_match_count, 2);
    assert_eq!(result.total_match_bytes, 64 + 16);
    let names: Vec<_> = result.matches.iter().map(|m| m.node.name()).collect();
    assert_eq!(names, ["cache", "Cache.db"]);
}

#[test]
fn test_result_serializes_to_json() {
    let tree = log_tree(2);
    let result = search(&tree, "log-001", 10);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["total_match_count"], 1);
    assert_eq!(json["matches"][0]["depth"], 2);
}

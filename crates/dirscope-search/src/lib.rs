//! Name search over scanned dirscope trees.
//!
//! The search walks an already-built [`FileNode`] tree with an explicit
//! stack, so arbitrarily deep trees are fine. It returns two things:
//!
//! - **Top matches** - the largest `limit` matching nodes, size descending
//! - **Totals** - count, combined size and paths of *every* match
//!
//! Cancellation is cooperative and, unlike scanning, keeps whatever was found
//! up to that point.
//!
//! ```rust,ignore
//! use dirscope_scan::{CancellationToken, ScanConfig, Scanner, TreeScanner};
//! use dirscope_search::search;
//!
//! let tree = TreeScanner::new()
//!     .scan_blocking(&ScanConfig::new("/path/to/scan"), &CancellationToken::new())
//!     .unwrap();
//!
//! let result = search(&tree, "node_modules", 20);
//! println!("{} matches, {} bytes", result.total_match_count, result.total_match_bytes);
//! for m in &result.matches {
//!     println!("{} ({} bytes)", m.node.path().display(), m.size());
//! }
//! ```

mod search;
mod topk;

pub use search::{
    DEFAULT_LIMIT, SearchConfig, SearchConfigBuilder, SearchMatch, SearchResult, TreeSearcher,
    search, search_with_cancel,
};
pub use topk::TopK;

// Re-export core types
pub use dirscope_core::FileNode;
pub use tokio_util::sync::CancellationToken;

//! Summary statistics over a scanned tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::node::FileNode;

/// Summary statistics for a scanned tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total size in bytes.
    pub total_size: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories, the root included.
    pub total_dirs: u64,
    /// Directories whose children were not materialized.
    pub truncated_dirs: u64,
    /// Deepest materialized level (root = 0).
    pub max_depth: u32,
    /// Largest file (path, size).
    pub largest_file: Option<(PathBuf, u64)>,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a tree and collect its statistics.
    pub fn from_tree(root: &FileNode) -> Self {
        let mut stats = Self::new();
        stats.total_size = root.size();

        let mut stack = vec![(root, 0u32)];
        while let Some((node, depth)) = stack.pop() {
            if node.is_dir() {
                stats.record_dir(depth, node.is_truncated());
                stack.extend(node.children().iter().map(|c| (c, depth + 1)));
            } else {
                stats.record_file(node, depth);
            }
        }

        stats
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, node: &FileNode, depth: u32) {
        self.total_files += 1;
        self.max_depth = self.max_depth.max(depth);

        if self
            .largest_file
            .as_ref()
            .is_none_or(|(_, s)| node.size() > *s)
        {
            self.largest_file = Some((node.path().to_path_buf(), node.size()));
        }
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32, truncated: bool) {
        self.total_dirs += 1;
        if truncated {
            self.truncated_dirs += 1;
        }
        self.max_depth = self.max_depth.max(depth);
    }
}

//! File and directory node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A single file or directory in a scanned tree.
///
/// Nodes are immutable once built. Directories own their children, which are
/// ordered by ascending path. A directory's size is the sum of its children's
/// sizes, except for directories cut off by a depth cap: those carry no
/// children and the full recursive size of everything below them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    name: CompactString,
    path: PathBuf,
    is_dir: bool,
    size: u64,
    #[serde(default, skip_serializing_if = "is_false")]
    truncated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<FileNode>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FileNode {
    /// Create a leaf node for a non-directory entry.
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            is_dir: false,
            size,
            truncated: false,
            children: Vec::new(),
        }
    }

    /// Create a directory node from fully built children.
    ///
    /// The size is the sum of the children's sizes. Children are kept in the
    /// order given; the scanner passes them sorted by path.
    pub fn directory(path: impl Into<PathBuf>, children: Vec<FileNode>) -> Self {
        let path = path.into();
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: display_name(&path),
            path,
            is_dir: true,
            size,
            truncated: false,
            children,
        }
    }

    /// Create a directory node whose children were not materialized.
    ///
    /// `size` must be the true recursive size of the directory.
    pub fn truncated_directory(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            is_dir: true,
            size,
            truncated: true,
            children: Vec::new(),
        }
    }

    /// Display name: the last path component, or the whole path when it has none.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the entry at scan time.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Size in bytes (aggregate for directories).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether this directory was cut off by a depth cap.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Children ordered by ascending path.
    pub fn children(&self) -> &[FileNode] {
        &self.children
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True for files and for directories without materialized children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.iter().count() - 1
    }

    /// Pre-order iterator over this node and all materialized descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }
}

/// Tears the tree down one level at a time, so dropping a deep tree does not
/// recurse once per level.
impl Drop for FileNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order traversal using an explicit stack, so depth is not bounded by
/// the call stack.
pub struct Iter<'a> {
    stack: Vec<&'a FileNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FileNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a FileNode {
    type Item = &'a FileNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) if !name.is_empty() => CompactString::new(name.to_string_lossy()),
        _ => CompactString::new(path.to_string_lossy()),
    }
}

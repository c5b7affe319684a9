//! Recursive, cancellable directory scanner.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use dirscope_core::{FileNode, ScanConfig, ScanError};

use crate::classify::is_skippable;
use crate::fs::{FileSystem, StdFileSystem};
use crate::progress::{ProgressTracker, ScanProgress};

/// Something that can turn a root path into a [`FileNode`] tree.
pub trait Scanner: Send + Sync {
    /// Scan `config.root` on the current thread.
    ///
    /// Returns [`ScanError::Cancelled`] if `cancel` fires before the scan
    /// completes; no partial tree is ever returned.
    fn scan_blocking(
        &self,
        config: &ScanConfig,
        cancel: &CancellationToken,
    ) -> Result<FileNode, ScanError>;
}

/// Depth-first scanner that builds the tree bottom-up.
///
/// Traversal within one scan is sequential. The scanner keeps no state
/// between calls apart from the progress channel, so independent scans may
/// run concurrently on clones of the same scanner.
///
/// Clones share that channel. Counters are per call, but a subscriber sees
/// the snapshots of every scan run on the scanner or any of its clones, with
/// no tag saying which scan sent them. Use a separate scanner per scan when
/// progress has to be told apart.
pub struct TreeScanner<F = StdFileSystem> {
    fs: Arc<F>,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl TreeScanner<StdFileSystem> {
    /// Create a scanner over the real filesystem.
    pub fn new() -> Self {
        Self::with_fs(StdFileSystem)
    }
}

impl Default for TreeScanner<StdFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for TreeScanner<F> {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            progress_tx: self.progress_tx.clone(),
        }
    }
}

impl<F: FileSystem> TreeScanner<F> {
    /// Create a scanner over a custom filesystem.
    pub fn with_fs(fs: F) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            fs: Arc::new(fs),
            progress_tx,
        }
    }

    /// Subscribe to scan progress updates from this scanner and all its
    /// clones.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }
}

impl<F: FileSystem + 'static> TreeScanner<F> {
    /// Scan on tokio's blocking pool so the calling task stays responsive.
    pub async fn scan(
        &self,
        config: ScanConfig,
        cancel: CancellationToken,
    ) -> Result<FileNode, ScanError> {
        let scanner = self.clone();
        match tokio::task::spawn_blocking(move || scanner.scan_blocking(&config, &cancel)).await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(ScanError::Cancelled),
        }
    }
}

impl<F: FileSystem> Scanner for TreeScanner<F> {
    fn scan_blocking(
        &self,
        config: &ScanConfig,
        cancel: &CancellationToken,
    ) -> Result<FileNode, ScanError> {
        if !self.fs.exists(&config.root) {
            return Err(ScanError::NotFound {
                path: config.root.clone(),
            });
        }

        let root = std::path::absolute(&config.root)
            .map_err(|e| ScanError::unreadable(&config.root, e))?;

        debug!(root = %root.display(), max_depth = ?config.max_depth, "scan started");

        let mut walk = Walk {
            fs: self.fs.as_ref(),
            config,
            cancel,
            progress: ProgressTracker::new(self.progress_tx.clone()),
        };

        match walk.build_root(&root) {
            Ok(tree) => {
                walk.progress.finish(&root);
                debug!(
                    root = %root.display(),
                    size = tree.size(),
                    skipped = walk.progress.skipped(),
                    elapsed = ?walk.progress.elapsed(),
                    "scan finished"
                );
                Ok(tree)
            }
            Err(ScanError::Cancelled) => {
                debug!(root = %root.display(), "scan cancelled");
                Err(ScanError::Cancelled)
            }
            Err(err) => {
                warn!(root = %root.display(), error = %err, "scan aborted");
                Err(err)
            }
        }
    }
}

/// Traversal state owned by a single scan call.
struct Walk<'a, F> {
    fs: &'a F,
    config: &'a ScanConfig,
    cancel: &'a CancellationToken,
    progress: ProgressTracker,
}

impl<F: FileSystem> Walk<'_, F> {
    fn checkpoint(&self) -> Result<(), ScanError> {
        if self.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        Ok(())
    }

    /// The root is resolved through symlinks; everything below it is not.
    fn build_root(&mut self, root: &Path) -> Result<FileNode, ScanError> {
        self.checkpoint()?;
        let metadata = self
            .fs
            .metadata(root)
            .map_err(|e| ScanError::unreadable(root, e))?;

        if metadata.is_dir {
            self.build_dir(root, 0)
        } else {
            self.progress.record_file(root, metadata.size());
            Ok(FileNode::file(root, metadata.size()))
        }
    }

    /// Build a child entry. `Ok(None)` means the entry is a symlink.
    fn build_entry(&mut self, path: &Path, depth: u32) -> Result<Option<FileNode>, ScanError> {
        self.checkpoint()?;
        let metadata = self
            .fs
            .symlink_metadata(path)
            .map_err(|e| ScanError::unreadable(path, e))?;

        if metadata.is_symlink {
            return Ok(None);
        }

        if metadata.is_dir {
            return self.build_dir(path, depth).map(Some);
        }

        self.progress.record_file(path, metadata.size());
        Ok(Some(FileNode::file(path, metadata.size())))
    }

    fn build_dir(&mut self, path: &Path, depth: u32) -> Result<FileNode, ScanError> {
        if self.config.is_capped(depth) {
            let size = self.measure_dir(path)?;
            return Ok(FileNode::truncated_directory(path, size));
        }

        let entries = self.list(path)?;
        let mut children = Vec::with_capacity(entries.len());

        for entry in &entries {
            match self.build_entry(entry, depth + 1) {
                Ok(Some(child)) => children.push(child),
                Ok(None) => trace!(path = %entry.display(), "skipping symlink"),
                Err(err) if is_skippable(&err) => self.skip(entry, &err),
                Err(err) => return Err(err),
            }
        }

        Ok(FileNode::directory(path, children))
    }

    /// Recursive size of a directory without building nodes for its contents.
    fn measure_dir(&mut self, path: &Path) -> Result<u64, ScanError> {
        self.checkpoint()?;
        let entries = self.list(path)?;
        let mut total = 0u64;

        for entry in &entries {
            match self.measure_entry(entry) {
                Ok(size) => total += size,
                Err(err) if is_skippable(&err) => self.skip(entry, &err),
                Err(err) => return Err(err),
            }
        }

        Ok(total)
    }

    fn measure_entry(&mut self, path: &Path) -> Result<u64, ScanError> {
        self.checkpoint()?;
        let metadata = self
            .fs
            .symlink_metadata(path)
            .map_err(|e| ScanError::unreadable(path, e))?;

        if metadata.is_symlink {
            Ok(0)
        } else if metadata.is_dir {
            self.measure_dir(path)
        } else {
            self.progress.record_file(path, metadata.size());
            Ok(metadata.size())
        }
    }

    /// List a directory, sorted by path so the output does not depend on
    /// the order the OS hands entries back in.
    fn list(&mut self, path: &Path) -> Result<Vec<std::path::PathBuf>, ScanError> {
        self.checkpoint()?;
        let mut entries = self
            .fs
            .read_dir(path)
            .map_err(|e| ScanError::unreadable(path, e))?;
        self.checkpoint()?;

        entries.sort();
        self.progress.record_dir(path);
        Ok(entries)
    }

    fn skip(&mut self, path: &Path, err: &ScanError) {
        trace!(path = %path.display(), error = %err, "skipping unreadable entry");
        self.progress.record_skip();
    }
}

//! Directory scanning engine for dirscope.
//!
//! This crate walks a directory from a root path and builds an immutable
//! [`FileNode`] tree with aggregated sizes.
//!
//! # Overview
//!
//! - **Deterministic**: children are ordered by path, so scanning an unchanged
//!   directory twice yields equal trees
//! - **Partial failures**: entries that cannot be read (permissions, entries
//!   vanishing mid-scan) are dropped; any other failure aborts the scan
//! - **Depth cap**: directories at the cap keep their full recursive size but
//!   no children
//! - **Cancellation**: cooperative, via [`CancellationToken`]; a cancelled
//!   scan yields no tree
//! - Symbolic links below the root are never followed and never counted
//!
//! # Example
//!
//! ```rust,no_run
//! use dirscope_scan::{CancellationToken, ScanConfig, Scanner, TreeScanner};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let scanner = TreeScanner::new();
//! let tree = scanner.scan_blocking(&config, &CancellationToken::new()).unwrap();
//!
//! println!("Total size: {} bytes", tree.size());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use dirscope_scan::{CancellationToken, ScanConfig, TreeScanner};
//!
//! # async fn run() {
//! let scanner = TreeScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("Scanned {} files", progress.files_scanned);
//!     }
//! });
//!
//! let tree = scanner
//!     .scan(ScanConfig::new("/path/to/scan"), CancellationToken::new())
//!     .await;
//! # }
//! ```

mod classify;
mod fs;
mod progress;
mod scanner;

pub use classify::is_recoverable;
pub use fs::{EntryMetadata, FileSystem, StdFileSystem};
pub use progress::{PROGRESS_INTERVAL, ScanProgress};
pub use scanner::{Scanner, TreeScanner};

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use dirscope_core::{FileNode, ScanConfig, ScanError};

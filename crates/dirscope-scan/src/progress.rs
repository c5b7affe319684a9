//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

/// Number of entries between progress snapshots.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Progress information during a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    /// Number of files measured so far.
    pub files_scanned: u64,
    /// Number of directories listed so far.
    pub dirs_scanned: u64,
    /// Total bytes measured so far.
    pub bytes_scanned: u64,
    /// Entries dropped because they could not be read.
    pub skipped: u64,
    /// Path being scanned when the snapshot was taken.
    pub current_path: PathBuf,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            skipped: 0,
            current_path: PathBuf::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items scanned (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_scanned + self.dirs_scanned
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-scan progress counters. Each scan call owns one.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    tx: broadcast::Sender<ScanProgress>,
    start_time: Instant,
    files_scanned: u64,
    dirs_scanned: u64,
    bytes_scanned: u64,
    skipped: u64,
    since_last_report: u64,
}

impl ProgressTracker {
    pub fn new(tx: broadcast::Sender<ScanProgress>) -> Self {
        Self {
            tx,
            start_time: Instant::now(),
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            skipped: 0,
            since_last_report: 0,
        }
    }

    pub fn record_file(&mut self, path: &Path, size: u64) {
        self.files_scanned += 1;
        self.bytes_scanned += size;
        self.tick(path);
    }

    pub fn record_dir(&mut self, path: &Path) {
        self.dirs_scanned += 1;
        self.tick(path);
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Send a final snapshot regardless of the interval.
    pub fn finish(&self, path: &Path) {
        self.report(path);
    }

    fn tick(&mut self, path: &Path) {
        self.since_last_report += 1;
        if self.since_last_report >= PROGRESS_INTERVAL {
            self.since_last_report = 0;
            self.report(path);
        }
    }

    fn report(&self, path: &Path) {
        // No receivers is fine.
        let _ = self.tx.send(self.snapshot(path));
    }

    pub fn snapshot(&self, path: &Path) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned,
            dirs_scanned: self.dirs_scanned,
            bytes_scanned: self.bytes_scanned,
            skipped: self.skipped,
            current_path: path.to_path_buf(),
            elapsed: self.start_time.elapsed(),
        }
    }
}

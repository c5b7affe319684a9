//! Filesystem access used by the scanner.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Metadata the scanner needs about one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryMetadata {
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Logical (apparent) size, if the platform reports one.
    pub len: Option<u64>,
    /// Bytes allocated on disk, if the platform reports them.
    pub allocated: Option<u64>,
}

impl EntryMetadata {
    /// Size of a leaf entry: logical size, else allocated size, else 0.
    pub fn size(&self) -> u64 {
        self.len.or(self.allocated).unwrap_or(0)
    }
}

impl From<&std::fs::Metadata> for EntryMetadata {
    fn from(metadata: &std::fs::Metadata) -> Self {
        let file_type = metadata.file_type();
        Self {
            is_dir: file_type.is_dir(),
            is_symlink: file_type.is_symlink(),
            len: Some(metadata.len()),
            allocated: allocated_bytes(metadata),
        }
    }
}

/// Read access to a filesystem.
///
/// The scanner only ever goes through this trait, so tests can substitute an
/// in-memory tree with injected failures.
pub trait FileSystem: Send + Sync {
    /// Whether `path` resolves to an entry. A symlink at `path` is followed,
    /// so a dangling link does not exist.
    fn exists(&self, path: &Path) -> bool;

    /// Metadata for `path`, following a symlink at `path` itself.
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata>;

    /// Metadata for `path` without following a symlink at `path`.
    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMetadata>;

    /// Full paths of the entries of a directory, in no particular order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        std::fs::metadata(path).map(|m| EntryMetadata::from(&m))
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        std::fs::symlink_metadata(path).map(|m| EntryMetadata::from(&m))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }
}

/// Allocated size from the number of 512-byte blocks.
#[cfg(unix)]
fn allocated_bytes(metadata: &std::fs::Metadata) -> Option<u64> {
    Some(metadata.blocks().saturating_mul(512))
}

#[cfg(not(unix))]
fn allocated_bytes(_metadata: &std::fs::Metadata) -> Option<u64> {
    None
}

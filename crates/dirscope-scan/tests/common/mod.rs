//! In-memory filesystem with injectable failures.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use dirscope_scan::{CancellationToken, EntryMetadata, FileSystem};

#[derive(Debug, Clone)]
enum Entry {
    File(u64),
    Dir,
    Symlink,
    /// Metadata reads fail with this error kind.
    BadMetadata(io::ErrorKind),
    /// A directory whose listing fails with this error kind.
    BadListing(io::ErrorKind),
}

/// Tree of entries keyed by absolute path.
#[derive(Debug, Default)]
pub struct MemFs {
    entries: BTreeMap<PathBuf, Entry>,
    /// Cancel this token once `n` listings have completed.
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
    listings: AtomicUsize,
}

impl MemFs {
    pub fn new() -> Self {
        let mut fs = Self::default();
        fs.entries.insert(PathBuf::from("/"), Entry::Dir);
        fs
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::Dir);
        self
    }

    pub fn file(mut self, path: &str, size: u64) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::File(size));
        self
    }

    pub fn symlink(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::Symlink);
        self
    }

    pub fn bad_metadata(mut self, path: &str, kind: io::ErrorKind) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::BadMetadata(kind));
        self
    }

    pub fn bad_listing(mut self, path: &str, kind: io::ErrorKind) -> Self {
        self.entries.insert(PathBuf::from(path), Entry::BadListing(kind));
        self
    }

    pub fn cancel_after_listings(self, n: usize, token: CancellationToken) -> Self {
        *self.cancel_after.lock().unwrap() = Some((n, token));
        self
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    fn lookup(&self, path: &Path) -> io::Result<&Entry> {
        self.entries
            .get(path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

impl FileSystem for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        self.symlink_metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        match self.lookup(path)? {
            Entry::File(size) => Ok(EntryMetadata {
                len: Some(*size),
                ..Default::default()
            }),
            Entry::Dir | Entry::BadListing(_) => Ok(EntryMetadata {
                is_dir: true,
                len: Some(4096),
                ..Default::default()
            }),
            Entry::Symlink => Ok(EntryMetadata {
                is_symlink: true,
                len: Some(64),
                ..Default::default()
            }),
            Entry::BadMetadata(kind) => Err(io::Error::from(*kind)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        match self.lookup(path)? {
            Entry::Dir => {}
            Entry::BadListing(kind) => return Err(io::Error::from(*kind)),
            _ => return Err(io::Error::from(io::ErrorKind::NotADirectory)),
        }

        // Reverse order, to prove the scanner sorts.
        let children: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|p| p.parent() == Some(path))
            .rev()
            .cloned()
            .collect();

        let done = self.listings.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((n, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if done >= *n {
                token.cancel();
            }
        }

        Ok(children)
    }
}

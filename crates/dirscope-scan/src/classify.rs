//! Sorting I/O failures into "skip this entry" and "abort the scan".

use std::io;

use dirscope_core::ScanError;

/// Whether an I/O error only affects the entry it happened on.
///
/// Permission problems, entries that vanished or changed type mid-scan, bad
/// handles and low-level I/O faults are scoped to one child. Anything else
/// is treated as a failure of the whole scan.
pub fn is_recoverable(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    ) {
        return true;
    }

    err.raw_os_error().is_some_and(is_recoverable_os_code)
}

#[cfg(unix)]
fn is_recoverable_os_code(code: i32) -> bool {
    matches!(
        code,
        libc::EPERM | libc::EACCES | libc::ENOENT | libc::ENOTDIR | libc::EBADF | libc::EIO
    )
}

#[cfg(not(unix))]
fn is_recoverable_os_code(_code: i32) -> bool {
    false
}

/// Whether a failed child build may be dropped instead of aborting.
pub(crate) fn is_skippable(err: &ScanError) -> bool {
    match err {
        ScanError::Unreadable { source, .. } => is_recoverable(source),
        ScanError::NotFound { .. } => true,
        ScanError::Cancelled => false,
    }
}

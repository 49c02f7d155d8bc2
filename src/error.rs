//! Error types for the disk usage analysis engine.
//!
//! This module defines [`ScanError`], the error type returned by walker, mutator, and
//! device-enumeration operations. Leaf-level read failures (permission denied on a single
//! child, a child that vanishes mid-scan) are not represented here at all: they are
//! recorded on the affected entry's `error_flag` and the scan continues, per the
//! propagation policy described in the crate's top-level docs.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for disk usage analysis operations.
///
/// # Variants
///
/// - `EntryUnreadable` — the requested scan root (or a mount point passed to `analyze`)
///   could not be stat'd at all. Fatal to the current operation.
/// - `DeleteFailed` — the underlying filesystem could not remove an object. Carries the
///   offending path and the underlying I/O error.
/// - `Refused` — the mutator was asked to delete the scan root or one of its ancestors.
/// - `NotFound` — a lookup by name (`index_of`, `remove_by_name`) found no matching child.
/// - `Cancelled` — a scan was aborted via its cancellation flag before completing.
/// - `EnumFailed` — the device enumeration source is unavailable.
/// - `Io` — a generic I/O error that doesn't fit the above, converted via `?`.
#[derive(Debug)]
pub enum ScanError {
    /// The scan root or a requested mount point does not exist or cannot be stat'd.
    EntryUnreadable(PathBuf),

    /// The underlying filesystem object could not be removed.
    DeleteFailed(PathBuf, io::Error),

    /// Attempted to delete the scan root or one of its ancestors.
    Refused,

    /// A named lookup among a directory's children found no match.
    NotFound(PathBuf),

    /// The scan was cancelled before it completed.
    Cancelled,

    /// The device enumeration source is unavailable.
    EnumFailed(String),

    /// Generic I/O error.
    Io(io::Error),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::EntryUnreadable(path) => {
                write!(f, "path not found: {}", path.display())
            }
            ScanError::DeleteFailed(path, cause) => {
                write!(f, "could not delete {}: {cause}", path.display())
            }
            ScanError::Refused => {
                write!(f, "refused: cannot delete the scan root or one of its ancestors")
            }
            ScanError::NotFound(path) => write!(f, "not found: {}", path.display()),
            ScanError::Cancelled => write!(f, "scan cancelled"),
            ScanError::EnumFailed(msg) => write!(f, "device enumeration failed: {msg}"),
            ScanError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::DeleteFailed(_, cause) => Some(cause),
            ScanError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        ScanError::Io(err)
    }
}

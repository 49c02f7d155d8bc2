//! Abstraction over filesystem metadata queries.
//!
//! The walker consumes metadata only through the [`Stat`] trait so that its traversal and
//! aggregation logic can be exercised in tests without touching the real filesystem. On
//! Unix, [`RealStat`] is backed by `lstat` via [`std::os::unix::fs::MetadataExt`]. On other
//! platforms, device id, inode, and block counts are unavailable, so usage falls back to
//! apparent size (see [`RealStat`]'s `cfg(not(unix))` impl).

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Allocation unit (bytes) charged to directories and used to round file usage.
pub const ALLOC_UNIT: u64 = 4096;

/// The kind of filesystem object an entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

/// Metadata about a single filesystem object, as seen by [`Stat::lstat`].
#[derive(Debug, Clone, Copy)]
pub struct StatInfo {
    pub kind: EntryKind,
    /// Logical byte length.
    pub apparent_size: u64,
    /// On-disk footprint rounded up to the allocation unit; directories get exactly one
    /// allocation unit here, files get `blocks * 512` rounded up by [`Stat`] impls.
    pub usage: u64,
    pub dev_id: u64,
    pub inode: u64,
    pub nlink: u64,
    pub mtime: SystemTime,
}

/// Capability consumed by the walker to query filesystem metadata without following
/// symlinks. Production code uses [`RealStat`]; tests may supply an in-memory substitute.
pub trait Stat: Send + Sync {
    /// `lstat`s `path`, returning its metadata without following a terminal symlink.
    fn lstat(&self, path: &Path) -> io::Result<StatInfo>;

    /// Reads the names of a directory's immediate children, in arbitrary order.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<std::ffi::OsString>>;
}

/// Default [`Stat`] implementation backed by real `lstat`/`readdir` syscalls.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealStat;

impl Stat for RealStat {
    fn lstat(&self, path: &Path) -> io::Result<StatInfo> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(stat_info_from_metadata(&meta))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<std::ffi::OsString>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }
}

#[cfg(unix)]
fn stat_info_from_metadata(meta: &std::fs::Metadata) -> StatInfo {
    use std::os::unix::fs::MetadataExt;

    let file_type = meta.file_type();
    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    let apparent_size = meta.len();
    let usage = if kind == EntryKind::Directory {
        ALLOC_UNIT
    } else {
        // `blocks()` is in 512-byte units regardless of the filesystem's own block size.
        round_up(meta.blocks() * 512, ALLOC_UNIT)
    };

    StatInfo {
        kind,
        apparent_size,
        usage,
        dev_id: meta.dev(),
        inode: meta.ino(),
        nlink: meta.nlink(),
        mtime: meta
            .modified()
            .unwrap_or(std::time::UNIX_EPOCH),
    }
}

#[cfg(not(unix))]
fn stat_info_from_metadata(meta: &std::fs::Metadata) -> StatInfo {
    let file_type = meta.file_type();
    let kind = if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    // Block counts and device/inode numbers aren't portably available; fall back to
    // apparent size for usage, per the platform-fallback rule in the external interface.
    let apparent_size = meta.len();
    let usage = if kind == EntryKind::Directory {
        ALLOC_UNIT
    } else {
        apparent_size
    };

    StatInfo {
        kind,
        apparent_size,
        usage,
        dev_id: 0,
        inode: 0,
        nlink: 1,
        mtime: meta.modified().unwrap_or(std::time::UNIX_EPOCH),
    }
}

fn round_up(value: u64, unit: u64) -> u64 {
    if value == 0 {
        0
    } else {
        value.div_ceil(unit) * unit
    }
}

/// In-memory [`Stat`] substitute for unit tests that should not touch the real filesystem.
#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct InMemoryStat {
        entries: Mutex<HashMap<std::path::PathBuf, (StatInfo, Vec<std::ffi::OsString>)>>,
    }

    impl InMemoryStat {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_dir(&self, path: impl Into<std::path::PathBuf>, children: Vec<&str>) {
            let info = StatInfo {
                kind: EntryKind::Directory,
                apparent_size: 0,
                usage: ALLOC_UNIT,
                dev_id: 1,
                inode: 0,
                nlink: 1,
                mtime: std::time::UNIX_EPOCH,
            };
            let names = children.into_iter().map(std::ffi::OsString::from).collect();
            self.entries.lock().unwrap().insert(path.into(), (info, names));
        }

        pub fn add_file(&self, path: impl Into<std::path::PathBuf>, size: u64, inode: u64) {
            let info = StatInfo {
                kind: EntryKind::File,
                apparent_size: size,
                usage: round_up(size, ALLOC_UNIT),
                dev_id: 1,
                inode,
                nlink: 1,
                mtime: std::time::UNIX_EPOCH,
            };
            self.entries
                .lock()
                .unwrap()
                .insert(path.into(), (info, Vec::new()));
        }
    }

    impl Stat for InMemoryStat {
        fn lstat(&self, path: &Path) -> io::Result<StatInfo> {
            self.entries
                .lock()
                .unwrap()
                .get(path)
                .map(|(info, _)| *info)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such entry"))
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<std::ffi::OsString>> {
            self.entries
                .lock()
                .unwrap()
                .get(path)
                .map(|(_, children)| children.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such entry"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn real_stat_reports_directory_kind_and_alloc_unit_usage() {
        let tmp = TempDir::new().unwrap();
        let info = RealStat.lstat(tmp.path()).unwrap();
        assert_eq!(info.kind, EntryKind::Directory);
        assert_eq!(info.usage, ALLOC_UNIT);
    }

    #[test]
    fn real_stat_reports_file_apparent_size() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        std::fs::write(&file, b"hello").unwrap();
        let info = RealStat.lstat(&file).unwrap();
        assert_eq!(info.kind, EntryKind::File);
        assert_eq!(info.apparent_size, 5);
    }

    #[test]
    fn read_dir_lists_children() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a"), b"x").unwrap();
        std::fs::write(tmp.path().join("b"), b"y").unwrap();
        let names = RealStat.read_dir(tmp.path()).unwrap();
        assert_eq!(names.len(), 2);
    }
}

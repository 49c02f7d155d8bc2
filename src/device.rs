//! Device enumeration, consumed by the CLI's `--show-disks` flag.
//!
//! Narrow contract: list mounted filesystems and their free/total byte counts. Backed by
//! `/proc/mounts` plus `statvfs` on Linux, following the same trait-for-production /
//! mock-for-test split already used for filesystem metadata in [`crate::stat`].

use crate::error::ScanError;

/// One mounted filesystem, as reported by [`DeviceEnumerator::enumerate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Capability consumed by `--show-disks`. Production code uses [`ProcMountsEnumerator`];
/// tests may supply an in-memory list.
pub trait DeviceEnumerator {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, ScanError>;
}

#[cfg(unix)]
pub use unix_impl::ProcMountsEnumerator;

#[cfg(unix)]
mod unix_impl {
    use super::{DeviceEnumerator, DeviceInfo, ScanError};
    use std::ffi::CString;
    use std::fs;
    use std::mem::MaybeUninit;

    /// Reads `/proc/mounts` for mount points and filesystem types, then calls `statvfs`
    /// on each to get free/total byte counts.
    #[derive(Debug, Default)]
    pub struct ProcMountsEnumerator;

    impl DeviceEnumerator for ProcMountsEnumerator {
        fn enumerate(&self) -> Result<Vec<DeviceInfo>, ScanError> {
            let contents = fs::read_to_string("/proc/mounts")
                .map_err(|e| ScanError::EnumFailed(e.to_string()))?;

            let mut devices = Vec::new();
            for line in contents.lines() {
                let mut fields = line.split_whitespace();
                let (Some(_device), Some(mount_point), Some(fs_type)) =
                    (fields.next(), fields.next(), fields.next())
                else {
                    continue;
                };

                if let Some((total_bytes, free_bytes)) = statvfs_bytes(mount_point) {
                    devices.push(DeviceInfo {
                        mount_point: mount_point.to_string(),
                        fs_type: fs_type.to_string(),
                        total_bytes,
                        free_bytes,
                    });
                }
            }
            Ok(devices)
        }
    }

    fn statvfs_bytes(mount_point: &str) -> Option<(u64, u64)> {
        let c_path = CString::new(mount_point).ok()?;
        let mut stat = MaybeUninit::<libc::statvfs>::uninit();
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if rc != 0 {
            return None;
        }
        let stat = unsafe { stat.assume_init() };
        let block_size = stat.f_frsize as u64;
        Some((stat.f_blocks as u64 * block_size, stat.f_bavail as u64 * block_size))
    }
}

/// Stub used on non-Unix targets, where neither `/proc/mounts` nor `statvfs` exist. This
/// keeps the crate compiling elsewhere; `--show-disks` simply reports unavailability.
#[cfg(not(unix))]
#[derive(Debug, Default)]
pub struct ProcMountsEnumerator;

#[cfg(not(unix))]
impl DeviceEnumerator for ProcMountsEnumerator {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, ScanError> {
        Err(ScanError::EnumFailed(
            "device enumeration is not supported on this platform".to_string(),
        ))
    }
}

/// In-memory [`DeviceEnumerator`] for tests.
#[derive(Debug, Default)]
pub struct InMemoryDeviceEnumerator {
    devices: Vec<DeviceInfo>,
}

impl InMemoryDeviceEnumerator {
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        InMemoryDeviceEnumerator { devices }
    }
}

impl DeviceEnumerator for InMemoryDeviceEnumerator {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, ScanError> {
        Ok(self.devices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_enumerator_returns_configured_devices() {
        let enumerator = InMemoryDeviceEnumerator::new(vec![DeviceInfo {
            mount_point: "/".to_string(),
            fs_type: "ext4".to_string(),
            total_bytes: 1_000_000,
            free_bytes: 400_000,
        }]);
        let devices = enumerator.enumerate().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].mount_point, "/");
    }

    #[test]
    fn in_memory_enumerator_empty_by_default() {
        let enumerator = InMemoryDeviceEnumerator::default();
        assert!(enumerator.enumerate().unwrap().is_empty());
    }
}

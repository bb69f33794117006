/// Mount table snapshot via `getfsstat(2)`.
///
/// diskutil omits mount information for some devices (notably firmlinked
/// system volumes); the kernel mount table fills the gap. This is a
/// best-effort secondary source: on any failure the table is simply empty.

/// One mounted filesystem.
#[derive(Debug, Clone)]
pub struct MountEntry {
    /// Device path (e.g., "/dev/disk1s1").
    pub device: String,
    /// Mount path (e.g., "/", "/Volumes/USB").
    pub mount_point: String,
    /// Filesystem type name (e.g., "apfs").
    pub fs_type: String,
    /// Whether the filesystem is mounted read-only.
    pub read_only: bool,
}

/// Find the mount entry for a device identifier, if it is mounted.
#[must_use]
pub fn mount_for<'a>(mounts: &'a [MountEntry], id: &str) -> Option<&'a MountEntry> {
    let device = format!("/dev/{id}");
    mounts.iter().find(|m| m.device == device)
}

/// Read the current mount table. Empty on failure or off-macOS.
#[cfg(target_os = "macos")]
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn read_mounts() -> Vec<MountEntry> {
    use libc::{MNT_NOWAIT, MNT_RDONLY, getfsstat, statfs};
    use std::ffi::CStr;
    use std::mem::size_of;
    use std::ptr;

    let count = unsafe { getfsstat(ptr::null_mut(), 0, MNT_NOWAIT) };
    if count < 0 {
        return Vec::new();
    }
    let mut buf = vec![unsafe { std::mem::zeroed::<statfs>() }; count as usize];
    let len = i32::try_from(buf.len() * size_of::<statfs>()).unwrap_or(i32::MAX);
    let filled = unsafe { getfsstat(buf.as_mut_ptr(), len, MNT_NOWAIT) };
    if filled < 0 {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for entry in buf.into_iter().take(filled as usize) {
        let device = unsafe { CStr::from_ptr(entry.f_mntfromname.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        let mount_point = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        let fs_type = unsafe { CStr::from_ptr(entry.f_fstypename.as_ptr()) }
            .to_string_lossy()
            .into_owned();
        if !device.starts_with("/dev/") {
            continue;
        }
        entries.push(MountEntry {
            device,
            mount_point,
            fs_type,
            read_only: entry.f_flags & (MNT_RDONLY as u32) != 0,
        });
    }
    entries
}

/// Read the current mount table. Empty on failure or off-macOS.
#[cfg(not(target_os = "macos"))]
#[must_use]
pub fn read_mounts() -> Vec<MountEntry> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_for_matches_dev_path() {
        let mounts = vec![MountEntry {
            device: "/dev/disk1s1".to_owned(),
            mount_point: "/".to_owned(),
            fs_type: "apfs".to_owned(),
            read_only: true,
        }];
        let hit = mount_for(&mounts, "disk1s1").unwrap();
        assert_eq!(hit.mount_point, "/");
        assert!(mount_for(&mounts, "disk1s2").is_none());
    }
}

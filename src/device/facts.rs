/// Raw device facts as reported by the operating system.
///
/// A `DeviceFact` is one unprocessed query result. Facts are immutable once
/// produced; the topology layer turns them into linked nodes.

/// Device class hint from the OS report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// A physical whole disk.
    Disk,
    /// A partition (slice) of a disk.
    Partition,
    /// A logical volume (e.g., an APFS volume inside a container).
    Volume,
    /// A synthesized device (APFS container, disk image) backed by another
    /// device. Not a root when it declares its backing parent.
    Virtual,
}

impl DeviceKind {
    /// The TYPE column value, matching the Linux reference tool's register.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disk => "disk",
            Self::Partition => "part",
            Self::Volume => "volume",
            Self::Virtual => "virtual",
        }
    }
}

/// One raw device record. Optional metadata that could not be retrieved is
/// `None`, never a placeholder string.
#[derive(Debug, Clone)]
pub struct DeviceFact {
    /// OS device identifier (e.g., "disk0", "disk0s1").
    pub id: String,
    /// Reported size in bytes, if known.
    pub size: Option<u64>,
    /// Device class hint.
    pub kind: DeviceKind,
    /// Identifier of the owning device, if any. Facts without a parent are
    /// whole disks at the top of their tree.
    pub parent: Option<String>,
    /// Mount path if mounted.
    pub mount_point: Option<String>,
    /// Filesystem type (e.g., "apfs", "msdos").
    pub fs_type: Option<String>,
    /// Volume label or media name.
    pub label: Option<String>,
    /// Volume or disk UUID.
    pub uuid: Option<String>,
    /// Bus/interconnect protocol (e.g., "nvme", "usb").
    pub protocol: Option<String>,
    /// Whether the device is read-only.
    pub read_only: bool,
    /// Whether the media is removable or ejectable.
    pub removable: bool,
}

#[cfg(test)]
impl DeviceFact {
    /// A fact with everything optional missing, for test fixtures.
    #[must_use]
    pub fn bare(id: &str, kind: DeviceKind) -> Self {
        Self {
            id: id.to_owned(),
            size: None,
            kind,
            parent: None,
            mount_point: None,
            fs_type: None,
            label: None,
            uuid: None,
            protocol: None,
            read_only: false,
            removable: false,
        }
    }
}

/// Device enumeration via `diskutil`.
///
/// Query strategy:
/// 1. One `diskutil list -plist` call yields the full disk/partition/volume
///    hierarchy in discovery order.
/// 2. Each whole-disk group is enriched in parallel (one scoped thread per
///    disk) with per-device `diskutil info -plist` calls for metadata the
///    listing omits: filesystem type, UUIDs, writability, bus protocol.
/// 3. Results are merged back in disk-enumeration order, so output is
///    deterministic regardless of thread completion order.
///
/// Every spawned command carries a bounded timeout. A single device whose
/// `info` call fails or times out keeps its listing-derived fields and blank
/// optionals; only failures of the listing call itself abort the query.
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::Deserialize;

use super::DeviceQuery;
use super::errors::QueryError;
use super::facts::{DeviceFact, DeviceKind};
use super::mounts::{self, MountEntry};

/// Upper bound for a single `diskutil` invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often a running child is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// The macOS device-query implementation.
#[derive(Debug, Clone)]
pub struct DiskutilQuery {
    timeout: Duration,
}

impl DiskutilQuery {
    /// Create a query with a custom per-command timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for DiskutilQuery {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl DeviceQuery for DiskutilQuery {
    fn list_device_facts(&self) -> Result<Vec<DeviceFact>, QueryError> {
        let listing: DiskutilList = run_plist(&["list", "-plist"], self.timeout)?;
        let mounts = mounts::read_mounts();
        Ok(assemble_facts(&listing, &mounts, self.timeout))
    }
}

// --- plist schema ---

#[derive(Debug, Deserialize)]
struct DiskutilList {
    #[serde(rename = "AllDisksAndPartitions", default)]
    disks: Vec<WholeDisk>,
}

#[derive(Debug, Deserialize)]
struct WholeDisk {
    #[serde(rename = "DeviceIdentifier")]
    device_identifier: String,
    #[serde(rename = "Size", default)]
    size: Option<u64>,
    #[serde(rename = "Partitions", default)]
    partitions: Vec<Slice>,
    #[serde(rename = "APFSVolumes", default)]
    apfs_volumes: Vec<Slice>,
    #[serde(rename = "APFSPhysicalStores", default)]
    physical_stores: Vec<PhysicalStore>,
}

#[derive(Debug, Deserialize)]
struct Slice {
    #[serde(rename = "DeviceIdentifier")]
    device_identifier: String,
    #[serde(rename = "Size", default)]
    size: Option<u64>,
    #[serde(rename = "VolumeName", default)]
    volume_name: Option<String>,
    #[serde(rename = "VolumeUUID", default)]
    volume_uuid: Option<String>,
    #[serde(rename = "DiskUUID", default)]
    disk_uuid: Option<String>,
    #[serde(rename = "MountPoint", default)]
    mount_point: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhysicalStore {
    #[serde(rename = "DeviceIdentifier")]
    device_identifier: String,
}

/// Per-device detail from `diskutil info -plist`. Every field is optional:
/// older macOS releases omit keys freely.
#[derive(Debug, Default, Deserialize)]
struct DiskutilInfo {
    #[serde(rename = "MediaName", default)]
    media_name: Option<String>,
    #[serde(rename = "FilesystemType", default)]
    filesystem_type: Option<String>,
    #[serde(rename = "VolumeName", default)]
    volume_name: Option<String>,
    #[serde(rename = "VolumeUUID", default)]
    volume_uuid: Option<String>,
    #[serde(rename = "DiskUUID", default)]
    disk_uuid: Option<String>,
    #[serde(rename = "MountPoint", default)]
    mount_point: Option<String>,
    #[serde(rename = "WritableMedia", default)]
    writable_media: Option<bool>,
    #[serde(rename = "WritableVolume", default)]
    writable_volume: Option<bool>,
    #[serde(rename = "RemovableMedia", default)]
    removable_media: Option<bool>,
    #[serde(rename = "Ejectable", default)]
    ejectable: Option<bool>,
    #[serde(rename = "BusProtocol", default)]
    bus_protocol: Option<String>,
    #[serde(rename = "VirtualOrPhysical", default)]
    virtual_or_physical: Option<String>,
}

// --- fact assembly ---

/// Turn the listing into facts: each whole disk, then its partitions, then
/// its volumes. Disk groups are walked in parallel and merged in disk order.
fn assemble_facts(
    listing: &DiskutilList,
    mounts: &[MountEntry],
    timeout: Duration,
) -> Vec<DeviceFact> {
    let mut groups: Vec<Option<Vec<DeviceFact>>> = vec![None; listing.disks.len()];

    std::thread::scope(|s| {
        let handles: Vec<_> = listing
            .disks
            .iter()
            .enumerate()
            .map(|(i, disk)| s.spawn(move || (i, facts_for_disk(disk, mounts, timeout))))
            .collect();

        for handle in handles {
            if let Ok((i, facts)) = handle.join() {
                groups[i] = Some(facts);
            }
        }
    });

    groups.into_iter().flatten().flatten().collect()
}

fn facts_for_disk(disk: &WholeDisk, mounts: &[MountEntry], timeout: Duration) -> Vec<DeviceFact> {
    let mut facts = Vec::with_capacity(1 + disk.partitions.len() + disk.apfs_volumes.len());
    facts.push(disk_fact(disk, timeout));
    for slice in &disk.partitions {
        facts.push(slice_fact(
            slice,
            &disk.device_identifier,
            DeviceKind::Partition,
            mounts,
            timeout,
        ));
    }
    for volume in &disk.apfs_volumes {
        facts.push(slice_fact(
            volume,
            &disk.device_identifier,
            DeviceKind::Volume,
            mounts,
            timeout,
        ));
    }
    facts
}

fn disk_fact(disk: &WholeDisk, timeout: Duration) -> DeviceFact {
    let info = fetch_info(&disk.device_identifier, timeout).unwrap_or_default();
    // A synthesized disk (APFS container, disk image) backed by a physical
    // store is a child of that store, not a root.
    let parent = disk
        .physical_stores
        .first()
        .map(|s| s.device_identifier.clone());
    let is_virtual =
        parent.is_some() || info.virtual_or_physical.as_deref() == Some("Virtual");

    DeviceFact {
        id: disk.device_identifier.clone(),
        size: disk.size,
        kind: if is_virtual {
            DeviceKind::Virtual
        } else {
            DeviceKind::Disk
        },
        parent,
        mount_point: None,
        fs_type: None,
        label: non_empty(info.media_name),
        uuid: non_empty(info.disk_uuid),
        protocol: non_empty(info.bus_protocol).map(|p| p.to_ascii_lowercase()),
        read_only: !info.writable_media.unwrap_or(true),
        removable: info.removable_media.or(info.ejectable).unwrap_or(false),
    }
}

fn slice_fact(
    slice: &Slice,
    parent: &str,
    kind: DeviceKind,
    mounts: &[MountEntry],
    timeout: Duration,
) -> DeviceFact {
    let info = fetch_info(&slice.device_identifier, timeout).unwrap_or_default();
    let mount = mounts::mount_for(mounts, &slice.device_identifier);

    let mount_point = non_empty(slice.mount_point.clone())
        .or(non_empty(info.mount_point))
        .or_else(|| mount.map(|m| m.mount_point.clone()));
    let fs_type = non_empty(info.filesystem_type)
        .or_else(|| mount.map(|m| m.fs_type.clone()));
    let read_only = info
        .writable_volume
        .or(info.writable_media)
        .map(|writable| !writable)
        .or_else(|| mount.map(|m| m.read_only))
        .unwrap_or(false);

    DeviceFact {
        id: slice.device_identifier.clone(),
        size: slice.size,
        kind,
        parent: Some(parent.to_owned()),
        mount_point,
        fs_type,
        label: non_empty(slice.volume_name.clone()).or(non_empty(info.volume_name)),
        uuid: non_empty(slice.volume_uuid.clone())
            .or(non_empty(slice.disk_uuid.clone()))
            .or(non_empty(info.volume_uuid))
            .or(non_empty(info.disk_uuid)),
        protocol: non_empty(info.bus_protocol).map(|p| p.to_ascii_lowercase()),
        read_only,
        removable: info.removable_media.or(info.ejectable).unwrap_or(false),
    }
}

/// Extended metadata for one device. Any failure degrades the device to its
/// listing-derived fields rather than failing the run.
fn fetch_info(id: &str, timeout: Duration) -> Option<DiskutilInfo> {
    run_plist(&["info", "-plist", id], timeout).ok()
}

/// diskutil reports "missing" as an empty string in several keys.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// --- command plumbing ---

fn run_plist<T>(args: &[&str], timeout: Duration) -> Result<T, QueryError>
where
    T: for<'de> Deserialize<'de>,
{
    let command = format!("diskutil {}", args.join(" "));
    let stdout = run_with_timeout("diskutil", args, timeout)?;
    plist::from_bytes(&stdout).map_err(|source| QueryError::Parse { command, source })
}

/// Run a command to completion with a deadline, returning its stdout.
fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<Vec<u8>, QueryError> {
    let command = format!("{program} {}", args.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => QueryError::ToolUnavailable,
            std::io::ErrorKind::PermissionDenied => QueryError::PermissionDenied {
                command: command.clone(),
            },
            _ => QueryError::Io {
                command: command.clone(),
                source,
            },
        })?;

    // Drain both pipes on helper threads so a chatty child can't fill the
    // pipe buffer and stall ahead of the deadline check.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();
    let stdout_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(pipe) = stdout_pipe.as_mut() {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });
    let stderr_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(pipe) = stderr_pipe.as_mut() {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        let polled = child.try_wait().map_err(|source| QueryError::Io {
            command: command.clone(),
            source,
        })?;
        match polled {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(QueryError::Timeout {
                    command,
                    seconds: timeout.as_secs(),
                });
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    if !status.success() {
        return Err(QueryError::CommandFailed {
            command,
            status: status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
        });
    }
    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A trimmed `diskutil list -plist` snapshot: one physical disk with two
    /// partitions, one synthesized APFS disk backed by the second partition,
    /// carrying one volume.
    const LIST_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>AllDisksAndPartitions</key>
    <array>
        <dict>
            <key>DeviceIdentifier</key><string>disk90</string>
            <key>Size</key><integer>500000000000</integer>
            <key>Partitions</key>
            <array>
                <dict>
                    <key>DeviceIdentifier</key><string>disk90s1</string>
                    <key>Size</key><integer>314572800</integer>
                    <key>VolumeName</key><string>EFI</string>
                    <key>VolumeUUID</key><string>11111111-0000-0000-0000-000000000000</string>
                </dict>
                <dict>
                    <key>DeviceIdentifier</key><string>disk90s2</string>
                    <key>Size</key><integer>499685103616</integer>
                </dict>
            </array>
        </dict>
        <dict>
            <key>DeviceIdentifier</key><string>disk91</string>
            <key>Size</key><integer>499685103616</integer>
            <key>APFSPhysicalStores</key>
            <array>
                <dict>
                    <key>DeviceIdentifier</key><string>disk90s2</string>
                </dict>
            </array>
            <key>APFSVolumes</key>
            <array>
                <dict>
                    <key>DeviceIdentifier</key><string>disk91s1</string>
                    <key>Size</key><integer>499685103616</integer>
                    <key>VolumeName</key><string>Macintosh HD</string>
                    <key>MountPoint</key><string>/</string>
                </dict>
            </array>
        </dict>
    </array>
</dict>
</plist>"#;

    const INFO_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>DeviceIdentifier</key><string>disk91s1</string>
    <key>FilesystemType</key><string>apfs</string>
    <key>VolumeName</key><string>Macintosh HD</string>
    <key>VolumeUUID</key><string>22222222-0000-0000-0000-000000000000</string>
    <key>MountPoint</key><string>/</string>
    <key>WritableVolume</key><false/>
    <key>Ejectable</key><false/>
    <key>BusProtocol</key><string>PCI-Express</string>
    <key>VirtualOrPhysical</key><string>Virtual</string>
</dict>
</plist>"#;

    fn parse_list() -> DiskutilList {
        plist::from_bytes(LIST_FIXTURE.as_bytes()).unwrap()
    }

    #[test]
    fn test_list_fixture_parses() {
        let listing = parse_list();
        assert_eq!(listing.disks.len(), 2);
        assert_eq!(listing.disks[0].device_identifier, "disk90");
        assert_eq!(listing.disks[0].partitions.len(), 2);
        assert_eq!(listing.disks[1].apfs_volumes.len(), 1);
        assert_eq!(
            listing.disks[1].physical_stores[0].device_identifier,
            "disk90s2"
        );
    }

    #[test]
    fn test_info_fixture_parses() {
        let info: DiskutilInfo = plist::from_bytes(INFO_FIXTURE.as_bytes()).unwrap();
        assert_eq!(info.filesystem_type.as_deref(), Some("apfs"));
        assert_eq!(info.writable_volume, Some(false));
        assert_eq!(info.virtual_or_physical.as_deref(), Some("Virtual"));
    }

    // The fixture identifiers do not exist on any host, so every `info`
    // enrichment degrades and facts keep their listing-derived fields. That
    // is exactly the partial-metadata path the assembly must survive.
    #[test]
    fn test_assemble_preserves_discovery_order() {
        let listing = parse_list();
        let facts = assemble_facts(&listing, &[], Duration::from_secs(1));
        let ids: Vec<&str> = facts.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            ["disk90", "disk90s1", "disk90s2", "disk91", "disk91s1"]
        );
    }

    #[test]
    fn test_assemble_kinds_and_parents() {
        let listing = parse_list();
        let facts = assemble_facts(&listing, &[], Duration::from_secs(1));

        assert_eq!(facts[0].kind, DeviceKind::Disk);
        assert_eq!(facts[0].parent, None);

        assert_eq!(facts[1].kind, DeviceKind::Partition);
        assert_eq!(facts[1].parent.as_deref(), Some("disk90"));
        assert_eq!(facts[1].label.as_deref(), Some("EFI"));
        assert_eq!(
            facts[1].uuid.as_deref(),
            Some("11111111-0000-0000-0000-000000000000")
        );

        // Synthesized disk: virtual, child of its physical store.
        assert_eq!(facts[3].kind, DeviceKind::Virtual);
        assert_eq!(facts[3].parent.as_deref(), Some("disk90s2"));

        assert_eq!(facts[4].kind, DeviceKind::Volume);
        assert_eq!(facts[4].parent.as_deref(), Some("disk91"));
        assert_eq!(facts[4].mount_point.as_deref(), Some("/"));
    }

    #[test]
    fn test_mount_table_fallback_fills_missing_fields() {
        let listing = parse_list();
        let mounts = vec![MountEntry {
            device: "/dev/disk91s1".to_owned(),
            mount_point: "/".to_owned(),
            fs_type: "apfs".to_owned(),
            read_only: true,
        }];
        let facts = assemble_facts(&listing, &mounts, Duration::from_secs(1));
        let volume = &facts[4];
        assert_eq!(volume.fs_type.as_deref(), Some("apfs"));
        assert!(volume.read_only);
    }

    #[test]
    fn test_empty_strings_are_missing() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("apfs".to_owned())).as_deref(), Some("apfs"));
        assert_eq!(non_empty(None), None);
    }
}

/// Platform device-query layer.
pub mod diskutil;
pub mod errors;
pub mod facts;
pub mod mounts;

pub use diskutil::DiskutilQuery;
pub use errors::QueryError;
pub use facts::{DeviceFact, DeviceKind};

/// Capability interface for OS device enumeration. One implementation per
/// platform; everything downstream of it is platform-agnostic.
pub trait DeviceQuery {
    /// Enumerate all block devices as raw facts: whole disks first in OS
    /// order, then each disk's partitions, then its logical volumes.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` when the OS interface is unavailable or denies
    /// access at the top level. A single device's failure to resolve
    /// extended metadata degrades that device to a partial fact instead of
    /// failing the listing.
    fn list_device_facts(&self) -> Result<Vec<DeviceFact>, QueryError>;
}

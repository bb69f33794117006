/// Errors from the topology layer.
use thiserror::Error;

/// Fatal inconsistencies in a fact snapshot. Not recoverable by retry within
/// the same invocation.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A fact references a parent identifier absent from the snapshot.
    #[error("device '{id}' references unknown parent '{parent}'")]
    OrphanParent {
        /// The device carrying the dangling reference.
        id: String,
        /// The missing parent identifier.
        parent: String,
    },

    /// A parent chain loops back on itself.
    #[error("cyclic parent chain at device '{id}'")]
    Cycle {
        /// A device on the cycle.
        id: String,
    },
}

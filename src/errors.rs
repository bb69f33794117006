/// Top-level run errors, one per failing pipeline stage.
use thiserror::Error;

use crate::device::QueryError;
use crate::render::RenderError;
use crate::topology::TopologyError;

/// Any terminal failure of one invocation, classified by the component that
/// raised it. Each variant's message names the offending device or column.
#[derive(Debug, Error)]
pub enum RunError {
    /// The OS device-enumeration interface failed at the top level.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The fact snapshot was internally inconsistent.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The render request named an unrecognized column or format.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl RunError {
    /// CLI exit code. Every pipeline failure exits 1; invalid usage exits 2
    /// via the argument parser before the pipeline starts.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Errors from the rendering layer.
use thiserror::Error;

/// Caller-correctable rendering failures, raised at the request boundary.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A requested column name is not in the recognized set.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A requested output format is not in the recognized set.
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),
}

/// Errors from the device-query layer.
use thiserror::Error;

/// Fatal failures of the OS device-enumeration interface.
///
/// A single device's failure to resolve extended metadata is not represented
/// here: the query layer degrades that device to a partial fact instead.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The enumeration tool is not present on this host.
    #[error("diskutil not found; macblk requires macOS")]
    ToolUnavailable,

    /// The OS denied access at the top level.
    #[error("permission denied running `{command}`")]
    PermissionDenied {
        /// The command that was refused.
        command: String,
    },

    /// The enumeration command ran but reported failure.
    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        /// The command that failed.
        command: String,
        /// Its exit status code.
        status: i32,
        /// Captured stderr, trimmed.
        stderr: String,
    },

    /// The enumeration command exceeded its bounded timeout.
    #[error("`{command}` did not finish within {seconds}s")]
    Timeout {
        /// The command that was killed.
        command: String,
        /// The timeout that was exceeded.
        seconds: u64,
    },

    /// The command's output was not a parseable property list.
    #[error("could not parse `{command}` output: {source}")]
    Parse {
        /// The command whose output was malformed.
        command: String,
        /// The underlying plist error.
        #[source]
        source: plist::Error,
    },

    /// Any other I/O failure spawning or reaping the command.
    #[error("I/O error running `{command}`: {source}")]
    Io {
        /// The command being run.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

use std::io;

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The status record of a process could not be opened or read.
    #[error("No status record for pid {pid}: {source}")]
    RecordNotFound {
        pid: u32,
        #[source]
        source: io::Error,
    },

    /// The status record was read but could not be decoded.
    #[error("Malformed status record for pid {pid}: {source}")]
    RecordMalformed {
        pid: u32,
        #[source]
        source: MalformedRecord,
    },

    /// `start` was given an empty command line.
    #[error("Command cannot be blank")]
    EmptyCommand,

    /// The executable could not be located or launched.
    #[error("Command `{command}` not found: {source}")]
    CommandNotFound {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child was launched but collecting its output failed.
    #[error("Failed to collect output of child pid {pid}: {source}")]
    ChildWait {
        pid: u32,
        #[source]
        source: io::Error,
    },

    /// No process with this pid exists.
    #[error("No process with pid {0} found")]
    TargetNotFound(u32),

    /// The OS refused to signal the process.
    #[error("Not permitted to signal pid {0}")]
    PermissionDenied(u32),

    /// Signalling failed for a reason other than a missing process or
    /// missing permission.
    #[error("Failed to signal pid {pid}: {source}")]
    SignalFailed {
        pid: u32,
        #[source]
        source: nix::Error,
    },

    /// The process table could not be enumerated.
    #[error("Failed to enumerate processes: {0}")]
    EnumerationFailed(#[from] procfs::ProcError),
}

/// Reason a status record could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecord {
    #[error("expected at least {expected} fields, found {found}")]
    TooShort { expected: usize, found: usize },

    #[error("field `{field}` at position {index} is not a valid integer: {token:?}")]
    InvalidField {
        field: &'static str,
        index: usize,
        token: String,
    },
}

mod record;
mod snapshot;

pub use record::MIN_FIELDS;
pub use snapshot::{FieldValue, ProcessStatusSnapshot};

use crate::Error;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Size of a memory page, the unit of [`ProcessStatusSnapshot::resident_set_size`].
pub fn page_size() -> u64 {
    procfs::page_size()
}

/// Reads `<root>/<pid>/stat` and decodes it into a [`ProcessStatusSnapshot`].
#[derive(Debug, Clone)]
pub struct StatusRecordReader {
    root: PathBuf,
}

impl Default for StatusRecordReader {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl StatusRecordReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string()).join("stat")
    }

    /// Read and decode the status record of `pid`. One read, no retries.
    pub fn read(&self, pid: u32) -> Result<ProcessStatusSnapshot, Error> {
        let path = self.record_path(pid);
        let text =
            fs::read_to_string(&path).map_err(|source| Error::RecordNotFound { pid, source })?;
        let snapshot = text
            .parse::<ProcessStatusSnapshot>()
            .map_err(|source| Error::RecordMalformed { pid, source })?;
        debug!(pid, path = %path.display(), "decoded status record");
        Ok(snapshot)
    }

    /// Read the status record of the calling process.
    pub fn read_self(&self) -> Result<ProcessStatusSnapshot, Error> {
        self.read(std::process::id())
    }
}

//! The live process table, accessed through [`ProcessTable`] so control logic
//! can run against a fake one.

use crate::Error;
use config::TerminateSignal;
use nix::{
    errno::Errno,
    sys::signal::kill,
    unistd::{Pid, Uid, User},
};
use procfs::process::Process;
use std::{collections::HashMap, path::PathBuf};
use tracing::trace;

pub use nix::sys::signal::Signal;

/// A visible process and its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    /// Owner name, `None` when the uid has no passwd entry.
    pub owner: Option<String>,
}

pub type ProcessIter<'a> = Box<dyn Iterator<Item = ProcessEntry> + 'a>;

pub trait ProcessTable: Send + Sync {
    /// Whether `pid` currently exists, whether or not it may be signalled.
    fn exists(&self, pid: u32) -> bool;

    fn signal(&self, pid: u32, signal: Signal) -> Result<(), Error>;

    /// Start a fresh enumeration of every visible process.
    fn processes(&self) -> Result<ProcessIter<'_>, Error>;
}

/// Map the configured termination signal onto the OS signal.
pub fn os_signal(kind: TerminateSignal) -> Signal {
    match kind {
        TerminateSignal::Term => Signal::SIGTERM,
        TerminateSignal::Kill => Signal::SIGKILL,
        TerminateSignal::Int => Signal::SIGINT,
        TerminateSignal::Hup => Signal::SIGHUP,
    }
}

/// [`ProcessTable`] backed by procfs and `kill(2)`.
///
/// Existence and enumeration read `root`, the same tree the status reader
/// uses. Signals go through `kill(2)` and so reach the pid as seen from the
/// caller's pid namespace; with a non-default root, `root` should be a proc
/// mount of that same namespace.
#[derive(Debug, Clone)]
pub struct LinuxProcessTable {
    root: PathBuf,
}

impl Default for LinuxProcessTable {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl LinuxProcessTable {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// `kill(2)` treats 0 and negative pids as process groups; never target those.
fn os_pid(pid: u32) -> Option<Pid> {
    i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 0)
        .map(Pid::from_raw)
}

fn owner_name(uid: u32) -> Option<String> {
    User::from_uid(Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|user| user.name)
}

impl ProcessTable for LinuxProcessTable {
    fn exists(&self, pid: u32) -> bool {
        if os_pid(pid).is_none() {
            return false;
        }
        // another user's process still has a readable directory
        Process::new_with_root(self.root.join(pid.to_string())).is_ok()
    }

    fn signal(&self, pid: u32, signal: Signal) -> Result<(), Error> {
        let os_pid = os_pid(pid).ok_or(Error::TargetNotFound(pid))?;
        kill(os_pid, signal).map_err(|err| match err {
            Errno::ESRCH => Error::TargetNotFound(pid),
            Errno::EPERM => Error::PermissionDenied(pid),
            source => Error::SignalFailed { pid, source },
        })
    }

    fn processes(&self) -> Result<ProcessIter<'_>, Error> {
        let all = procfs::process::all_processes_with_root(&self.root)?;
        let mut owners: HashMap<u32, Option<String>> = HashMap::new();

        Ok(Box::new(all.filter_map(move |process| {
            // processes may exit between listing and reading
            let process = process.ok()?;
            let (uid, stat) = match (process.uid(), process.stat()) {
                (Ok(uid), Ok(stat)) => (uid, stat),
                _ => {
                    trace!(pid = process.pid, "process vanished during enumeration");
                    return None;
                }
            };
            let owner = owners
                .entry(uid)
                .or_insert_with(|| owner_name(uid))
                .clone();
            Some(ProcessEntry {
                pid: u32::try_from(process.pid).ok()?,
                name: stat.comm,
                owner,
            })
        })))
    }
}

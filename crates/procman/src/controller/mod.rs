mod inner;
mod slot;

pub use inner::{RunOutput, StartOutcome};
pub use slot::{ChildHandle, ChildSlot};

use crate::{
    Error,
    delay::{Delay, TokioDelay},
    status::{ProcessStatusSnapshot, StatusRecordReader},
    table::{LinuxProcessTable, ProcessIter, ProcessTable, Signal, os_signal},
};
use config::Config;
use inner::ControllerInner;
use parking_lot::Mutex;
use std::{fmt, sync::Arc, time::Duration};
use tracing::debug;

/// Capabilities a controller is built from.
pub struct Services {
    pub reader: StatusRecordReader,
    pub table: Box<dyn ProcessTable>,
    pub delay: Box<dyn Delay>,
    pub terminate_signal: Signal,
}

impl Services {
    /// The real proc filesystem, `kill(2)` and the tokio timer.
    pub fn from_config(config: &Config) -> Self {
        Self {
            reader: StatusRecordReader::new(&config.system.proc_root),
            table: Box::new(LinuxProcessTable::new(&config.system.proc_root)),
            delay: Box::new(TokioDelay),
            terminate_signal: os_signal(config.control.terminate_signal),
        }
    }
}

/// Governs one process: holds its status snapshot and runs control
/// operations on its behalf.
///
/// Clones share state, so at most one child launched through `start` is
/// active across all of them.
#[derive(Clone)]
pub struct ProcessController(Arc<ControllerInner>);

impl ProcessController {
    /// Snapshot `pid` and build a controller for it. Fails if the status
    /// record cannot be read or decoded.
    pub fn new(pid: u32, services: Services) -> Result<Self, Error> {
        let snapshot = services.reader.read(pid)?;
        debug!(pid, ?snapshot, "controller created");
        Ok(Self(Arc::new(ControllerInner {
            target_pid: pid,
            snapshot,
            slot: Mutex::new(ChildSlot::Idle),
            table: services.table,
            delay: services.delay,
            terminate_signal: services.terminate_signal,
        })))
    }

    /// Controller for the calling process.
    pub fn for_self(services: Services) -> Result<Self, Error> {
        Self::new(std::process::id(), services)
    }

    pub fn target_pid(&self) -> u32 {
        self.0.target_pid
    }

    /// Snapshot taken at construction; never refreshed.
    pub fn snapshot(&self) -> &ProcessStatusSnapshot {
        &self.0.snapshot
    }

    pub fn child_slot(&self) -> ChildSlot {
        self.0.slot.lock().clone()
    }

    pub fn is_running_subprocess(&self) -> bool {
        self.0.slot.lock().is_running()
    }

    pub fn active_child(&self) -> Option<ChildHandle> {
        self.0.slot.lock().child().cloned()
    }

    /// Launch `command_line` and wait for it to exit, capturing stdout and
    /// stderr in full.
    ///
    /// If a child is already active nothing is launched and
    /// [`StartOutcome::AlreadyRunning`] is returned. Dropping the returned
    /// future kills the child and frees the slot.
    pub async fn start<S: AsRef<str>>(&self, command_line: &[S]) -> Result<StartOutcome, Error> {
        self.0.start(command_line).await
    }

    /// Wait `duration` if `pid` exists and return the time actually waited.
    /// The target itself is not paused.
    ///
    /// The duration is expected to be clamped by the caller.
    pub async fn await_pid(&self, pid: u32, duration: Duration) -> Result<Duration, Error> {
        self.0.await_pid(pid, duration).await
    }

    /// Ask the OS to terminate `pid` and return without waiting for it to
    /// exit.
    pub fn terminate(&self, pid: u32) -> Result<(), Error> {
        self.0.terminate(pid)
    }

    /// Lazily list `(pid, name)` of every process owned by `user`.
    pub fn enumerate_owned_processes(&self, user: &str) -> Result<ProcessIter<'_>, Error> {
        self.0.enumerate_owned_processes(user)
    }
}

impl fmt::Debug for ProcessController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessController")
            .field("target_pid", &self.0.target_pid)
            .field("slot", &*self.0.slot.lock())
            .field("terminate_signal", &self.0.terminate_signal)
            .finish_non_exhaustive()
    }
}

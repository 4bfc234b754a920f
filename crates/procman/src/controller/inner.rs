use super::slot::{ChildHandle, ChildSlot, SlotGuard};
use crate::{
    Error,
    delay::Delay,
    status::ProcessStatusSnapshot,
    table::{ProcessIter, ProcessTable, Signal},
};
use parking_lot::Mutex;
use std::{
    process::{ExitStatus, Stdio},
    time::Duration,
};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Captured result of a child that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub pid: u32,
    pub stdout: String,
    pub stderr: String,
    /// A non-zero exit is reported here, not as an error.
    pub status: ExitStatus,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Finished(RunOutput),
    /// Another child is active; nothing was launched. `child` is `None` while
    /// the other child is still being spawned.
    AlreadyRunning { child: Option<ChildHandle> },
}

pub(crate) struct ControllerInner {
    pub(crate) target_pid: u32,
    pub(crate) snapshot: ProcessStatusSnapshot,
    pub(crate) slot: Mutex<ChildSlot>,
    pub(crate) table: Box<dyn ProcessTable>,
    pub(crate) delay: Box<dyn Delay>,
    pub(crate) terminate_signal: Signal,
}

impl ControllerInner {
    pub(crate) async fn start<S: AsRef<str>>(
        &self,
        command_line: &[S],
    ) -> Result<StartOutcome, Error> {
        let Some((program, args)) = command_line.split_first() else {
            return Err(Error::EmptyCommand);
        };
        let command = command_line
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(" ");

        let guard = match SlotGuard::acquire(&self.slot, &command) {
            Ok(guard) => guard,
            Err(busy) => {
                info!(pid = self.target_pid, %command, "subprocess already running");
                return Ok(StartOutcome::AlreadyRunning {
                    child: busy.child().cloned(),
                });
            }
        };

        info!(pid = self.target_pid, %command, "starting subprocess");
        let child = Command::new(AsRef::<str>::as_ref(program))
            .args(args.iter().map(AsRef::<str>::as_ref))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                warn!(%command, error = %source, "failed to launch subprocess");
                Error::CommandNotFound {
                    command: command.clone(),
                    source,
                }
            })?;

        // `id` is only `None` once the child has been reaped
        let pid = child.id().unwrap_or_default();
        guard.running(ChildHandle {
            pid,
            command: command.clone(),
        });
        debug!(child = pid, %command, "subprocess running");

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| Error::ChildWait { pid, source })?;
        drop(guard);

        info!(child = pid, status = %output.status, "subprocess exited");
        Ok(StartOutcome::Finished(RunOutput {
            pid,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status,
        }))
    }

    pub(crate) async fn await_pid(&self, pid: u32, duration: Duration) -> Result<Duration, Error> {
        if !self.table.exists(pid) {
            return Err(Error::TargetNotFound(pid));
        }

        info!(pid, seconds = duration.as_secs(), "sleeping");
        let waited = self.delay.wait(duration).await;
        debug!(pid, ?waited, "awake");
        Ok(waited)
    }

    pub(crate) fn terminate(&self, pid: u32) -> Result<(), Error> {
        if !self.table.exists(pid) {
            return Err(Error::TargetNotFound(pid));
        }

        self.table.signal(pid, self.terminate_signal)?;
        info!(pid, signal = ?self.terminate_signal, "termination requested");
        Ok(())
    }

    pub(crate) fn enumerate_owned_processes(&self, user: &str) -> Result<ProcessIter<'_>, Error> {
        let user = user.to_owned();
        let processes = self.table.processes()?;
        Ok(Box::new(processes.filter(move |entry| {
            entry.owner.as_deref() == Some(user.as_str())
        })))
    }
}

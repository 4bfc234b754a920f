//! Shutdown requests for the interactive menu.

use crate::error::Error;
use flume::Sender;
use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::debug;

/// Why the menu was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Interrupt,
    Terminate,
    Hangup,
}

/// Handlers for every shutdown signal. Installing them replaces the default
/// "terminate the process" action, so a signal that arrives before the first
/// `recv` is queued rather than killing the menu.
#[derive(Debug)]
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
    hangup: Signal,
}

impl ShutdownSignals {
    pub fn install() -> Result<Self, Error> {
        let listen = |kind| signal(kind).map_err(Error::SignalHandler);
        Ok(Self {
            interrupt: listen(SignalKind::interrupt())?,
            terminate: listen(SignalKind::terminate())?,
            hangup: listen(SignalKind::hangup())?,
        })
    }

    pub async fn recv(&mut self) -> Shutdown {
        tokio::select! {
            _ = self.interrupt.recv() => Shutdown::Interrupt,
            _ = self.terminate.recv() => Shutdown::Terminate,
            _ = self.hangup.recv() => Shutdown::Hangup,
        }
    }
}

/// Hand the first shutdown request to the menu.
pub async fn forward_first(mut signals: ShutdownSignals, menu: Sender<Shutdown>) -> Result<(), Error> {
    let request = signals.recv().await;
    debug!(?request, "shutdown requested");
    menu.send_async(request).await?;
    Ok(())
}

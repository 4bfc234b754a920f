use crate::signals::Shutdown;
use flume::SendError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to install signal handler: {0}")]
    SignalHandler(#[source] io::Error),

    #[error("Failed to forward shutdown request: {0}")]
    SendSignal(#[from] SendError<Shutdown>),

    #[error("Cannot determine the current user")]
    UnknownUser,

    #[error(transparent)]
    Control(#[from] procman::Error),

    #[error(transparent)]
    Config(#[from] config::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

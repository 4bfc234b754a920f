//! The interactive loop: a numbered menu read from stdin until `5`, end of
//! input, or an interrupt.

use crate::{
    Error, commands, current_user,
    signals::{Shutdown, ShutdownSignals, forward_first},
};
use config::{Config, Control};
use flume::Receiver;
use procman::{ProcessController, Services};
use std::io::{self, Write};
use tracing::{debug, error, warn};

const MENU: &str = "\
Choose an option:
1. Start a new subprocess
2. List all processes run by the current user
3. Make a process sleep
4. Stop a process
5. Exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Menu {
    controller: ProcessController,
    control: Control,
    user: Option<String>,
    lines: Receiver<String>,
    signals: Receiver<Shutdown>,
}

impl Menu {
    pub fn new(
        controller: ProcessController,
        control: Control,
        user: Option<String>,
        lines: Receiver<String>,
        signals: Receiver<Shutdown>,
    ) -> Self {
        Self {
            controller,
            control,
            user,
            lines,
            signals,
        }
    }

    pub async fn run(&self, out: &mut impl Write) -> Result<(), Error> {
        commands::show(&self.controller, out)?;
        writeln!(out, "\n{}\n", "***".repeat(15))?;

        loop {
            writeln!(out, "{}\n", "###".repeat(15))?;
            writeln!(out, "{MENU}")?;
            let Some(choice) = self.prompt(out, "Enter your choice: ").await? else {
                break;
            };
            writeln!(out, "{}\n", "###".repeat(15))?;

            let flow = match choice.as_str() {
                "1" => self.start(out).await?,
                "2" => self.list(out)?,
                "3" => self.sleep(out).await?,
                "4" => self.stop(out).await?,
                "5" => Flow::Quit,
                _ => {
                    writeln!(out, "Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Next trimmed input line, or `None` once input ends or a signal
    /// arrives.
    async fn prompt(&self, out: &mut impl Write, prompt: &str) -> Result<Option<String>, Error> {
        write!(out, "{prompt}")?;
        out.flush()?;
        // a closed input channel means end of input
        let line = tokio::select! {
            line = self.lines.recv_async() => line.ok().map(|line| line.trim().to_owned()),
            Ok(request) = self.signals.recv_async() => {
                debug!(?request, "leaving menu");
                None
            }
        };
        Ok(line)
    }

    async fn start(&self, out: &mut impl Write) -> Result<Flow, Error> {
        let Some(line) = self
            .prompt(out, "Enter the command to run in the subprocess: ")
            .await?
        else {
            return Ok(Flow::Quit);
        };
        if line.is_empty() {
            writeln!(out, "Command cannot be blank. Please try again.")?;
            return Ok(Flow::Continue);
        }
        let argv: Vec<&str> = line.split_whitespace().collect();
        let result = commands::start(&self.controller, &argv, out).await;
        report(out, result)
    }

    fn list(&self, out: &mut impl Write) -> Result<Flow, Error> {
        let result = match &self.user {
            Some(user) => commands::list(&self.controller, user, out),
            None => Err(Error::UnknownUser),
        };
        report(out, result)
    }

    async fn sleep(&self, out: &mut impl Write) -> Result<Flow, Error> {
        let Some(pid) = self
            .prompt(out, "Enter the PID of the process to sleep: ")
            .await?
        else {
            return Ok(Flow::Quit);
        };
        let Ok(pid) = pid.parse::<u32>() else {
            writeln!(out, "Invalid input.")?;
            return Ok(Flow::Continue);
        };
        let prompt = format!(
            "Enter the sleep duration (Maximum {} seconds): ",
            self.control.max_sleep.as_secs()
        );
        let Some(seconds) = self.prompt(out, &prompt).await? else {
            return Ok(Flow::Quit);
        };
        let Ok(seconds) = seconds.parse::<i64>() else {
            writeln!(out, "Invalid input.")?;
            return Ok(Flow::Continue);
        };
        let result = commands::sleep(&self.controller, &self.control, pid, seconds, out).await;
        report(out, result)
    }

    async fn stop(&self, out: &mut impl Write) -> Result<Flow, Error> {
        let Some(pid) = self
            .prompt(out, "Enter the PID of the process to stop: ")
            .await?
        else {
            return Ok(Flow::Quit);
        };
        let Ok(pid) = pid.parse::<u32>() else {
            writeln!(out, "Invalid input.")?;
            return Ok(Flow::Continue);
        };
        let result = commands::stop(&self.controller, pid, out);
        report(out, result)
    }
}

/// Print a failed operation and keep the menu going. Only output errors end
/// the loop.
fn report(out: &mut impl Write, result: Result<(), Error>) -> Result<Flow, Error> {
    match result {
        Ok(()) => Ok(Flow::Continue),
        Err(err @ (Error::Control(_) | Error::UnknownUser)) => {
            warn!(error = %err, "operation failed");
            writeln!(out, "Error: {err}")?;
            Ok(Flow::Continue)
        }
        Err(err) => Err(err),
    }
}

/// Run the menu for the calling process on stdin/stdout, leaving on
/// SIGINT, SIGTERM or SIGHUP.
pub async fn run_interactive(config: &Config, out: &mut impl Write) -> Result<(), Error> {
    let controller = ProcessController::for_self(Services::from_config(config))?;

    let (lines_tx, lines_rx) = flume::unbounded();
    // stdin has no async reader; a detached thread feeds the channel
    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let signals = ShutdownSignals::install()?;
    let (signals_tx, signals_rx) = flume::bounded(1);
    let listener = tokio::spawn(async move {
        if let Err(err) = forward_first(signals, signals_tx).await {
            error!(error = ?err, "Error while waiting for signal");
        }
    });

    let menu = Menu::new(
        controller,
        config.control.clone(),
        current_user(),
        lines_rx,
        signals_rx,
    );
    let result = menu.run(out).await;
    listener.abort();
    result
}

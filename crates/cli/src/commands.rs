//! One function per control operation, each writing its report to `out`.

use crate::{Error, cli::Command, current_user, menu, render};
use config::{Config, Control};
use procman::{ProcessController, Services, status::page_size};
use std::io::Write;
use tracing::debug;

pub async fn execute(command: Command, config: &Config, out: &mut impl Write) -> Result<(), Error> {
    debug!(?command, "executing");
    match command {
        Command::Show { pid } => {
            let pid = pid.unwrap_or_else(std::process::id);
            let controller = ProcessController::new(pid, Services::from_config(config))?;
            show(&controller, out)
        }
        Command::Run { command } => start(&self_controller(config)?, &command, out).await,
        Command::List { user } => {
            let user = match user {
                Some(user) => user,
                None => current_user().ok_or(Error::UnknownUser)?,
            };
            list(&self_controller(config)?, &user, out)
        }
        Command::Sleep { pid, seconds } => {
            sleep(&self_controller(config)?, &config.control, pid, seconds, out).await
        }
        Command::Stop { pid } => stop(&self_controller(config)?, pid, out),
        Command::Menu => menu::run_interactive(config, out).await,
        Command::Config => {
            write!(out, "{}", config.to_toml()?)?;
            Ok(())
        }
    }
}

fn self_controller(config: &Config) -> Result<ProcessController, Error> {
    Ok(ProcessController::for_self(Services::from_config(config))?)
}

pub fn show(controller: &ProcessController, out: &mut impl Write) -> Result<(), Error> {
    render::snapshot(out, controller.snapshot(), page_size())?;
    Ok(())
}

pub async fn start<S: AsRef<str>>(
    controller: &ProcessController,
    command_line: &[S],
    out: &mut impl Write,
) -> Result<(), Error> {
    writeln!(
        out,
        "Process {} is starting a new subprocess.",
        controller.target_pid()
    )?;
    let outcome = controller.start(command_line).await?;
    render::start_outcome(out, &outcome, controller.target_pid())?;
    Ok(())
}

pub fn list(controller: &ProcessController, user: &str, out: &mut impl Write) -> Result<(), Error> {
    writeln!(out, "Listing all processes run by {user}:")?;
    render::processes(out, controller.enumerate_owned_processes(user)?)?;
    Ok(())
}

/// `seconds` is raw user input and is clamped here.
pub async fn sleep(
    controller: &ProcessController,
    control: &Control,
    pid: u32,
    seconds: i64,
    out: &mut impl Write,
) -> Result<(), Error> {
    let waited = controller.await_pid(pid, control.clamp_sleep(seconds)).await?;
    writeln!(
        out,
        "Process with PID {pid} is awake after {} seconds!",
        waited.as_secs()
    )?;
    Ok(())
}

pub fn stop(controller: &ProcessController, pid: u32, out: &mut impl Write) -> Result<(), Error> {
    controller.terminate(pid)?;
    writeln!(out, "Process with PID {pid} stopped.")?;
    Ok(())
}

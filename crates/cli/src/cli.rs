use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};

/// pidctl: inspect and control Linux processes
///
/// Decodes a process's `/proc/<pid>/stat` record and runs, waits on,
/// terminates or lists processes. Without a subcommand an interactive menu
/// is started.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_parser = validate_file)]
    pub conffile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the decoded status record of a process.
    Show {
        /// Process to inspect; defaults to pidctl itself.
        #[arg(short, long)]
        pid: Option<u32>,
    },

    /// Run a command and print its output once it exits.
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// List processes owned by a user.
    List {
        /// Owner name; defaults to the invoking user.
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Wait while a process exists. The duration is clamped to the
    /// configured range.
    Sleep {
        pid: u32,
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },

    /// Ask a process to terminate.
    Stop { pid: u32 },

    /// Interactive menu.
    Menu,

    /// Print the effective configuration as TOML.
    Config,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_keeps_hyphenated_arguments() {
        let cli = Cli::try_parse_from(["pidctl", "run", "ls", "-l", "/tmp"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Run {
                command: vec!["ls".into(), "-l".into(), "/tmp".into()]
            })
        );
    }

    #[test]
    fn sleep_accepts_negative_seconds() {
        let cli = Cli::try_parse_from(["pidctl", "sleep", "12", "-4"]).unwrap();
        assert_eq!(cli.command, Some(Command::Sleep { pid: 12, seconds: -4 }));
    }

    #[test]
    fn missing_conffile_is_rejected() {
        assert!(Cli::try_parse_from(["pidctl", "-c", "/definitely/not/here.toml"]).is_err());
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["pidctl"]).unwrap();
        assert_eq!(cli.command, None);
    }
}

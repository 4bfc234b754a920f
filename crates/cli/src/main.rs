use clap::Parser;
use config::Config;
use pidctl::{
    cli::{Cli, Command},
    commands,
};
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::builder()
        .with_default_directive(cli.verbosity.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(io::stderr)
        .init();

    debug!(config = ?cli);

    let config = match cli.conffile {
        Some(path) => Config::load(path)?,
        _ => Config::new()?,
    };

    let mut stdout = io::stdout().lock();
    commands::execute(cli.command.unwrap_or(Command::Menu), &config, &mut stdout).await?;
    Ok(())
}

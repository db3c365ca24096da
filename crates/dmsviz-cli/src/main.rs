use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
mod cli;
mod commands;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(&cli.log_level);
    cli.execute()?;
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

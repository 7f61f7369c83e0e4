mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;
mod server;

use anyhow::Result;
use cli::Cli;
use clap::Parser;
use tracing_subscriber::{filter::Directive, EnvFilter};

/// Install the global subscriber: `RUST_LOG` plus this crate at `info` (or `debug`)
pub(crate) fn init_tracing(debug: bool) -> Result<()> {
    let level = if debug { "debug" } else { "info" };
    let directive: Directive = format!("chatbot_pipeline={level}").parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

mod cli;
mod error;
mod format;
mod history;
mod logging;
mod model;
mod orchestrator;
mod service;
mod storage;
mod symbol;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_interactive = args.is_interactive();

    cli::run(args).await?;
    // Explicitly exit with code 0 on success for one-shot modes; nothing else needs to wind down.
    if !is_interactive {
        std::process::exit(0);
    }
    Ok(())
}

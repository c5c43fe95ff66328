//! pageforge CLI — batch keyword-to-page generator.
//!
//! Turns a newline-delimited keyword list into a ZIP archive of per-keyword
//! HTML pages and JSON descriptors.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}

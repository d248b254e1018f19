//! mindscribe CLI — keyword extraction and mind-map export.
//!
//! Reads model output or outline notation from a file or stdin and prints
//! keywords, Markdown headers, or writes a Freemind `.mm` document.

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

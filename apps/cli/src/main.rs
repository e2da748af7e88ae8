//! Pagesmith CLI: build a static site's content regions from its data files.
//!
//! Reads finds, publications, projects and writings, optionally scrapes
//! Open Graph metadata for linked pages, and splices rendered cards into the
//! site's HTML pages.

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

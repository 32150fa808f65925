//! CLI entry point for exemplar-based inpainting

use clap::Parser;
use patchfill::io::cli::{Cli, FileProcessor};
use tracing_subscriber::EnvFilter;

fn main() -> patchfill::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}

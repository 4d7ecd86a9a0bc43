//! CLI entry point for the fake engraving tool

use clap::Parser;
use engraving::io::cli::{Cli, FileProcessor};

fn main() -> engraving::Result<()> {
    let cli = Cli::parse();
    engraving::io::logging::init(cli.verbose, cli.quiet)?;
    let mut processor = FileProcessor::new(cli);
    processor.process()
}

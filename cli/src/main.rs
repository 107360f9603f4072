//! Subvoc CLI - Command-line interface for the BPE vocabulary trainer.
//!
//! This is the main entry point for the `subvoc` command-line tool.

mod commands;

use clap::{Parser, Subcommand};
use commands::TrainCommand;

#[derive(Parser)]
#[command(name = "subvoc")]
#[command(about = "Train subword (BPE) vocabularies from text corpora", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new vocabulary and merge table from text data
    Train(TrainCommand),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(cmd) => commands::train::run(cmd)?,
    }

    Ok(())
}

mod check;
mod completions;
mod generate;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for quill_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(about = "Generate Java source files from declaration manifests")]
pub(crate) struct Cli {
    /// Log pipeline decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the Java file described by a manifest
    Generate(GenerateCommand),

    /// Validate a manifest without writing anything
    Check(CheckCommand),

    /// Print a completion script for quill subcommands and flags
    Completions(CompletionsCommand),
}

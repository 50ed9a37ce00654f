use std::io;

use clap::{Args, CommandFactory};
use clap_complete::Shell;
use eyre::Result;

use super::Cli;

/// Print a completion script for `quill` to stdout.
///
/// Source it from the shell's startup file, e.g.
/// `quill completions zsh > ~/.zfunc/_quill`.
#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell the completion script is written for
    #[arg(value_enum)]
    shell: Shell,
}

impl CompletionsCommand {
    pub fn run(&self) -> Result<()> {
        let mut cli = Cli::command();
        let bin = cli.get_name().to_string();
        clap_complete::generate(self.shell, &mut cli, bin, &mut io::stdout());
        Ok(())
    }
}

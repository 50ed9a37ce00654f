mod commands;

use clap::Parser;
use eyre::Result;

use crate::commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run()
}

/// Log to stderr when `RUST_LOG` is set, or at debug level for quill's own
/// crates with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("quill=debug")
    } else {
        return;
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

mod commands;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.run()
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn directive_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "classforge=warn,classforge_codegen=warn",
        1 => "classforge=debug,classforge_codegen=debug",
        _ => "classforge=trace,classforge_codegen=trace",
    }
}

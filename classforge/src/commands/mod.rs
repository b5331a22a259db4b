mod check;
mod compile;
mod inspect;
mod render;

use std::path::Path;

use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand};
use classforge_codegen::{
    ClassBuilder, CompileError, Diagnostic, ProcessBackend, RenderError, StructuralViolation,
    lower_manifest,
};
use classforge_manifest::{BackendConfig, ClassToml};
use compile::CompileCommand;
use eyre::Result;
use inspect::InspectCommand;
use render::RenderCommand;

/// Extension trait for exiting on errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

pub(crate) fn report_and_exit(err: impl miette::Diagnostic + Send + Sync + 'static) -> ! {
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(1);
}

impl<T> UnwrapOrExit<T> for classforge_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        self.unwrap_or_else(|e| report_and_exit(*e))
    }
}

macro_rules! impl_unwrap_or_exit {
    ($($err:ty),*) => {
        $(
            impl<T> UnwrapOrExit<T> for std::result::Result<T, $err> {
                fn unwrap_or_exit(self) -> T {
                    self.unwrap_or_else(|e| report_and_exit(e))
                }
            }
        )*
    };
}

impl_unwrap_or_exit!(StructuralViolation, RenderError, CompileError);

/// Open a class.toml and lower it into a builder.
///
/// Commands that never compile still need a backend to build with; the
/// manifest's `[backend]` is used when present.
pub(crate) fn open_class(path: &Path) -> ClassBuilder<ProcessBackend> {
    let class_toml = ClassToml::open(path).unwrap_or_exit();
    let backend_config = class_toml
        .manifest()
        .backend
        .clone()
        .unwrap_or_else(|| BackendConfig::new("csc"));
    lower_manifest(class_toml.manifest(), ProcessBackend::new(backend_config)).unwrap_or_exit()
}

/// Print backend diagnostics in compiler style.
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{}: {}", diag.severity, diag.message);
        if let Some(loc) = &diag.location {
            eprintln!("  --> {}", loc);
        }
    }
}

#[derive(Parser)]
#[command(name = "classforge")]
#[command(version)]
#[command(about = "Render and compile classes from TOML descriptions")]
pub(crate) struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Render(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Compile(cmd) => cmd.run(),
            Commands::Inspect(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated source for class.toml
    Render(RenderCommand),

    /// Validate class.toml and show a summary
    Check(CheckCommand),

    /// Compile class.toml with the configured [backend]
    Compile(CompileCommand),

    /// List annotated members or dump the class model
    Inspect(InspectCommand),
}

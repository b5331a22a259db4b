use std::path::PathBuf;

use clap::Args;
use classforge_codegen::{CompileError, ProcessBackend, lower_manifest};
use classforge_manifest::ClassToml;
use eyre::{Result, eyre};

use super::{UnwrapOrExit, print_diagnostics, report_and_exit};

#[derive(Args)]
pub struct CompileCommand {
    /// Path to class.toml (defaults to ./class.toml)
    #[arg(short, long, default_value = "class.toml")]
    pub config: PathBuf,
}

impl CompileCommand {
    /// Run the compile command
    pub fn run(&self) -> Result<()> {
        let class_toml = ClassToml::open(&self.config).unwrap_or_exit();
        let manifest = class_toml.manifest();
        let backend_config = manifest.backend.clone().ok_or_else(|| {
            eyre!(
                "{} has no [backend] table; add one to compile",
                self.config.display()
            )
        })?;

        let mut builder =
            lower_manifest(manifest, ProcessBackend::new(backend_config)).unwrap_or_exit();

        match builder.compile() {
            Ok(assembly) => {
                print_diagnostics(&assembly.warnings);
                println!(
                    "✓ Compiled {} ({} bytes)",
                    assembly.type_name,
                    assembly.image.len()
                );
                Ok(())
            }
            Err(CompileError::Compilation {
                type_name,
                diagnostics,
            }) => {
                print_diagnostics(&diagnostics);
                eprintln!("\nfailed to compile {}", type_name);
                std::process::exit(1);
            }
            Err(e) => report_and_exit(e),
        }
    }
}

use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};

use super::{UnwrapOrExit, open_class};

#[derive(Args)]
pub struct RenderCommand {
    /// Path to class.toml (defaults to ./class.toml)
    #[arg(short, long, default_value = "class.toml")]
    pub config: PathBuf,

    /// Write the source to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RenderCommand {
    /// Run the render command
    pub fn run(&self) -> Result<()> {
        let builder = open_class(&self.config);
        let source = builder.render().unwrap_or_exit();

        match &self.output {
            Some(path) => {
                std::fs::write(path, &source)
                    .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
                println!("Rendered {} to {}", builder.definition().qualified_name(), path.display());
            }
            None => print!("{}", source),
        }

        Ok(())
    }
}

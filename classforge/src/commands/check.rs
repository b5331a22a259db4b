use std::path::PathBuf;

use clap::Args;
use classforge_ir::MemberTag;
use eyre::Result;

use super::{UnwrapOrExit, open_class};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to class.toml (defaults to ./class.toml)
    #[arg(short, long, default_value = "class.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let builder = open_class(&self.config);

        // Rendering reports any incomplete member data
        builder.render().unwrap_or_exit();

        let def = builder.definition();
        println!("✓ {} is valid\n", self.config.display());

        println!("  class {}", def.qualified_name());
        if let Some(base) = def.primary_base() {
            println!("    extends {}", base.name);
        }
        for cap in def.capabilities() {
            println!("    implements {}", cap.name);
        }
        println!();

        for (tag, one, many) in [
            (MemberTag::Field, "field", "fields"),
            (MemberTag::Property, "property", "properties"),
            (MemberTag::Method, "method", "methods"),
        ] {
            let count = def.members().iter().filter(|m| m.tag() == tag).count();
            if count > 0 {
                println!("  {} {}", count, if count == 1 { one } else { many });
            }
        }

        let references = builder.references();
        println!(
            "  {} referenced type{}",
            references.len(),
            if references.len() == 1 { "" } else { "s" }
        );
        println!("\n  fingerprint {}", builder.fingerprint());

        Ok(())
    }
}

use std::path::PathBuf;

use clap::Args;
use classforge_codegen::{MemberDiscovery, MemberKindTable, TypeRegistry};
use eyre::{Context, Result};

use super::open_class;

#[derive(Args)]
pub struct InspectCommand {
    /// Path to class.toml (defaults to ./class.toml)
    #[arg(short, long, default_value = "class.toml")]
    pub config: PathBuf,

    /// List serializable members carrying this annotation
    #[arg(short, long)]
    pub marker: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl InspectCommand {
    /// Run the inspect command
    pub fn run(&self) -> Result<()> {
        let builder = open_class(&self.config);
        let def = builder.definition();

        let Some(marker) = &self.marker else {
            if self.json {
                let json = serde_json::to_string_pretty(def).wrap_err("Failed to serialize class")?;
                println!("{}", json);
            } else {
                println!("class {}", def.qualified_name());
                for member in def.members() {
                    println!("  {:<8} {} {}", member.tag(), member.ty, member.name);
                }
            }
            return Ok(());
        };

        let mut registry = TypeRegistry::new();
        registry.register(def.clone());
        let members = registry.members_with(
            &def.qualified_name(),
            marker,
            &MemberKindTable::serializable(),
        );

        if self.json {
            let json =
                serde_json::to_string_pretty(&members).wrap_err("Failed to serialize members")?;
            println!("{}", json);
        } else if members.is_empty() {
            println!("No serializable members carry [{}]", marker);
        } else {
            for member in &members {
                println!("  {:<8} {} {}", member.tag, member.ty, member.name);
            }
        }

        Ok(())
    }
}

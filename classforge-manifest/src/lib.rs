//! TOML class description parsing and validation for classforge.
//!
//! A `class.toml` describes one generated type: its name, bases and members,
//! plus the `[builder]` and `[backend]` settings used to render and compile it.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod manifest;

pub use config::{BackendConfig, BuilderConfig, CapabilityPolicy, IndentStyle};
pub use error::{Error, Result, SourceContext};
pub use manifest::{
    BaseEntry, ClassConfig, ClassManifest, ClassToml, MemberEntry, MemberEntryKind, ParamEntry,
    ParseContext,
};

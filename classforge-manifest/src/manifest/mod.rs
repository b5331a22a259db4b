//! Manifest types and parsing for class.toml files.

mod file;
mod parse;
mod validate;

use classforge_ir::{Declaration, Modifier};
pub use file::ClassToml;
use serde::Deserialize;
use toml::Spanned;
pub use validate::ParseContext;

use crate::{BackendConfig, BuilderConfig};

/// Root manifest for class.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassManifest {
    /// Generated class metadata
    pub class: ClassConfig,

    /// Base types, in declaration order
    #[serde(default)]
    pub bases: Vec<BaseEntry>,

    /// Members, in declaration order
    #[serde(default)]
    pub members: Vec<MemberEntry>,

    /// Rendering and caching settings
    #[serde(default)]
    pub builder: BuilderConfig,

    /// External compiler, required only for compiling
    #[serde(default)]
    pub backend: Option<BackendConfig>,
}

/// The `[class]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassConfig {
    /// Class name
    pub name: Spanned<String>,

    /// Enclosing namespace
    #[serde(default)]
    pub namespace: Option<Spanned<String>>,

    /// Class modifiers (defaults to `public`)
    #[serde(default = "default_class_modifiers")]
    pub modifiers: Vec<Modifier>,

    /// Class-level annotations
    #[serde(default)]
    pub annotations: Vec<Spanned<String>>,
}

fn default_class_modifiers() -> Vec<Modifier> {
    vec![Modifier::Public]
}

/// One `[[bases]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseEntry {
    /// Fully-qualified type name
    #[serde(rename = "type")]
    pub ty: Spanned<String>,

    /// Whether the type is a class or an interface
    pub kind: Declaration,
}

/// Kind of a `[[members]]` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberEntryKind {
    Field,
    Property,
    Method,
}

impl MemberEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberEntryKind::Field => "field",
            MemberEntryKind::Property => "property",
            MemberEntryKind::Method => "method",
        }
    }
}

/// One `[[members]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberEntry {
    /// Field, property or method
    pub kind: MemberEntryKind,

    /// Member name
    pub name: Spanned<String>,

    /// Declared type (return type for methods)
    #[serde(rename = "type")]
    pub ty: Spanned<String>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// Annotation type names
    #[serde(default)]
    pub annotations: Vec<Spanned<String>>,

    /// Method parameters
    #[serde(default)]
    pub params: Vec<ParamEntry>,

    /// Method body, one statement per line
    #[serde(default)]
    pub body: Option<Spanned<String>>,
}

impl MemberEntry {
    pub fn is_method(&self) -> bool {
        self.kind == MemberEntryKind::Method
    }
}

/// One method parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamEntry {
    pub name: Spanned<String>,

    #[serde(rename = "type")]
    pub ty: Spanned<String>,
}

impl ClassManifest {
    pub fn class_name(&self) -> &str {
        self.class.name.get_ref()
    }

    /// Iterate member entries of one kind.
    pub fn members_of(&self, kind: MemberEntryKind) -> impl Iterator<Item = &MemberEntry> {
        self.members.iter().filter(move |m| m.kind == kind)
    }
}

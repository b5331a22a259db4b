//! `[builder]` and `[backend]` settings.

use std::{fmt, time::Duration};

use serde::Deserialize;

/// Indentation of rendered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawIndent")]
pub enum IndentStyle {
    /// Spaces with the given width.
    Spaces(u8),
    /// One tab per level.
    Tab,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::Spaces(4)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndent {
    Width(u8),
    Named(String),
}

impl TryFrom<RawIndent> for IndentStyle {
    type Error = String;

    fn try_from(raw: RawIndent) -> Result<Self, Self::Error> {
        match raw {
            RawIndent::Width(0) => Err("indent width must be at least 1".to_string()),
            RawIndent::Width(n) => Ok(Self::Spaces(n)),
            RawIndent::Named(name) if name == "tab" => Ok(Self::Tab),
            RawIndent::Named(name) => Err(format!(
                "unknown indent '{}', expected a width or \"tab\"",
                name
            )),
        }
    }
}

/// What to do with capability bases that are added more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityPolicy {
    /// Render every occurrence and let the compiler report duplicates.
    #[default]
    PassThrough,
    /// Render only the first occurrence of each capability.
    Deduplicate,
}

impl CapabilityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityPolicy::PassThrough => "pass-through",
            CapabilityPolicy::Deduplicate => "deduplicate",
        }
    }
}

impl fmt::Display for CapabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class builder settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Indentation of rendered source.
    pub indent: IndentStyle,
    /// Handling of repeated capability bases.
    pub capabilities: CapabilityPolicy,
    /// Reuse compiled artifacts for unchanged definitions.
    pub cache: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::default(),
            capabilities: CapabilityPolicy::default(),
            cache: true,
        }
    }
}

impl BuilderConfig {
    pub fn with_capabilities(mut self, policy: CapabilityPolicy) -> Self {
        self.capabilities = policy;
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = false;
        self
    }
}

/// External compiler invocation.
///
/// Arguments may contain `{source}`, `{output}` and `{type}` placeholders.
/// An argument containing `{reference}` is repeated once per referenced type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Compiler executable.
    pub program: String,
    /// Argument templates.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extension of the generated source file.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,
    /// Name of the file the compiler writes, relative to the work directory.
    #[serde(default = "default_output_file")]
    pub output_file: String,
    /// Kill the compiler after this many milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

fn default_source_extension() -> String {
    "cs".to_string()
}

fn default_output_file() -> String {
    "{type}.dll".to_string()
}

impl BackendConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            source_extension: default_source_extension(),
            output_file: default_output_file(),
            timeout_ms: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = name.into();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;
use toml::Spanned;

use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// This struct encapsulates the source content, filename, and current path
/// through the class description, so nested members report where they live.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "class.toml");
/// ctx.validate_name(&manifest.class.name, "class")?;
///
/// // For nested validation
/// let nested = ctx.push("PlayerComponent").push("Heal");
/// nested.validate_name(&param.name, "parameter")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    /// Path segments for nested validation (e.g., ["PlayerComponent", "Heal"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut new_path = self.path.clone();
        new_path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path: new_path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "parameter in 'Player.Heal'" or just "class" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Validate that a spanned name is a valid, non-reserved identifier.
    pub fn validate_name(&self, name: &Spanned<String>, kind: &str) -> Result<()> {
        let span = Some(span_of(name));
        let value = name.get_ref();

        if is_reserved_keyword(value) {
            return Err(self
                .source
                .reserved_keyword_error(value, self.context_for(kind), span));
        }

        if let Some(reason) = validate_identifier(value) {
            return Err(self.source.invalid_identifier_error(
                value,
                self.context_for(kind),
                reason,
                span,
            ));
        }

        Ok(())
    }

    /// Validate that a spanned value is a well-formed type name.
    pub fn validate_type_name(&self, name: &Spanned<String>, kind: &str) -> Result<()> {
        if let Some(reason) = validate_type_name(name.get_ref()) {
            return Err(self.source.invalid_type_name_error(
                name.get_ref(),
                self.context_for(kind),
                reason,
                Some(span_of(name)),
            ));
        }
        Ok(())
    }
}

fn span_of<T>(value: &Spanned<T>) -> SourceSpan {
    let range = value.span();
    SourceSpan::from((range.start, range.end - range.start))
}

/// Keywords of the generated language that cannot be used as identifiers
pub(crate) const RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Check if a name is a reserved keyword
pub(crate) fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name)
}

/// Validate that a name is a valid identifier.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    // First character must be a letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name must contain only letters, numbers, and underscores");
    }

    None
}

/// Validate a dotted type name such as `System.Int32`, `List<Foo.Bar>` or `int[]`.
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_type_name(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("type name cannot be empty");
    }

    let mut depth = 0usize;
    let mut segment_len = 0usize;
    let mut prev = None;

    for c in name.chars() {
        match c {
            '.' => {
                if segment_len == 0 {
                    return Some("type name has an empty segment");
                }
                segment_len = 0;
            }
            '<' => {
                if segment_len == 0 {
                    return Some("generic arguments must follow a type name");
                }
                depth += 1;
                segment_len = 0;
            }
            '>' => {
                if depth == 0 {
                    return Some("unbalanced '>' in type name");
                }
                depth -= 1;
                segment_len = 1;
            }
            ',' | ' ' => {
                if depth == 0 {
                    return Some("',' is only allowed inside generic arguments");
                }
                segment_len = 0;
            }
            '[' | ']' | '?' => segment_len = 1,
            c if c.is_ascii_alphanumeric() || c == '_' => {
                if segment_len == 0 && c.is_ascii_digit() {
                    return Some("type name segments must not start with a digit");
                }
                segment_len += 1;
            }
            _ => return Some("type name contains an unsupported character"),
        }
        prev = Some(c);
    }

    if depth != 0 {
        return Some("unbalanced '<' in type name");
    }
    if prev == Some('.') {
        return Some("type name cannot end with '.'");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("health").is_none());
        assert!(validate_identifier("testField").is_none());
        assert!(validate_identifier("_private").is_none());
        assert!(validate_identifier("param2").is_none());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(validate_identifier("").is_some());
        assert!(validate_identifier("1st").is_some());
        assert!(validate_identifier("my-field").is_some());
        assert!(validate_identifier("a.b").is_some());
    }

    #[test]
    fn test_reserved_keywords() {
        assert!(is_reserved_keyword("class"));
        assert!(is_reserved_keyword("void"));
        assert!(is_reserved_keyword("params"));
        assert!(!is_reserved_keyword("Class"));
        assert!(!is_reserved_keyword("health"));
    }

    #[test]
    fn test_valid_type_names() {
        for name in [
            "System.Int32",
            "Foo",
            "int[]",
            "System.Collections.Generic.List<System.String>",
            "Dictionary<string, List<int>>",
            "int?",
        ] {
            assert!(validate_type_name(name).is_none(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_type_names() {
        for name in [
            "",
            "System..Int32",
            ".Foo",
            "Foo.",
            "List<int",
            "List>",
            "a,b",
            "9Lives",
            "Foo-Bar",
        ] {
            assert!(validate_type_name(name).is_some(), "{name} should be invalid");
        }
    }

    #[test]
    fn test_context_for_nested_path() {
        let ctx = ParseContext::new("", "class.toml");
        assert_eq!(ctx.context_for("class"), "class");
        let nested = ctx.push("Player").push("Heal");
        assert_eq!(nested.context_for("parameter"), "parameter in 'Player.Heal'");
    }
}

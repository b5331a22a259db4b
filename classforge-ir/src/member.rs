//! Member declarations and their parts.

use std::fmt;

use serde::Serialize;

use crate::{Modifiers, TypeName};

/// A parameterless annotation attached to a declaration, rendered `[Name]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Annotation {
    pub name: TypeName,
}

impl Annotation {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self { name: name.into() }
    }

    /// Whether this annotation names the given marker.
    ///
    /// A qualified marker must match the full name exactly. An unqualified
    /// marker matches the short name, with or without the conventional
    /// `Attribute` suffix.
    pub fn is(&self, marker: &str) -> bool {
        if marker.contains('.') {
            return self.name.as_str() == marker;
        }
        let short = self.name.short_name();
        short == marker
            || short.strip_suffix("Attribute") == Some(marker)
            || marker.strip_suffix("Attribute") == Some(short)
    }
}

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: TypeName,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// A method body: pre-rendered statements supplied by the caller.
///
/// The contents are never inspected; each line is emitted verbatim inside
/// the method braces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BlockBody {
    statements: Vec<String>,
}

impl BlockBody {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from individual statement lines.
    pub fn from_lines(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            statements: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a block from a source snippet, one statement line per text line.
    pub fn from_source(source: &str) -> Self {
        Self::from_lines(source.lines())
    }

    /// Append a statement line.
    pub fn statement(mut self, line: impl Into<String>) -> Self {
        self.statements.push(line.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Discriminant of a [`MemberKind`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberTag {
    Field,
    Property,
    Method,
}

impl MemberTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTag::Field => "field",
            MemberTag::Property => "property",
            MemberTag::Method => "method",
        }
    }
}

impl fmt::Display for MemberTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Kind-specific part of a member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberKind {
    Field,
    Property,
    Method {
        parameters: Vec<Parameter>,
        body: BlockBody,
    },
}

impl MemberKind {
    pub fn tag(&self) -> MemberTag {
        match self {
            MemberKind::Field => MemberTag::Field,
            MemberKind::Property => MemberTag::Property,
            MemberKind::Method { .. } => MemberTag::Method,
        }
    }
}

/// A field, property or method of the generated type.
///
/// For methods, `ty` is the return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MemberDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    #[serde(flatten)]
    pub kind: MemberKind,
}

impl MemberDecl {
    pub fn field(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self::with_kind(name, ty, MemberKind::Field)
    }

    pub fn property(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self::with_kind(name, ty, MemberKind::Property)
    }

    pub fn method(
        name: impl Into<String>,
        return_type: impl Into<TypeName>,
        parameters: Vec<Parameter>,
        body: BlockBody,
    ) -> Self {
        Self::with_kind(name, return_type, MemberKind::Method { parameters, body })
    }

    fn with_kind(name: impl Into<String>, ty: impl Into<TypeName>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Modifiers::new(),
            annotations: Vec::new(),
            kind,
        }
    }

    /// Set the modifier set.
    pub fn modifiers(mut self, modifiers: impl Into<Modifiers>) -> Self {
        self.modifiers = modifiers.into();
        self
    }

    /// Add an annotation.
    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn tag(&self) -> MemberTag {
        self.kind.tag()
    }

    /// Parameters for methods; empty for fields and properties.
    pub fn parameters(&self) -> &[Parameter] {
        match &self.kind {
            MemberKind::Method { parameters, .. } => parameters,
            MemberKind::Field | MemberKind::Property => &[],
        }
    }

    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a.is(marker))
    }
}

//! Type references.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fully-qualified type name, e.g. `System.String`.
///
/// The name is not validated here; empty names are reported when the model
/// is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The last dotted segment (`System.String` → `String`).
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a referenced type is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Declaration {
    /// A class: can be extended by at most one generated type.
    Class,
    /// An interface: any number can be implemented.
    Interface,
}

impl Declaration {
    pub fn as_str(&self) -> &'static str {
        match self {
            Declaration::Class => "class",
            Declaration::Interface => "interface",
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type referenced by the generated class, together with its own declaration kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef {
    pub name: TypeName,
    pub declaration: Declaration,
}

impl TypeRef {
    pub fn new(name: impl Into<TypeName>, declaration: Declaration) -> Self {
        Self {
            name: name.into(),
            declaration,
        }
    }

    /// Reference a class type.
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::new(name, Declaration::Class)
    }

    /// Reference an interface type.
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::new(name, Declaration::Interface)
    }
}

/// A base type of the generated class.
///
/// Which variant a reference becomes is decided by the referenced type's own
/// declaration, see [`BaseTypeRef::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum BaseTypeRef {
    /// The single class the generated type extends.
    Primary(TypeRef),
    /// An interface the generated type implements.
    Capability(TypeRef),
}

impl BaseTypeRef {
    /// Classify a type reference by its declaration.
    pub fn resolve(ty: TypeRef) -> Self {
        match ty.declaration {
            Declaration::Class => Self::Primary(ty),
            Declaration::Interface => Self::Capability(ty),
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        match self {
            Self::Primary(ty) | Self::Capability(ty) => ty,
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary(_))
    }
}

impl From<TypeRef> for BaseTypeRef {
    fn from(ty: TypeRef) -> Self {
        Self::resolve(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_declaration() {
        let base = BaseTypeRef::resolve(TypeRef::class("Engine.Component"));
        assert!(base.is_primary());

        let cap = BaseTypeRef::resolve(TypeRef::interface("System.ICloneable"));
        assert!(matches!(cap, BaseTypeRef::Capability(_)));
        assert_eq!(cap.type_ref().name.as_str(), "System.ICloneable");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TypeName::from("System.String").short_name(), "String");
        assert_eq!(TypeName::from("Foo").short_name(), "Foo");
    }

    #[test]
    fn test_blank_name_is_empty() {
        assert!(TypeName::from("").is_empty());
        assert!(TypeName::from("   ").is_empty());
        assert!(!TypeName::from("A").is_empty());
    }

    #[test]
    fn test_declaration_deserializes_lowercase() {
        let decl: Declaration = serde_json::from_str("\"interface\"").unwrap();
        assert_eq!(decl, Declaration::Interface);
    }
}

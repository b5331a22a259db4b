//! Capabilities the class builder consumes to describe members.
//!
//! The builder never asks for a concrete member type. Anything that can
//! answer these questions can be added to a generated class: the fluent
//! [`MemberSpec`], manifest entries, or caller-defined types.

use classforge_ir::{Annotation, BlockBody, Modifiers, Parameter, TypeName};

/// Describes a member's name, type, modifiers and annotations.
///
/// For methods, [`member_type`](Self::member_type) is the return type.
pub trait MemberImplementation {
    fn member_name(&self) -> &str;

    fn member_type(&self) -> TypeName;

    fn modifiers(&self) -> Modifiers;

    /// Annotations in the order they should be rendered.
    fn annotations(&self) -> Vec<Annotation> {
        Vec::new()
    }
}

/// Supplies an ordered parameter list.
pub trait ParameterImplementation {
    fn parameters(&self) -> Vec<Parameter>;
}

/// Supplies a method body.
pub trait BlockBodyProvider {
    fn block(&self) -> BlockBody;
}

impl<T: MemberImplementation + ?Sized> MemberImplementation for &T {
    fn member_name(&self) -> &str {
        (**self).member_name()
    }

    fn member_type(&self) -> TypeName {
        (**self).member_type()
    }

    fn modifiers(&self) -> Modifiers {
        (**self).modifiers()
    }

    fn annotations(&self) -> Vec<Annotation> {
        (**self).annotations()
    }
}

impl ParameterImplementation for [Parameter] {
    fn parameters(&self) -> Vec<Parameter> {
        self.to_vec()
    }
}

impl ParameterImplementation for Vec<Parameter> {
    fn parameters(&self) -> Vec<Parameter> {
        self.clone()
    }
}

impl<const N: usize> ParameterImplementation for [Parameter; N] {
    fn parameters(&self) -> Vec<Parameter> {
        self.to_vec()
    }
}

impl BlockBodyProvider for BlockBody {
    fn block(&self) -> BlockBody {
        self.clone()
    }
}

impl BlockBodyProvider for str {
    fn block(&self) -> BlockBody {
        BlockBody::from_source(self)
    }
}

/// A plain member description with a fluent API.
///
/// # Example
///
/// ```
/// use classforge_codegen::MemberSpec;
/// use classforge_ir::Modifier;
///
/// let field = MemberSpec::new("testField", "Foo")
///     .modifier(Modifier::Private)
///     .annotation("Marker");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpec {
    name: String,
    ty: TypeName,
    modifiers: Modifiers,
    annotations: Vec<Annotation>,
}

impl MemberSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Modifiers::new(),
            annotations: Vec::new(),
        }
    }

    /// Add one modifier.
    pub fn modifier(mut self, modifier: classforge_ir::Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Replace the modifier set.
    pub fn with_modifiers(mut self, modifiers: impl Into<Modifiers>) -> Self {
        self.modifiers = modifiers.into();
        self
    }

    /// Append an annotation.
    pub fn annotation(mut self, name: impl Into<TypeName>) -> Self {
        self.annotations.push(Annotation::new(name));
        self
    }
}

impl MemberImplementation for MemberSpec {
    fn member_name(&self) -> &str {
        &self.name
    }

    fn member_type(&self) -> TypeName {
        self.ty.clone()
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers.clone()
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }
}

#[cfg(test)]
mod tests {
    use classforge_ir::Modifier;

    use super::*;

    #[test]
    fn test_member_spec_collects_modifiers() {
        let spec = MemberSpec::new("health", "System.Int32")
            .modifier(Modifier::Static)
            .modifier(Modifier::Private);

        assert_eq!(spec.member_name(), "health");
        assert_eq!(spec.modifiers().to_string(), "private static");
    }

    #[test]
    fn test_with_modifiers_replaces_set() {
        let spec = MemberSpec::new("Tick", "void")
            .modifier(Modifier::Private)
            .with_modifiers([Modifier::Override, Modifier::Public]);

        assert_eq!(spec.modifiers().to_string(), "public override");
    }

    #[test]
    fn test_annotations_keep_order() {
        let spec = MemberSpec::new("x", "Foo").annotation("B").annotation("A");
        let names: Vec<_> = spec
            .annotations()
            .into_iter()
            .map(|a| a.name.to_string())
            .collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_str_body_splits_lines() {
        let body = "Tick();\nreturn;".block();
        assert_eq!(body.lines(), ["Tick();", "return;"]);
    }

    #[test]
    fn test_parameter_slice() {
        let params = [Parameter::new("System.String", "paramOne")];
        assert_eq!(params.parameters().len(), 1);
    }
}

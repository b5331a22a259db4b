//! The aggregate type definition model.

use indexmap::IndexSet;
use serde::Serialize;

use crate::{
    Annotation, BaseTypeRef, MemberDecl, Modifier, Modifiers, TypeName, TypeRef,
};

/// Structural description of the class being synthesized.
///
/// The model keeps every insertion in order. The only rule enforced here is
/// that at most one primary base may be set; everything else (empty names,
/// duplicate members) is either reported at render time or left to the
/// compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    modifiers: Modifiers,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_base: Option<TypeRef>,
    capabilities: Vec<TypeRef>,
    members: Vec<MemberDecl>,
}

impl TypeDefinition {
    /// Create an empty public class definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            modifiers: Modifiers::from(Modifier::Public),
            annotations: Vec::new(),
            primary_base: None,
            capabilities: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `Namespace.Name`, or just the name when no namespace is set.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn primary_base(&self) -> Option<&TypeRef> {
        self.primary_base.as_ref()
    }

    /// Capability bases in insertion order, repeats included.
    pub fn capabilities(&self) -> &[TypeRef] {
        &self.capabilities
    }

    /// Capability bases keeping only the first occurrence of each name.
    pub fn distinct_capabilities(&self) -> Vec<&TypeRef> {
        let mut seen = IndexSet::new();
        self.capabilities
            .iter()
            .filter(|cap| seen.insert(&cap.name))
            .collect()
    }

    pub fn members(&self) -> &[MemberDecl] {
        &self.members
    }

    /// All base references: the primary base first, then capabilities.
    pub fn bases(&self) -> impl Iterator<Item = BaseTypeRef> + '_ {
        self.primary_base
            .iter()
            .cloned()
            .map(BaseTypeRef::Primary)
            .chain(self.capabilities.iter().cloned().map(BaseTypeRef::Capability))
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = Some(namespace.into());
    }

    pub fn set_modifiers(&mut self, modifiers: impl Into<Modifiers>) {
        self.modifiers = modifiers.into();
    }

    pub fn push_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Record a base type.
    ///
    /// A capability is always appended. A primary base is only accepted when
    /// none is set yet; otherwise the rejected reference is handed back and
    /// the model is left unchanged.
    pub fn add_base(&mut self, base: BaseTypeRef) -> Result<(), TypeRef> {
        match base {
            BaseTypeRef::Primary(ty) => {
                if self.primary_base.is_some() {
                    return Err(ty);
                }
                self.primary_base = Some(ty);
            }
            BaseTypeRef::Capability(ty) => self.capabilities.push(ty),
        }
        Ok(())
    }

    pub fn push_member(&mut self, member: MemberDecl) {
        self.members.push(member);
    }

    /// Remove every member called `name`, returning how many were removed.
    pub fn remove_members(&mut self, name: &str) -> usize {
        let before = self.members.len();
        self.members.retain(|m| m.name != name);
        before - self.members.len()
    }

    /// Every type named anywhere in the model, in order of first appearance.
    pub fn references(&self) -> ReferenceSet {
        let mut refs = ReferenceSet::default();

        if let Some(base) = &self.primary_base {
            refs.insert(&base.name);
        }
        for cap in &self.capabilities {
            refs.insert(&cap.name);
        }
        for annotation in &self.annotations {
            refs.insert(&annotation.name);
        }
        for member in &self.members {
            refs.insert(&member.ty);
            for param in member.parameters() {
                refs.insert(&param.ty);
            }
            for annotation in &member.annotations {
                refs.insert(&annotation.name);
            }
        }

        refs
    }
}

/// Insertion-ordered set of type names the generated source depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceSet(IndexSet<TypeName>);

impl ReferenceSet {
    fn insert(&mut self, name: &TypeName) {
        if !name.is_empty() {
            self.0.insert(name.clone());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReferenceSet {
    type Item = &'a TypeName;
    type IntoIter = indexmap::set::Iter<'a, TypeName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockBody, Parameter};

    #[test]
    fn test_second_primary_base_is_rejected() {
        let mut def = TypeDefinition::new("Generated");
        def.add_base(BaseTypeRef::resolve(TypeRef::class("Engine.Component")))
            .unwrap();

        let rejected = def
            .add_base(BaseTypeRef::resolve(TypeRef::class("Engine.Other")))
            .unwrap_err();

        assert_eq!(rejected.name.as_str(), "Engine.Other");
        assert_eq!(
            def.primary_base().map(|b| b.name.as_str()),
            Some("Engine.Component")
        );
    }

    #[test]
    fn test_capabilities_keep_duplicates() {
        let mut def = TypeDefinition::new("Generated");
        for name in ["IA", "IB", "IA"] {
            def.add_base(BaseTypeRef::resolve(TypeRef::interface(name)))
                .unwrap();
        }

        assert_eq!(def.capabilities().len(), 3);
        let distinct: Vec<_> = def
            .distinct_capabilities()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(distinct, ["IA", "IB"]);
    }

    #[test]
    fn test_bases_primary_first() {
        let mut def = TypeDefinition::new("Generated");
        def.add_base(TypeRef::interface("ICap").into()).unwrap();
        def.add_base(TypeRef::class("Base").into()).unwrap();

        let bases: Vec<_> = def.bases().collect();
        assert!(bases[0].is_primary());
        assert_eq!(bases[1].type_ref().name.as_str(), "ICap");
    }

    #[test]
    fn test_references_cover_whole_model() {
        let mut def = TypeDefinition::new("Generated");
        def.add_base(TypeRef::class("Base").into()).unwrap();
        def.add_base(TypeRef::interface("ICap").into()).unwrap();
        def.push_annotation(Annotation::new("System.Serializable"));
        def.push_member(
            MemberDecl::field("testField", "Foo").annotation(Annotation::new("Marker")),
        );
        def.push_member(MemberDecl::method(
            "Run",
            "System.Void",
            vec![Parameter::new("System.Int32", "count"), Parameter::new("Foo", "other")],
            BlockBody::new(),
        ));

        let refs: Vec<_> = def.references().iter().map(|n| n.to_string()).collect();
        assert_eq!(
            refs,
            [
                "Base",
                "ICap",
                "System.Serializable",
                "Foo",
                "Marker",
                "System.Void",
                "System.Int32"
            ]
        );
    }

    #[test]
    fn test_qualified_name() {
        let mut def = TypeDefinition::new("Player");
        assert_eq!(def.qualified_name(), "Player");
        def.set_namespace("Game.Components");
        assert_eq!(def.qualified_name(), "Game.Components.Player");
    }

    #[test]
    fn test_members_preserve_insertion_order() {
        let mut def = TypeDefinition::new("Generated");
        def.push_member(MemberDecl::field("b", "B"));
        def.push_member(MemberDecl::property("a", "A"));

        let names: Vec<_> = def.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}

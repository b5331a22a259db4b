//! Discovery of marker-annotated members on generated types.
//!
//! Discovery runs against the definition model rather than a compiled
//! image: every annotation the renderer emits is kept on the model, so
//! whatever survives compilation can be found here as well.

use std::collections::HashSet;

use classforge_ir::{MemberTag, Modifier, TypeDefinition, TypeName};
use indexmap::IndexMap;
use serde::Serialize;

/// Which member kinds take part in discovery, keyed by name.
///
/// Built once and passed to callers; it is never mutated after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberKindTable {
    kinds: IndexMap<String, MemberTag>,
}

impl MemberKindTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The kinds that carry serializable state: fields and properties.
    pub fn serializable() -> Self {
        Self::new()
            .with("field", MemberTag::Field)
            .with("property", MemberTag::Property)
    }

    pub fn with(mut self, key: impl Into<String>, tag: MemberTag) -> Self {
        self.kinds.insert(key.into(), tag);
        self
    }

    /// Look up a kind by name.
    pub fn get(&self, key: &str) -> Option<MemberTag> {
        self.kinds.get(key).copied()
    }

    pub fn allows(&self, tag: MemberTag) -> bool {
        self.kinds.values().any(|t| *t == tag)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}

/// A member found by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberDescriptor {
    pub tag: MemberTag,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
    /// Qualified name of the type that declares the member.
    pub declared_in: String,
}

/// Finds members carrying a marker annotation.
pub trait MemberDiscovery {
    /// Instance members of `type_name` and its ancestors whose kind is
    /// allowed by `kinds` and whose annotations include `marker`.
    ///
    /// The type's own members come first, then each ancestor's, each group
    /// in declaration order. An unknown type yields no members.
    fn members_with(
        &self,
        type_name: &str,
        marker: &str,
        kinds: &MemberKindTable,
    ) -> Vec<MemberDescriptor>;
}

/// Discovery over a set of known type definitions.
///
/// Ancestors are followed along the primary-base chain for as long as the
/// base type is registered.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDefinition>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its qualified name, replacing any earlier
    /// definition with the same name.
    pub fn register(&mut self, definition: TypeDefinition) {
        let name = definition.qualified_name();
        tracing::debug!(type_name = %name, "registering type");
        self.types.insert(name, definition);
    }

    /// Find a definition by qualified name, falling back to its bare name
    /// when exactly one registered type carries it.
    pub fn get(&self, type_name: &str) -> Option<&TypeDefinition> {
        if let Some(def) = self.types.get(type_name) {
            return Some(def);
        }
        let mut matches = self.types.values().filter(|def| def.name() == type_name);
        let found = matches.next()?;
        if matches.next().is_some() {
            tracing::debug!(type_name, "bare type name is ambiguous");
            return None;
        }
        Some(found)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The type itself followed by its registered ancestors.
    fn lineage<'a>(&'a self, type_name: &str) -> Vec<&'a TypeDefinition> {
        let mut lineage = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.get(type_name);

        while let Some(def) = next {
            if !seen.insert(def.qualified_name()) {
                break;
            }
            lineage.push(def);
            next = def
                .primary_base()
                .and_then(|base| self.get(base.name.as_str()));
        }
        lineage
    }
}

impl MemberDiscovery for TypeRegistry {
    fn members_with(
        &self,
        type_name: &str,
        marker: &str,
        kinds: &MemberKindTable,
    ) -> Vec<MemberDescriptor> {
        self.lineage(type_name)
            .into_iter()
            .flat_map(|def| {
                let declared_in = def.qualified_name();
                def.members()
                    .iter()
                    .filter(move |m| {
                        kinds.allows(m.tag())
                            && !m.modifiers.contains(Modifier::Static)
                            && m.has_annotation(marker)
                    })
                    .map(move |m| MemberDescriptor {
                        tag: m.tag(),
                        name: m.name.clone(),
                        ty: m.ty.clone(),
                        declared_in: declared_in.clone(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use classforge_ir::{Annotation, BlockBody, MemberDecl, TypeRef};

    use super::*;

    const MARKER: &str = "Testity.Serialization.ExposeDataMemeberAttribute";

    fn registry() -> TypeRegistry {
        let mut base = TypeDefinition::new("BaseComponent");
        base.set_namespace("Game");
        base.push_member(MemberDecl::field("id", "System.Int32").annotation(Annotation::new(MARKER)));
        base.push_member(MemberDecl::field("cache", "System.Object"));

        let mut player = TypeDefinition::new("Player");
        player.set_namespace("Game");
        player
            .add_base(TypeRef::class("Game.BaseComponent").into())
            .unwrap();
        player.push_member(MemberDecl::field("health", "System.Int32").annotation(Annotation::new(MARKER)));
        player.push_member(
            MemberDecl::property("Name", "System.String")
                .annotation(Annotation::new(MARKER)),
        );
        player.push_member(
            MemberDecl::method("Heal", "System.Void", Vec::new(), BlockBody::new())
                .annotation(Annotation::new(MARKER)),
        );

        let mut registry = TypeRegistry::new();
        registry.register(base);
        registry.register(player);
        registry
    }

    #[test]
    fn test_own_members_then_ancestors() {
        let found = registry().members_with("Game.Player", MARKER, &MemberKindTable::serializable());

        let names: Vec<_> = found
            .iter()
            .map(|d| (d.declared_in.as_str(), d.name.as_str()))
            .collect();
        assert_eq!(
            names,
            [
                ("Game.Player", "health"),
                ("Game.Player", "Name"),
                ("Game.BaseComponent", "id")
            ]
        );
    }

    #[test]
    fn test_unqualified_marker_matches_short_name() {
        let found = registry().members_with(
            "Game.Player",
            "ExposeDataMemeber",
            &MemberKindTable::serializable(),
        );
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_marker_from_other_namespace_finds_nothing() {
        let found = registry().members_with(
            "Game.Player",
            "Unrelated.Vendor.ExposeDataMemeber",
            &MemberKindTable::serializable(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_static_members_are_skipped() {
        let mut def = TypeDefinition::new("Counter");
        def.push_member(
            MemberDecl::field("shared", "System.Int32")
                .modifiers([Modifier::Private, Modifier::Static])
                .annotation(Annotation::new("M")),
        );
        def.push_member(
            MemberDecl::field("own", "System.Int32")
                .modifiers(Modifier::Private)
                .annotation(Annotation::new("M")),
        );
        let mut registry = TypeRegistry::new();
        registry.register(def);

        let found = registry.members_with("Counter", "M", &MemberKindTable::serializable());
        let names: Vec<_> = found.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["own"]);
    }

    #[test]
    fn test_ambiguous_bare_name_is_not_resolved() {
        let mut first = TypeDefinition::new("Player");
        first.set_namespace("Game");
        let mut second = TypeDefinition::new("Player");
        second.set_namespace("Editor");
        let mut registry = TypeRegistry::new();
        registry.register(first);
        registry.register(second);

        assert!(registry.get("Player").is_none());
        assert_eq!(
            registry.get("Editor.Player").map(|d| d.qualified_name()),
            Some("Editor.Player".to_string())
        );
    }

    #[test]
    fn test_methods_excluded_by_serializable_table() {
        let found = registry().members_with("Player", MARKER, &MemberKindTable::serializable());
        assert!(found.iter().all(|d| d.tag != MemberTag::Method));

        let all = MemberKindTable::serializable().with("method", MemberTag::Method);
        let found = registry().members_with("Player", MARKER, &all);
        assert!(found.iter().any(|d| d.name == "Heal"));
    }

    #[test]
    fn test_unknown_type_yields_nothing() {
        assert!(registry()
            .members_with("Missing", MARKER, &MemberKindTable::serializable())
            .is_empty());
    }

    #[test]
    fn test_base_cycle_terminates() {
        let mut a = TypeDefinition::new("A");
        a.add_base(TypeRef::class("B").into()).unwrap();
        a.push_member(MemberDecl::field("x", "X").annotation(Annotation::new("M")));
        let mut b = TypeDefinition::new("B");
        b.add_base(TypeRef::class("A").into()).unwrap();

        let mut registry = TypeRegistry::new();
        registry.register(a);
        registry.register(b);

        let found = registry.members_with("A", "M", &MemberKindTable::serializable());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_table_lookup() {
        let table = MemberKindTable::serializable();
        assert_eq!(table.get("field"), Some(MemberTag::Field));
        assert_eq!(table.get("method"), None);
        assert_eq!(table.keys().collect::<Vec<_>>(), ["field", "property"]);
    }
}

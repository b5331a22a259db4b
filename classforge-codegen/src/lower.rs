//! Lowering of a parsed `class.toml` into a class builder.

use classforge_ir::{Annotation, BlockBody, Modifiers, Parameter, TypeName, TypeRef};
use classforge_manifest::{ClassManifest, MemberEntry, MemberEntryKind};

use crate::{
    backend::CompilationBackend,
    class_builder::ClassBuilder,
    error::StructuralViolation,
    provider::{BlockBodyProvider, MemberImplementation, ParameterImplementation},
};

impl MemberImplementation for MemberEntry {
    fn member_name(&self) -> &str {
        self.name.get_ref()
    }

    fn member_type(&self) -> TypeName {
        TypeName::new(self.ty.get_ref().as_str())
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers.iter().copied().collect()
    }

    fn annotations(&self) -> Vec<Annotation> {
        self.annotations
            .iter()
            .map(|a| Annotation::new(a.get_ref().as_str()))
            .collect()
    }
}

impl ParameterImplementation for MemberEntry {
    fn parameters(&self) -> Vec<Parameter> {
        self.params
            .iter()
            .map(|p| Parameter::new(p.ty.get_ref().as_str(), p.name.get_ref().as_str()))
            .collect()
    }
}

impl BlockBodyProvider for MemberEntry {
    fn block(&self) -> BlockBody {
        self.body
            .as_ref()
            .map(|body| BlockBody::from_source(body.get_ref()))
            .unwrap_or_default()
    }
}

/// Build a class from a manifest, in manifest order.
///
/// The manifest's `[builder]` settings configure the returned builder. A
/// second `kind = "class"` base is reported as a structural violation.
pub fn lower_manifest<B: CompilationBackend>(
    manifest: &ClassManifest,
    backend: B,
) -> Result<ClassBuilder<B>, StructuralViolation> {
    let mut builder =
        ClassBuilder::with_config(manifest.class_name(), backend, manifest.builder.clone());

    if let Some(ns) = &manifest.class.namespace {
        builder.set_namespace(ns.get_ref().as_str());
    }
    builder.set_modifiers(manifest.class.modifiers.iter().copied().collect::<Modifiers>());
    for annotation in &manifest.class.annotations {
        builder.add_annotation(Annotation::new(annotation.get_ref().as_str()));
    }

    for base in &manifest.bases {
        builder.add_base_type(TypeRef::new(base.ty.get_ref().as_str(), base.kind))?;
    }

    for member in &manifest.members {
        match member.kind {
            MemberEntryKind::Field => builder.add_field(member),
            MemberEntryKind::Property => builder.add_property(member),
            MemberEntryKind::Method => builder.add_method(member, member, member),
        };
    }

    tracing::debug!(
        type_name = %builder.definition().qualified_name(),
        members = builder.definition().members().len(),
        "lowered manifest"
    );
    Ok(builder)
}

//! Incremental construction and compilation of one generated class.

use std::{fmt, sync::Arc};

use classforge_ir::{
    Annotation, BaseTypeRef, MemberDecl, MemberKind, Modifiers, ReferenceSet, TypeDefinition,
    TypeRef,
};
use classforge_manifest::BuilderConfig;

use crate::{
    backend::{BackendFailure, CancelToken, CompilationBackend, CompilationUnit},
    cache::ArtifactCache,
    error::{CompileError, RenderError, StructuralViolation},
    fingerprint::Fingerprint,
    provider::{BlockBodyProvider, MemberImplementation, ParameterImplementation},
    render::{ClassRenderer, SourceRenderer},
};

/// Builds a class definition member by member and compiles it on demand.
///
/// The builder owns its model exclusively: every mutation and every
/// compilation takes `&mut self`, so concurrent use of one builder needs
/// external synchronisation while independent builders never interact.
///
/// Compiled artifacts are cached by [`Fingerprint`]. Compiling an unchanged
/// definition again returns the cached artifact without calling the backend;
/// mutating after a compile is allowed and the next compile misses.
///
/// # Example
///
/// ```
/// use classforge_codegen::{ClassBuilder, MemberSpec, testing::FakeBackend};
/// use classforge_ir::{Modifier, TypeRef};
///
/// let backend = FakeBackend::new();
/// let mut builder = ClassBuilder::new("Generated", &backend);
/// builder
///     .add_base_type(TypeRef::class("Base"))
///     .unwrap()
///     .add_field(&MemberSpec::new("testField", "Foo").modifier(Modifier::Private));
///
/// let first = builder.compile().unwrap();
/// let second = builder.compile().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(backend.invocations(), 1);
/// ```
pub struct ClassBuilder<B: CompilationBackend> {
    definition: TypeDefinition,
    config: BuilderConfig,
    renderer: SourceRenderer,
    backend: B,
    cache: ArtifactCache<B::Artifact>,
    compiled: bool,
}

impl<B: CompilationBackend> ClassBuilder<B> {
    /// Create a builder for an empty public class with default settings.
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self::with_config(name, backend, BuilderConfig::default())
    }

    pub fn with_config(name: impl Into<String>, backend: B, config: BuilderConfig) -> Self {
        Self::from_definition(TypeDefinition::new(name), backend, config)
    }

    /// Continue building an existing definition.
    pub fn from_definition(definition: TypeDefinition, backend: B, config: BuilderConfig) -> Self {
        let renderer = SourceRenderer::from(&config);
        Self {
            definition,
            config,
            renderer,
            backend,
            cache: ArtifactCache::new(),
            compiled: false,
        }
    }

    /// Add a field.
    pub fn add_field<M>(&mut self, member: &M) -> &mut Self
    where
        M: MemberImplementation + ?Sized,
    {
        self.push_member(member, MemberKind::Field)
    }

    /// Add an auto-property (`{ get; set; }`).
    pub fn add_property<M>(&mut self, member: &M) -> &mut Self
    where
        M: MemberImplementation + ?Sized,
    {
        self.push_member(member, MemberKind::Property)
    }

    /// Add a method. The member type is the return type.
    pub fn add_method<M, Body, Params>(
        &mut self,
        member: &M,
        body: &Body,
        parameters: &Params,
    ) -> &mut Self
    where
        M: MemberImplementation + ?Sized,
        Body: BlockBodyProvider + ?Sized,
        Params: ParameterImplementation + ?Sized,
    {
        let kind = MemberKind::Method {
            parameters: parameters.parameters(),
            body: body.block(),
        };
        self.push_member(member, kind)
    }

    fn push_member<M>(&mut self, member: &M, kind: MemberKind) -> &mut Self
    where
        M: MemberImplementation + ?Sized,
    {
        let decl = MemberDecl {
            name: member.member_name().to_string(),
            ty: member.member_type(),
            modifiers: member.modifiers(),
            annotations: member.annotations(),
            kind,
        };
        tracing::debug!(
            type_name = %self.definition.name(),
            member = %decl.name,
            kind = %decl.tag(),
            "adding member"
        );
        self.definition.push_member(decl);
        self
    }

    /// Add a base type.
    ///
    /// Interfaces are appended as capabilities in call order. A class becomes
    /// the primary base; adding a second class fails and leaves the
    /// definition unchanged.
    pub fn add_base_type(&mut self, ty: TypeRef) -> Result<&mut Self, StructuralViolation> {
        let base = BaseTypeRef::resolve(ty);
        tracing::debug!(
            type_name = %self.definition.name(),
            base = %base.type_ref().name,
            primary = base.is_primary(),
            "adding base type"
        );

        if let Err(rejected) = self.definition.add_base(base) {
            let existing = self
                .definition
                .primary_base()
                .map(|b| b.name.clone())
                .unwrap_or_default();
            tracing::warn!(
                type_name = %self.definition.name(),
                %existing,
                rejected = %rejected.name,
                "rejected second primary base"
            );
            return Err(StructuralViolation::DuplicateBaseType {
                type_name: self.definition.name().to_string(),
                existing,
                rejected: rejected.name,
            });
        }
        Ok(self)
    }

    /// Add a class-level annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) -> &mut Self {
        tracing::debug!(
            type_name = %self.definition.name(),
            annotation = %annotation.name,
            "adding class annotation"
        );
        self.definition.push_annotation(annotation);
        self
    }

    /// Remove every member called `name`. Returns how many were removed.
    pub fn remove_member(&mut self, name: &str) -> usize {
        let removed = self.definition.remove_members(name);
        tracing::debug!(
            type_name = %self.definition.name(),
            member = name,
            removed,
            "removing members"
        );
        removed
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.definition.set_namespace(namespace);
        self
    }

    /// Replace the class modifiers (`public` by default).
    pub fn set_modifiers(&mut self, modifiers: impl Into<Modifiers>) -> &mut Self {
        self.definition.set_modifiers(modifiers);
        self
    }

    /// Render the current definition to source text.
    pub fn render(&self) -> Result<String, RenderError> {
        self.renderer.render_definition(&self.definition)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.definition, &self.renderer)
    }

    /// Every type the generated source refers to.
    pub fn references(&self) -> ReferenceSet {
        self.definition.references()
    }

    /// Compile the current definition.
    pub fn compile(&mut self) -> Result<Arc<B::Artifact>, CompileError> {
        self.compile_with(&CancelToken::new())
    }

    /// Compile the current definition, giving up when `cancel` is triggered.
    ///
    /// Cancellation observed before or after the backend call yields
    /// [`CompileError::Cancelled`]; nothing is cached for a cancelled or
    /// failed compilation.
    pub fn compile_with(&mut self, cancel: &CancelToken) -> Result<Arc<B::Artifact>, CompileError> {
        let type_name = self.definition.qualified_name();
        if cancel.is_cancelled() {
            return Err(CompileError::Cancelled { type_name });
        }

        let source = self.render()?;
        let fingerprint = self.fingerprint();

        if self.config.cache
            && let Some(artifact) = self.cache.get(&fingerprint)
        {
            tracing::info!(%type_name, fingerprint = %fingerprint.short(), "cache hit");
            return Ok(artifact);
        }

        let references = self.references();
        let unit = CompilationUnit {
            type_name: &type_name,
            source: &source,
            references: &references,
            cancel,
        };
        tracing::info!(
            %type_name,
            fingerprint = %fingerprint.short(),
            backend = self.backend.name(),
            references = references.len(),
            "cache miss, invoking backend"
        );

        let result = self.backend.compile(&unit);

        if cancel.is_cancelled() {
            tracing::warn!(%type_name, "compilation cancelled");
            return Err(CompileError::Cancelled { type_name });
        }

        match result {
            Ok(artifact) => {
                self.compiled = true;
                if self.config.cache {
                    Ok(self.cache.insert(fingerprint, artifact))
                } else {
                    Ok(Arc::new(artifact))
                }
            }
            Err(BackendFailure::Diagnostics(diagnostics)) => {
                tracing::warn!(
                    %type_name,
                    diagnostics = diagnostics.len(),
                    "compilation failed"
                );
                Err(CompileError::Compilation {
                    type_name,
                    diagnostics,
                })
            }
            Err(BackendFailure::Cancelled) => {
                tracing::warn!(%type_name, "compilation cancelled by backend");
                Err(CompileError::Cancelled { type_name })
            }
            Err(BackendFailure::Unavailable(reason)) => {
                tracing::warn!(%type_name, %reason, "backend unavailable");
                Err(CompileError::BackendUnavailable {
                    backend: self.backend.name().to_string(),
                    reason,
                })
            }
        }
    }

    /// Whether any compilation has succeeded.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Number of artifacts held in the cache.
    pub fn cached_artifacts(&self) -> usize {
        self.cache.len()
    }

    pub fn definition(&self) -> &TypeDefinition {
        &self.definition
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: CompilationBackend> fmt::Debug for ClassBuilder<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBuilder")
            .field("definition", &self.definition)
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .field("cached_artifacts", &self.cache.len())
            .field("compiled", &self.compiled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use classforge_ir::{Modifier, Parameter};

    use super::*;
    use crate::{provider::MemberSpec, testing::FakeBackend};

    #[test]
    fn test_duplicate_primary_base_leaves_model_unchanged() {
        let backend = FakeBackend::new();
        let mut builder = ClassBuilder::new("Generated", &backend);
        builder.add_base_type(TypeRef::class("Base")).unwrap();
        let before = builder.definition().clone();

        let err = builder.add_base_type(TypeRef::class("Other")).unwrap_err();

        assert_eq!(
            err,
            StructuralViolation::DuplicateBaseType {
                type_name: "Generated".into(),
                existing: "Base".into(),
                rejected: "Other".into(),
            }
        );
        assert_eq!(builder.definition(), &before);
    }

    #[test]
    fn test_add_method_collects_parts() {
        let backend = FakeBackend::new();
        let mut builder = ClassBuilder::new("Generated", &backend);
        builder.add_method(
            &MemberSpec::new("Run", "System.Void").modifier(Modifier::Public),
            "Tick();",
            &[Parameter::new("System.Int32", "count")],
        );

        let member = &builder.definition().members()[0];
        assert_eq!(member.parameters().len(), 1);
        assert!(matches!(&member.kind, MemberKind::Method { body, .. } if body.lines() == ["Tick();"]));
    }

    #[test]
    fn test_render_error_does_not_reach_backend() {
        let backend = FakeBackend::new();
        let mut builder = ClassBuilder::new("Generated", &backend);
        builder.add_field(&MemberSpec::new("", "Foo"));

        let err = builder.compile().unwrap_err();
        assert!(matches!(
            err,
            CompileError::Render(RenderError::MissingMemberName { index: 0, .. })
        ));
        assert_eq!(backend.invocations(), 0);
        assert!(!builder.is_compiled());

        assert_eq!(builder.remove_member(""), 1);
        builder.add_field(&MemberSpec::new("value", "Foo"));
        let artifact = builder.compile().unwrap();
        assert!(artifact.source.contains("Foo value;"));
        assert_eq!(backend.invocations(), 1);
        assert!(builder.is_compiled());
    }

    #[test]
    fn test_cache_disabled_always_invokes_backend() {
        let backend = FakeBackend::new();
        let mut builder = ClassBuilder::with_config(
            "Generated",
            &backend,
            BuilderConfig::default().without_cache(),
        );
        builder.compile().unwrap();
        builder.compile().unwrap();

        assert_eq!(backend.invocations(), 2);
        assert_eq!(builder.cached_artifacts(), 0);
    }
}

//! Deterministic source rendering of a [`TypeDefinition`].
//!
//! Rendering is a pure function of the model and the renderer settings:
//! identical models always produce identical text. The renderer never
//! reorders, deduplicates (beyond the configured capability policy) or
//! checks semantics; that is left to the compiler.

use classforge_ir::{Annotation, MemberDecl, MemberKind, Modifiers, TypeDefinition, TypeRef};
use classforge_manifest::{BuilderConfig, CapabilityPolicy};

use crate::{
    builder::{CodeBuilder, CodeFragment, Indent},
    error::RenderError,
};

/// Turns a type definition into source text.
pub trait ClassRenderer {
    /// Render the whole definition, failing on incomplete data.
    fn render_definition(&self, def: &TypeDefinition) -> Result<String, RenderError>;

    /// `<modifiers> class <Name>[ : <bases>]`
    fn render_header(&self, def: &TypeDefinition) -> String;

    /// Annotations, declaration line and, for methods, the body block.
    fn render_member(&self, member: &MemberDecl) -> Vec<CodeFragment>;

    /// `[Name]`
    fn render_annotation(&self, annotation: &Annotation) -> String {
        format!("[{}]", annotation.name)
    }

    /// Space-joined modifiers in canonical order, empty for an empty set.
    fn render_modifiers(&self, modifiers: &Modifiers) -> String {
        modifiers.to_string()
    }
}

/// C#-flavoured renderer.
///
/// ```
/// use classforge_codegen::{ClassRenderer, SourceRenderer};
/// use classforge_ir::{TypeDefinition, TypeRef};
///
/// let mut def = TypeDefinition::new("Generated");
/// def.add_base(TypeRef::class("Base").into()).unwrap();
///
/// let source = SourceRenderer::default().render_definition(&def).unwrap();
/// assert_eq!(source, "public class Generated : Base\n{\n}\n");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceRenderer {
    indent: Indent,
    capabilities: CapabilityPolicy,
}

impl SourceRenderer {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent,
            capabilities: CapabilityPolicy::default(),
        }
    }

    /// Set the policy for repeated capability bases.
    pub fn with_capabilities(mut self, policy: CapabilityPolicy) -> Self {
        self.capabilities = policy;
        self
    }

    pub fn indent(&self) -> Indent {
        self.indent
    }

    pub fn capability_policy(&self) -> CapabilityPolicy {
        self.capabilities
    }

    fn capabilities<'a>(&self, def: &'a TypeDefinition) -> Vec<&'a TypeRef> {
        match self.capabilities {
            CapabilityPolicy::PassThrough => def.capabilities().iter().collect(),
            CapabilityPolicy::Deduplicate => def.distinct_capabilities(),
        }
    }

    fn class_fragments(&self, def: &TypeDefinition) -> Vec<CodeFragment> {
        let mut fragments: Vec<CodeFragment> = def
            .annotations()
            .iter()
            .map(|a| CodeFragment::line(self.render_annotation(a)))
            .collect();
        fragments.push(CodeFragment::line(self.render_header(def)));

        let mut body = Vec::new();
        for (i, member) in def.members().iter().enumerate() {
            if i > 0 {
                body.push(CodeFragment::blank());
            }
            body.extend(self.render_member(member));
        }
        fragments.push(CodeFragment::braced(body));
        fragments
    }
}

impl From<&BuilderConfig> for SourceRenderer {
    fn from(config: &BuilderConfig) -> Self {
        Self::new(config.indent.into()).with_capabilities(config.capabilities)
    }
}

impl ClassRenderer for SourceRenderer {
    fn render_definition(&self, def: &TypeDefinition) -> Result<String, RenderError> {
        check_complete(def)?;

        let class = self.class_fragments(def);
        let fragments = match def.namespace().filter(|ns| !ns.is_empty()) {
            Some(ns) => vec![
                CodeFragment::line(format!("namespace {}", ns)),
                CodeFragment::braced(class),
            ],
            None => class,
        };

        let mut builder = CodeBuilder::new(self.indent);
        builder.emit(&fragments);
        Ok(builder.build())
    }

    fn render_header(&self, def: &TypeDefinition) -> String {
        let bases: Vec<&str> = def
            .primary_base()
            .into_iter()
            .chain(self.capabilities(def))
            .map(|ty| ty.name.as_str())
            .collect();

        let mut header = join_words([
            self.render_modifiers(def.modifiers()).as_str(),
            "class",
            def.name(),
        ]);
        if !bases.is_empty() {
            header.push_str(" : ");
            header.push_str(&bases.join(", "));
        }
        header
    }

    fn render_member(&self, member: &MemberDecl) -> Vec<CodeFragment> {
        let mut fragments: Vec<CodeFragment> = member
            .annotations
            .iter()
            .map(|a| CodeFragment::line(self.render_annotation(a)))
            .collect();

        let modifiers = self.render_modifiers(&member.modifiers);
        let declaration = join_words([modifiers.as_str(), member.ty.as_str(), member.name.as_str()]);

        match &member.kind {
            MemberKind::Field => fragments.push(CodeFragment::line(format!("{};", declaration))),
            MemberKind::Property => {
                fragments.push(CodeFragment::line(format!("{} {{ get; set; }}", declaration)))
            }
            MemberKind::Method { parameters, body } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|p| format!("{} {}", p.ty, p.name))
                    .collect();
                fragments.push(CodeFragment::line(format!(
                    "{}({})",
                    declaration,
                    params.join(", ")
                )));
                fragments.push(CodeFragment::braced(
                    body.lines()
                        .iter()
                        .map(|line| {
                            if line.trim().is_empty() {
                                CodeFragment::blank()
                            } else {
                                CodeFragment::line(line.as_str())
                            }
                        })
                        .collect(),
                ));
            }
        }

        fragments
    }
}

/// Join the non-empty words with single spaces.
fn join_words<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    words
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Report the first piece of missing data, walking the model in render order.
fn check_complete(def: &TypeDefinition) -> Result<(), RenderError> {
    let type_name = def.name();
    if type_name.trim().is_empty() {
        return Err(RenderError::MissingClassName);
    }

    let class_owner = || format!("class '{}'", type_name);
    check_annotations(def.annotations(), class_owner)?;

    for base in def.bases() {
        if base.type_ref().name.is_empty() {
            return Err(RenderError::MissingTypeName {
                owner: format!("a base type of '{}'", type_name),
            });
        }
    }

    for (index, member) in def.members().iter().enumerate() {
        if member.name.trim().is_empty() {
            return Err(RenderError::MissingMemberName {
                type_name: type_name.to_string(),
                index,
            });
        }
        let owner = || format!("{} '{}'", member.tag(), member.name);
        if member.ty.is_empty() {
            return Err(RenderError::MissingTypeName { owner: owner() });
        }
        check_annotations(&member.annotations, owner)?;

        for (index, param) in member.parameters().iter().enumerate() {
            if param.name.trim().is_empty() {
                return Err(RenderError::MissingParameterName {
                    member: member.name.clone(),
                    index,
                });
            }
            if param.ty.is_empty() {
                return Err(RenderError::MissingTypeName {
                    owner: format!("parameter '{}' of '{}'", param.name, member.name),
                });
            }
        }
    }

    Ok(())
}

fn check_annotations(
    annotations: &[Annotation],
    owner: impl Fn() -> String,
) -> Result<(), RenderError> {
    if annotations.iter().any(|a| a.name.is_empty()) {
        return Err(RenderError::MissingAnnotationName { owner: owner() });
    }
    Ok(())
}

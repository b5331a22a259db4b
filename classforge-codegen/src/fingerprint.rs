//! Structural fingerprints of type definitions.
//!
//! Two definitions that render to the same source under the same settings
//! share a fingerprint. The encoding is tagged and length-prefixed, so no
//! two distinct models collide by concatenation.

use std::fmt;

use classforge_ir::{Annotation, MemberDecl, MemberKind, Modifiers, TypeDefinition, TypeRef};
use sha2::{Digest, Sha256};

use crate::{builder::Indent, render::SourceRenderer};

/// SHA-256 over the structural encoding of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint a definition as the given renderer would render it.
    pub fn of(def: &TypeDefinition, renderer: &SourceRenderer) -> Self {
        let mut hasher = Sha256::new();

        write_tag(&mut hasher, 0x01);
        match renderer.indent() {
            Indent::Spaces(n) => {
                write_tag(&mut hasher, 0x02);
                write_tag(&mut hasher, n);
            }
            Indent::Tab => write_tag(&mut hasher, 0x03),
        }
        write_str(&mut hasher, renderer.capability_policy().as_str());

        write_tag(&mut hasher, 0x10);
        write_str(&mut hasher, def.name());
        write_opt_str(&mut hasher, def.namespace());
        write_modifiers(&mut hasher, def.modifiers());
        write_annotations(&mut hasher, def.annotations());

        write_tag(&mut hasher, 0x20);
        match def.primary_base() {
            Some(base) => {
                write_tag(&mut hasher, 1);
                write_type_ref(&mut hasher, base);
            }
            None => write_tag(&mut hasher, 0),
        }
        write_len(&mut hasher, def.capabilities().len());
        for cap in def.capabilities() {
            write_type_ref(&mut hasher, cap);
        }

        write_tag(&mut hasher, 0x30);
        write_len(&mut hasher, def.members().len());
        for member in def.members() {
            write_member(&mut hasher, member);
        }

        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.to_string()[..8].to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

fn write_member(hasher: &mut Sha256, member: &MemberDecl) {
    match &member.kind {
        MemberKind::Field => write_tag(hasher, 0x31),
        MemberKind::Property => write_tag(hasher, 0x32),
        MemberKind::Method { .. } => write_tag(hasher, 0x33),
    }
    write_str(hasher, &member.name);
    write_str(hasher, member.ty.as_str());
    write_modifiers(hasher, &member.modifiers);
    write_annotations(hasher, &member.annotations);

    if let MemberKind::Method { parameters, body } = &member.kind {
        write_len(hasher, parameters.len());
        for param in parameters {
            write_str(hasher, param.ty.as_str());
            write_str(hasher, &param.name);
        }
        write_len(hasher, body.lines().len());
        for line in body.lines() {
            write_str(hasher, line);
        }
    }
}

fn write_type_ref(hasher: &mut Sha256, ty: &TypeRef) {
    write_str(hasher, ty.name.as_str());
    write_str(hasher, ty.declaration.as_str());
}

fn write_modifiers(hasher: &mut Sha256, modifiers: &Modifiers) {
    write_len(hasher, modifiers.len());
    for modifier in modifiers.iter() {
        write_str(hasher, modifier.keyword());
    }
}

fn write_annotations(hasher: &mut Sha256, annotations: &[Annotation]) {
    write_len(hasher, annotations.len());
    for annotation in annotations {
        write_str(hasher, annotation.name.as_str());
    }
}

fn write_tag(hasher: &mut Sha256, tag: u8) {
    hasher.update([tag]);
}

fn write_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_be_bytes());
}

fn write_str(hasher: &mut Sha256, s: &str) {
    write_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

fn write_opt_str(hasher: &mut Sha256, s: Option<&str>) {
    match s {
        Some(s) => {
            write_tag(hasher, 1);
            write_str(hasher, s);
        }
        None => write_tag(hasher, 0),
    }
}

#[cfg(test)]
mod tests {
    use classforge_ir::{BlockBody, Modifier, Parameter};
    use classforge_manifest::CapabilityPolicy;

    use super::*;

    fn sample() -> TypeDefinition {
        let mut def = TypeDefinition::new("Generated");
        def.add_base(TypeRef::class("Base").into()).unwrap();
        def.push_member(MemberDecl::field("a", "A").modifiers(Modifier::Private));
        def.push_member(MemberDecl::method(
            "Run",
            "System.Void",
            vec![Parameter::new("System.Int32", "n")],
            BlockBody::from_lines(["Tick();"]),
        ));
        def
    }

    #[test]
    fn test_equal_models_share_fingerprint() {
        let renderer = SourceRenderer::default();
        assert_eq!(
            Fingerprint::of(&sample(), &renderer),
            Fingerprint::of(&sample(), &renderer)
        );
    }

    #[test]
    fn test_any_mutation_changes_fingerprint() {
        let renderer = SourceRenderer::default();
        let before = Fingerprint::of(&sample(), &renderer);

        let mut def = sample();
        def.push_member(MemberDecl::property("b", "B"));
        assert_ne!(before, Fingerprint::of(&def, &renderer));

        let mut def = sample();
        def.push_annotation(Annotation::new("Marker"));
        assert_ne!(before, Fingerprint::of(&def, &renderer));
    }

    #[test]
    fn test_names_do_not_collide_by_concatenation() {
        let renderer = SourceRenderer::default();
        let mut a = TypeDefinition::new("Generated");
        a.push_member(MemberDecl::field("ab", "C"));
        let mut b = TypeDefinition::new("Generated");
        b.push_member(MemberDecl::field("a", "bC"));
        assert_ne!(Fingerprint::of(&a, &renderer), Fingerprint::of(&b, &renderer));
    }

    #[test]
    fn test_renderer_settings_are_part_of_fingerprint() {
        let def = sample();
        let spaces = SourceRenderer::default();
        let tabs = SourceRenderer::new(Indent::Tab);
        let dedup = SourceRenderer::default().with_capabilities(CapabilityPolicy::Deduplicate);

        assert_ne!(Fingerprint::of(&def, &spaces), Fingerprint::of(&def, &tabs));
        assert_ne!(Fingerprint::of(&def, &spaces), Fingerprint::of(&def, &dedup));
    }

    #[test]
    fn test_display_is_hex() {
        let fp = Fingerprint::of(&sample(), &SourceRenderer::default());
        let hex = fp.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp.short(), hex[..8]);
    }
}

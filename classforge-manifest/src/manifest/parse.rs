//! Manifest parsing from files and strings.

use std::{path::Path, str::FromStr};

use super::{ClassManifest, validate::ParseContext};
use crate::{Error, Result, error::SourceContext};

impl FromStr for ClassManifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "class.toml")
    }
}

impl ClassManifest {
    /// Parse a class.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a class.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<ClassManifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: ClassManifest =
        toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, content, filename)?;
    Ok(manifest)
}

/// Validate the manifest after parsing.
fn validate_manifest(manifest: &ClassManifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);

    ctx.validate_name(&manifest.class.name, "class")?;
    if let Some(ns) = &manifest.class.namespace {
        ctx.validate_type_name(ns, "namespace")?;
    }
    for annotation in &manifest.class.annotations {
        ctx.validate_type_name(annotation, "annotation")?;
    }

    for base in &manifest.bases {
        ctx.validate_type_name(&base.ty, "base")?;
    }

    let class_ctx = ctx.push(manifest.class_name());
    for member in &manifest.members {
        let kind = member.kind.as_str();
        class_ctx.validate_name(&member.name, kind)?;
        class_ctx.validate_type_name(&member.ty, kind)?;

        let member_ctx = class_ctx.push(member.name.get_ref());
        for annotation in &member.annotations {
            member_ctx.validate_type_name(annotation, "annotation")?;
        }

        if !member.is_method() {
            if let Some(param) = member.params.first() {
                return Err(ctx.source_context().validation_error_at(
                    format!("{} '{}' cannot take parameters", kind, member.name.get_ref()),
                    param.name.span(),
                ));
            }
            if let Some(body) = &member.body {
                return Err(ctx.source_context().validation_error_at(
                    format!("{} '{}' cannot have a body", kind, member.name.get_ref()),
                    body.span(),
                ));
            }
        }

        for param in &member.params {
            member_ctx.validate_name(&param.name, "parameter")?;
            member_ctx.validate_type_name(&param.ty, "parameter")?;
        }
    }

    Ok(())
}

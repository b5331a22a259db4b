//! Error types for building, rendering and compiling generated classes.

use classforge_ir::TypeName;
use thiserror::Error;

use crate::backend::Diagnostic;

/// A mutation that would break a model invariant.
///
/// Returned by the mutating call itself; the model is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum StructuralViolation {
    #[error("'{type_name}' already extends '{existing}', cannot also extend '{rejected}'")]
    #[diagnostic(
        code(classforge::duplicate_base),
        help("a generated type has at most one class base; '{rejected}' can only be added as an interface")
    )]
    DuplicateBaseType {
        type_name: String,
        existing: TypeName,
        rejected: TypeName,
    },
}

/// Incomplete model data found while rendering.
///
/// The model stays valid for further mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum RenderError {
    #[error("generated type has no name")]
    #[diagnostic(code(classforge::render::class_name))]
    MissingClassName,

    #[error("member #{index} of '{type_name}' has no name")]
    #[diagnostic(code(classforge::render::member_name))]
    MissingMemberName { type_name: String, index: usize },

    #[error("{owner} has an empty type name")]
    #[diagnostic(code(classforge::render::type_name))]
    MissingTypeName { owner: String },

    #[error("parameter #{index} of '{member}' has no name")]
    #[diagnostic(code(classforge::render::parameter_name))]
    MissingParameterName { member: String, index: usize },

    #[error("annotation on {owner} has no name")]
    #[diagnostic(code(classforge::render::annotation_name))]
    MissingAnnotationName { owner: String },
}

/// Failure of [`ClassBuilder::compile`](crate::ClassBuilder::compile).
#[derive(Debug, Clone, Error, miette::Diagnostic)]
pub enum CompileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] RenderError),

    #[error("compilation of '{type_name}' failed with {} diagnostic(s)", .diagnostics.len())]
    #[diagnostic(code(classforge::compile::failed))]
    Compilation {
        type_name: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("compilation of '{type_name}' was cancelled")]
    #[diagnostic(code(classforge::compile::cancelled))]
    Cancelled { type_name: String },

    #[error("compilation backend '{backend}' is unavailable: {reason}")]
    #[diagnostic(
        code(classforge::compile::unavailable),
        help("check the [backend] program in the class description")
    )]
    BackendUnavailable { backend: String, reason: String },
}

impl CompileError {
    /// Backend diagnostics, empty unless compilation itself failed.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Compilation { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompileError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_base_message() {
        let err = StructuralViolation::DuplicateBaseType {
            type_name: "Player".into(),
            existing: "Engine.Component".into(),
            rejected: "Engine.Other".into(),
        };
        assert_eq!(
            err.to_string(),
            "'Player' already extends 'Engine.Component', cannot also extend 'Engine.Other'"
        );
    }

    #[test]
    fn test_compilation_message_counts_diagnostics() {
        let err = CompileError::Compilation {
            type_name: "Player".into(),
            diagnostics: vec![Diagnostic::error("a"), Diagnostic::error("b")],
        };
        assert_eq!(
            err.to_string(),
            "compilation of 'Player' failed with 2 diagnostic(s)"
        );
        assert_eq!(err.diagnostics().len(), 2);
    }

    #[test]
    fn test_render_error_is_transparent() {
        let err = CompileError::from(RenderError::MissingClassName);
        assert_eq!(err.to_string(), "generated type has no name");
        assert!(err.diagnostics().is_empty());
    }
}

//! Class synthesis for classforge.
//!
//! This crate turns a [`TypeDefinition`](classforge_ir::TypeDefinition) into
//! source text and hands it to a pluggable compiler, caching the results.
//!
//! # Module Organization
//!
//! - [`builder`] - Code generation building blocks (CodeBuilder, CodeFragment, Indent)
//! - [`render`] - Deterministic rendering of type definitions
//! - [`class_builder`] - The stateful [`ClassBuilder`] orchestrating render and compile
//! - [`backend`] - Compilation backend interface and the process backend
//! - [`discovery`] - Marker-annotated member discovery
//! - [`lower`] - Building classes from `class.toml` manifests
//! - [`testing`] - Test utilities (feature-gated)

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod backend;
pub mod builder;
mod cache;
pub mod class_builder;
pub mod discovery;
mod error;
mod fingerprint;
pub mod lower;
mod provider;
pub mod render;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{
    BackendFailure, CancelToken, CompilationBackend, CompilationUnit, CompiledAssembly,
    Diagnostic, ProcessBackend, Severity,
};
pub use cache::ArtifactCache;
pub use class_builder::ClassBuilder;
pub use discovery::{MemberDescriptor, MemberDiscovery, MemberKindTable, TypeRegistry};
pub use error::{CompileError, RenderError, StructuralViolation};
pub use fingerprint::Fingerprint;
pub use lower::lower_manifest;
pub use provider::{BlockBodyProvider, MemberImplementation, MemberSpec, ParameterImplementation};
pub use render::{ClassRenderer, SourceRenderer};

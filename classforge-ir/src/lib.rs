//! Type definition model for the classforge class synthesizer.
//!
//! This crate holds the structural description of a class that is generated
//! at run time: its bases, its members and their modifiers and annotations.
//! It carries no rendering or compilation logic.
//!
//! # Architecture
//!
//! ```text
//! class.toml → classforge-manifest → ClassBuilder (mutates TypeDefinition) → source → backend
//! ```
//!
//! The model types are designed to be:
//! - Language-agnostic data (rendering lives in `classforge-codegen`)
//! - Append-only: members and bases are recorded in insertion order
//! - Self-checking: the "one primary base" rule is enforced here

mod definition;
mod member;
mod modifier;
mod types;

pub use definition::{ReferenceSet, TypeDefinition};
pub use member::{Annotation, BlockBody, MemberDecl, MemberKind, MemberTag, Parameter};
pub use modifier::{Modifier, Modifiers, UnknownModifier};
pub use types::{BaseTypeRef, Declaration, TypeName, TypeRef};

//! Compilation backends.
//!
//! A backend turns rendered source into a loadable type. The builder treats
//! it as an opaque, synchronous collaborator: it never assumes the backend
//! caches anything and never hands it ownership of builder state.
//!
//! - [`CompilationBackend`] - The backend interface
//! - [`ProcessBackend`] - Runs an external compiler in a temporary directory
//! - [`Diagnostic`] - Messages reported by a backend

mod diagnostic;
mod process;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use classforge_ir::ReferenceSet;
pub use diagnostic::{Diagnostic, Severity};
pub use process::{CompiledAssembly, ProcessBackend};

/// Everything a backend needs to compile one generated type.
#[derive(Debug, Clone, Copy)]
pub struct CompilationUnit<'a> {
    /// Qualified name of the generated type.
    pub type_name: &'a str,
    /// Rendered source text.
    pub source: &'a str,
    /// Every type the source refers to.
    pub references: &'a ReferenceSet,
    /// Cooperative cancellation flag; long-running backends should poll it.
    pub cancel: &'a CancelToken,
}

/// Why a backend did not produce an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendFailure {
    /// The compiler ran and rejected the source.
    Diagnostics(Vec<Diagnostic>),
    /// The compilation was cancelled through the unit's token.
    Cancelled,
    /// The compiler could not be run at all.
    Unavailable(String),
}

/// Converts source text into a loadable type.
///
/// Implement this trait to plug in a compiler toolchain, or a deterministic
/// fake for tests.
pub trait CompilationBackend {
    /// Handle to a compiled type.
    type Artifact;

    /// Backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Compile one unit.
    fn compile(&self, unit: &CompilationUnit<'_>) -> Result<Self::Artifact, BackendFailure>;
}

/// Blanket implementation so callers can lend a backend to a builder.
impl<T: CompilationBackend + ?Sized> CompilationBackend for &T {
    type Artifact = T::Artifact;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(&self, unit: &CompilationUnit<'_>) -> Result<Self::Artifact, BackendFailure> {
        (**self).compile(unit)
    }
}

/// Shared cancellation flag for an in-flight compilation.
///
/// Clones observe the same flag, so one clone can be handed to another
/// thread and cancelled from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());

        other.cancel();
        assert!(token.is_cancelled());
    }
}

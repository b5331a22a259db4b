//! Test utilities for class builders.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{
    collections::VecDeque,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::backend::{BackendFailure, CompilationBackend, CompilationUnit, Diagnostic};

/// What a [`FakeBackend`] does on one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Produce an artifact.
    Succeed,
    /// Report the given diagnostics.
    Fail(Vec<Diagnostic>),
    /// Report that the compiler cannot be run.
    Unavailable(String),
    /// Trigger the unit's cancel token, then produce an artifact anyway.
    CancelDuring,
}

/// Artifact produced by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeArtifact {
    /// 1-based invocation number that produced this artifact.
    pub serial: usize,
    pub type_name: String,
    pub source: String,
    pub references: Vec<String>,
}

/// Deterministic in-process backend.
///
/// Outcomes are scripted in order; once the script is exhausted every call
/// succeeds. Every invocation is counted and its source recorded.
///
/// # Example
///
/// ```ignore
/// let backend = FakeBackend::new().then(Outcome::Fail(vec![Diagnostic::error("boom")]));
/// let mut builder = ClassBuilder::new("Generated", &backend);
/// assert!(builder.compile().is_err());
/// assert!(builder.compile().is_ok());
/// assert_eq!(backend.invocations(), 2);
/// ```
#[derive(Debug, Default)]
pub struct FakeBackend {
    script: Mutex<VecDeque<Outcome>>,
    sources: Mutex<Vec<String>>,
    invocations: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unscripted invocation.
    pub fn then(self, outcome: Outcome) -> Self {
        lock(&self.script).push_back(outcome);
        self
    }

    /// Number of times `compile` was called.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Source text of every invocation, in call order.
    pub fn sources(&self) -> Vec<String> {
        lock(&self.sources).clone()
    }

    pub fn last_source(&self) -> Option<String> {
        lock(&self.sources).last().cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CompilationBackend for FakeBackend {
    type Artifact = FakeArtifact;

    fn name(&self) -> &str {
        "fake"
    }

    fn compile(&self, unit: &CompilationUnit<'_>) -> Result<FakeArtifact, BackendFailure> {
        let serial = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.sources).push(unit.source.to_string());

        let outcome = lock(&self.script).pop_front().unwrap_or(Outcome::Succeed);
        match outcome {
            Outcome::Succeed => {}
            Outcome::Fail(diagnostics) => return Err(BackendFailure::Diagnostics(diagnostics)),
            Outcome::Unavailable(reason) => return Err(BackendFailure::Unavailable(reason)),
            Outcome::CancelDuring => unit.cancel.cancel(),
        }

        Ok(FakeArtifact {
            serial,
            type_name: unit.type_name.to_string(),
            source: unit.source.to_string(),
            references: unit.references.iter().map(|r| r.to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use classforge_ir::ReferenceSet;

    use super::*;
    use crate::backend::CancelToken;

    #[test]
    fn test_script_then_default_success() {
        let backend = FakeBackend::new().then(Outcome::Unavailable("offline".into()));
        let refs = ReferenceSet::default();
        let cancel = CancelToken::new();
        let unit = CompilationUnit {
            type_name: "Generated",
            source: "class Generated {}",
            references: &refs,
            cancel: &cancel,
        };

        assert_eq!(
            backend.compile(&unit),
            Err(BackendFailure::Unavailable("offline".into()))
        );
        assert_eq!(backend.compile(&unit).map(|a| a.serial), Ok(2));
        assert_eq!(backend.sources().len(), 2);
    }
}

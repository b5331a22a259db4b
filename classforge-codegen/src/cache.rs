//! Compiled artifacts keyed by definition fingerprint.

use std::{collections::HashMap, sync::Arc};

use crate::fingerprint::Fingerprint;

/// In-memory cache of compiled artifacts.
///
/// Only successful compilations are stored. Artifacts are shared through
/// [`Arc`] so a cache hit hands out the same instance every time.
#[derive(Debug)]
pub struct ArtifactCache<A> {
    entries: HashMap<Fingerprint, Arc<A>>,
}

impl<A> ArtifactCache<A> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<Arc<A>> {
        self.entries.get(fingerprint).cloned()
    }

    /// Store an artifact and return the shared handle.
    pub fn insert(&mut self, fingerprint: Fingerprint, artifact: A) -> Arc<A> {
        let artifact = Arc::new(artifact);
        self.entries.insert(fingerprint, Arc::clone(&artifact));
        artifact
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> Default for ArtifactCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use classforge_ir::TypeDefinition;

    use super::*;
    use crate::render::SourceRenderer;

    #[test]
    fn test_hit_returns_same_instance() {
        let fp = Fingerprint::of(&TypeDefinition::new("A"), &SourceRenderer::default());
        let mut cache = ArtifactCache::new();
        let stored = cache.insert(fp, "artifact".to_string());

        let hit = cache.get(&fp).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_miss() {
        let renderer = SourceRenderer::default();
        let mut cache = ArtifactCache::new();
        cache.insert(Fingerprint::of(&TypeDefinition::new("A"), &renderer), 1u32);

        assert!(cache
            .get(&Fingerprint::of(&TypeDefinition::new("B"), &renderer))
            .is_none());
    }
}

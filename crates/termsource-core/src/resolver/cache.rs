//! Memoizing wrapper around a [`Resolver`].
//!
//! Answers (found and not-found) are kept in a [`DashMap`] keyed by the
//! whitespace-collapsed reference, so repeated citations of the same document
//! across a dictionary hit the underlying registry once. Errors are never
//! cached: a transient failure is retried on the next call.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{ResolveError, ResolvedSource, Resolver, registry_key};

pub struct CachedResolver<R> {
    inner: R,
    entries: DashMap<String, Option<ResolvedSource>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl<R: Resolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<R: Resolver> Resolver for CachedResolver<R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn resolve(&self, reference: &str) -> Result<Option<ResolvedSource>, ResolveError> {
        let key = registry_key(reference);
        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(resolver = self.inner.name(), reference, "resolver cache hit");
            return Ok(entry.value().clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(resolver = self.inner.name(), reference, "resolver cache miss");
        let answer = self.inner.resolve(reference)?;
        self.entries.insert(key, answer.clone());
        Ok(answer)
    }
}

// ABOUTME: Bounded read-through entity cache keyed by (table, id)
// ABOUTME: Optional layer; invalidated on writes, no extra concurrency guarantees
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Larder

use std::any::Any;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use lru::LruCache;

use crate::entity::Entity;
use crate::schema::EntityKind;

type CacheKey = (&'static str, i64);
type CachedEntity = Arc<dyn Any + Send + Sync>;

/// Bounded LRU of entities by surrogate id.
///
/// Read-through memoization only: correctness of the persistence layer does
/// not depend on it, and it offers no guarantees beyond what a logically
/// single-threaded caller implies.
#[derive(Clone)]
pub struct EntityCache {
    inner: Arc<Mutex<LruCache<CacheKey, CachedEntity>>>,
}

impl EntityCache {
    /// Cache bounded to `capacity` entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("non-zero after max");
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Cached entity by id, if present
    #[must_use]
    pub fn get<M: EntityKind>(&self, id: i64) -> Option<Entity<M>> {
        let mut cache = self.lock();
        cache
            .get(&(M::TABLE, id))
            .and_then(|cached| Arc::clone(cached).downcast::<Entity<M>>().ok())
            .map(|arc| (*arc).clone())
    }

    /// Memoize a loaded entity; entities without an id are not cacheable
    pub fn put<M: EntityKind>(&self, entity: &Entity<M>) {
        if let Some(id) = entity.id() {
            self.lock()
                .put((M::TABLE, id), Arc::new(entity.clone()));
        }
    }

    /// Drop one entry after a write to its row
    pub fn invalidate(&self, table: &'static str, id: i64) {
        self.lock().pop(&(table, id));
    }

    /// Drop every entry of a table after a multi-row write
    pub fn invalidate_table(&self, table: &str) {
        let mut cache = self.lock();
        let stale: Vec<CacheKey> = cache
            .iter()
            .map(|(key, _)| *key)
            .filter(|(t, _)| *t == table)
            .collect();
        for key in stale {
            cache.pop(&key);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, CachedEntity>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

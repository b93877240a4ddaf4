//! Memoizing registry of mechanical-model backends.
//!
//! Backend construction reads and reshapes large tensor files, so each
//! [`ModelKey`] is materialized at most once per cache and then shared via
//! `Arc` for the lifetime of the cache. There is no eviction.

use crate::core::mechanics::factory::{BackendFactory, TensorBackendFactory};
use crate::core::mechanics::tensor::TensorLoadError;
use crate::core::models::key::ModelKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

type Slot<B> = Arc<Mutex<Option<Arc<B>>>>;

/// Thread-safe get-or-create cache keyed by [`ModelKey`].
///
/// The map lock is held only long enough to fetch a key's slot; the slot's own
/// lock is held while the factory runs. Concurrent requests for one key
/// therefore wait for a single construction, while other keys proceed in
/// parallel. A failed construction leaves the slot empty so the next request
/// retries from scratch.
pub struct ModelCache<F: BackendFactory = TensorBackendFactory> {
    factory: F,
    slots: Mutex<HashMap<ModelKey, Slot<F::Backend>>>,
}

impl<F: BackendFactory> ModelCache<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns the backend for `key`, constructing it on first request.
    ///
    /// # Errors
    ///
    /// Propagates the factory's [`TensorLoadError`]; nothing is cached in that case.
    pub fn get_or_create(&self, key: &ModelKey) -> Result<Arc<F::Backend>, TensorLoadError> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut entry = slot.lock();
        if let Some(backend) = entry.as_ref() {
            trace!("Backend cache hit for {}", key);
            return Ok(Arc::clone(backend));
        }

        debug!("Backend cache miss for {}, invoking factory", key);
        let backend = Arc::new(self.factory.create(key)?);
        *entry = Some(Arc::clone(&backend));
        Ok(backend)
    }

    /// Whether a backend for `key` has been successfully constructed.
    pub fn contains(&self, key: &ModelKey) -> bool {
        let slot = self.slots.lock().get(key).cloned();
        slot.is_some_and(|slot| slot.lock().is_some())
    }

    /// Number of constructed backends.
    pub fn len(&self) -> usize {
        let slots: Vec<_> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

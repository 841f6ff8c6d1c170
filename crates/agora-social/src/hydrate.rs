use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Load-once latch per key.
///
/// The loader puts its result wherever the caller keeps live state; the
/// cache only remembers that the load happened. Concurrent first callers
/// for the same key block on that key's cell while one of them loads, and
/// callers for other keys are not held up beyond the map lookup. Cells are
/// never evicted, so a key is hydrated exactly once for the life of the
/// cache.
pub struct HydrationCache<K> {
    cells: Mutex<HashMap<K, Arc<OnceLock<()>>>>,
}

impl<K> HydrationCache<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Run `load` for `key` unless some caller already has. Returns once
    /// the load for `key` has completed.
    pub fn hydrate(&self, key: &K, load: impl FnOnce()) {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            cells.entry(key.clone()).or_default().clone()
        };
        cell.get_or_init(load);
    }

    pub fn is_loaded(&self, key: &K) -> bool {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|cell| cell.get().is_some())
    }
}

impl<K> Default for HydrationCache<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Null-terminated id arrays on top of a flat key/value namespace.
//!
//! A list of ids stored under `prefix` occupies the keys `prefix/0/ID`,
//! `prefix/1/ID`, ... with the first absent index marking the end. Length
//! discovery is a linear scan, which keeps the encoding compatible with a
//! backend that only offers get/set on individual keys.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ConfigResult;
use crate::traits::ConfigBackend;

/// Reads and writes id lists through a [`ConfigBackend`].
#[derive(Clone)]
pub struct IdListCodec {
    backend: Arc<dyn ConfigBackend>,
}

impl IdListCodec {
    pub fn new(backend: Arc<dyn ConfigBackend>) -> Self {
        Self { backend }
    }

    /// The backend this codec writes through.
    pub fn backend(&self) -> &Arc<dyn ConfigBackend> {
        &self.backend
    }

    /// Key of the `index`-th entry of the list under `prefix`.
    pub fn entry_key(prefix: &str, index: usize) -> String {
        format!("{prefix}/{index}/ID")
    }

    /// Load every id stored under `prefix`.
    ///
    /// Reading stops at the first absent entry. A backend read failure is
    /// logged and ends the scan; the ids seen so far are returned.
    pub fn load_ids<I>(&self, prefix: &str) -> HashSet<I>
    where
        I: From<String> + Eq + Hash,
    {
        let mut ids = HashSet::new();
        for index in 0.. {
            let key = Self::entry_key(prefix, index);
            match self.backend.get(&key) {
                Ok(Some(id)) => {
                    ids.insert(I::from(id));
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(%key, error = %e, "failed to read id list entry; stopping");
                    break;
                }
            }
        }
        debug!(prefix, count = ids.len(), "loaded id list");
        ids
    }

    /// Store `ids` under `prefix`, replacing any previous list.
    ///
    /// Ids are written in sorted order followed by a terminator that clears
    /// the entry just past the end, which truncates a longer previous list.
    /// Failures are logged and swallowed: the in-memory change that
    /// triggered the save has already been applied.
    pub fn save_ids<I, It>(&self, prefix: &str, ids: It)
    where
        I: AsRef<str>,
        It: IntoIterator<Item = I>,
    {
        if let Err(e) = self.try_save_ids(prefix, ids) {
            warn!(prefix, error = %e, "failed to save id list");
        }
    }

    /// Like [`save_ids`](Self::save_ids) but reports the first failure.
    pub fn try_save_ids<I, It>(&self, prefix: &str, ids: It) -> ConfigResult<()>
    where
        I: AsRef<str>,
        It: IntoIterator<Item = I>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        ids.sort();
        ids.dedup();

        for (index, id) in ids.iter().enumerate() {
            self.backend.set(&Self::entry_key(prefix, index), Some(id))?;
        }
        self.backend.set(&Self::entry_key(prefix, ids.len()), None)?;
        debug!(prefix, count = ids.len(), "saved id list");
        Ok(())
    }
}

impl std::fmt::Debug for IdListCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdListCodec").finish_non_exhaustive()
    }
}

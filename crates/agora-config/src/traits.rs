//! The [`ConfigBackend`] trait defining the configuration storage interface.
//!
//! Any backend (in-memory, preference file, plugin host store) implements
//! this trait. The only durability guarantee the stores rely on is that a
//! written value is observable by a subsequent read within the same process.

use crate::error::{ConfigError, ConfigResult};

/// Hierarchical string key/value storage.
///
/// Keys are slash-delimited paths such as `Bookmarks/Post/0/ID`. Writing
/// `None` clears a key, after which reads return `Ok(None)`.
pub trait ConfigBackend: Send + Sync {
    /// Read the value at `key`.
    ///
    /// Returns `Ok(None)` if no value is set.
    fn get(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Write (or with `None`, clear) the value at `key`.
    fn set(&self, key: &str, value: Option<&str>) -> ConfigResult<()>;

    /// Read a non-negative integer stored as a decimal string.
    fn get_u64(&self, key: &str) -> ConfigResult<Option<u64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }),
        }
    }

    /// Write (or with `None`, clear) an integer value.
    fn set_u64(&self, key: &str, value: Option<u64>) -> ConfigResult<()> {
        match value {
            Some(v) => self.set(key, Some(&v.to_string())),
            None => self.set(key, None),
        }
    }
}

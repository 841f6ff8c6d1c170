//! In-memory configuration backend for tests and ephemeral nodes.
//!
//! [`InMemoryConfig`] stores all values in a `HashMap` protected by a
//! `RwLock`. Data is lost when the backend is dropped.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::ConfigResult;
use crate::traits::ConfigBackend;

/// An in-memory implementation of [`ConfigBackend`].
#[derive(Debug, Default)]
pub struct InMemoryConfig {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryConfig {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value.
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no key holds a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = values
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl ConfigBackend for InMemoryConfig {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Option<&str>) -> ConfigResult<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        match value {
            Some(v) => {
                values.insert(key.to_string(), v.to_string());
            }
            None => {
                values.remove(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn set_then_get() {
        let config = InMemoryConfig::new();
        config.set("Options/Theme", Some("dark")).unwrap();
        assert_eq!(config.get("Options/Theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn clearing_removes_key() {
        let config = InMemoryConfig::new();
        config.set("a/b", Some("1")).unwrap();
        config.set("a/b", None).unwrap();
        assert!(config.get("a/b").unwrap().is_none());
        assert!(config.is_empty());
    }

    #[test]
    fn u64_values() {
        let config = InMemoryConfig::new();
        config.set_u64("FollowingTimes/x/Time", Some(1234)).unwrap();
        assert_eq!(config.get_u64("FollowingTimes/x/Time").unwrap(), Some(1234));
        assert_eq!(config.get_u64("missing").unwrap(), None);

        config.set("bad", Some("twelve")).unwrap();
        assert!(matches!(
            config.get_u64("bad"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn keys_with_prefix_sorted() {
        let config = InMemoryConfig::new();
        config.set("b/1", Some("x")).unwrap();
        config.set("a/2", Some("x")).unwrap();
        config.set("a/1", Some("x")).unwrap();
        assert_eq!(config.keys_with_prefix("a/"), vec!["a/1", "a/2"]);
    }
}

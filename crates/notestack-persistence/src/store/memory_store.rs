use notestack_core::{KeyValueStore, NotestackError, NotestackResult};
use std::collections::HashMap;

/// In-process store for tests and ephemeral sessions.
///
/// `set_failing(true)` makes every write fail with a persistence error,
/// which is how store-unavailable paths are exercised.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    failing: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> NotestackResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> NotestackResult<()> {
        if self.failing {
            return Err(NotestackError::persistence(key, "memory store is unavailable"));
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

use crate::storage::KeyValueStore;
use anyhow::anyhow;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};

/// Process-local store. Clones share the same map, which lets tests keep a
/// handle on what the ledger wrote.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Arc<Mutex<HashMap<String, String>>> {
        self.entries.clone()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> crate::Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

use crate::{CoreError, DeckStore};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut v: Vec<String> = self.entries.read().keys().cloned().collect();
        v.sort();
        v
    }
}

impl DeckStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), CoreError> {
        self.entries
            .write()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

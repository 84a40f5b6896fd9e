use crate::CoreError;

pub mod memory;

pub use memory::MemoryStore;

/// Key-value persistence for serialized decks, one key per learner.
pub trait DeckStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved under `key` yet.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn save(&self, key: &str, payload: &str) -> Result<(), CoreError>;
}

//! The storage port: string-keyed durable storage.
//!
//! Everything the system persists goes through [`KvStore`], so the engine
//! and ledger never touch a concrete backend. Production uses the SQLite
//! [`Database`](super::Database); tests (and callers that want a purely
//! ephemeral run) use [`MemoryStore`].

use std::collections::HashMap;

use crate::error::StorageError;

/// String-keyed durable storage.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Nothing survives the process; every operation succeeds.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

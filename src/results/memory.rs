use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{GameResult, ResultStore, StorageError};
use crate::session::Identifier;

/// In-memory result store, used by `--memory` and in tests
#[derive(Default)]
pub struct MemoryResultStore {
    histories: Mutex<FxHashMap<Identifier, Vec<GameResult>>>,
}

impl MemoryResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored results across all players
    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.lock().values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn append(&self, identifier: &Identifier, result: &GameResult) -> Result<(), StorageError> {
        self.histories
            .lock()
            .entry(identifier.clone())
            .or_default()
            .push(result.clone());
        Ok(())
    }

    async fn read_all(&self, identifier: &Identifier) -> Result<Vec<GameResult>, StorageError> {
        Ok(self
            .histories
            .lock()
            .get(identifier)
            .cloned()
            .unwrap_or_default())
    }
}

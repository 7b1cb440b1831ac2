//! Completed-game results and their persistence
//!
//! Every player's history is an append-only sequence of [`GameResult`],
//! partitioned by [`Identifier`]. Engines only ever append and read; nothing
//! here updates or deletes a stored result.

mod memory;
mod sled_store;
mod stats;

pub use memory::MemoryResultStore;
pub use sled_store::SledResultStore;
pub use stats::StatsSummary;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Identifier;

/// One won game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub elapsed_seconds: f64,
    /// 1-based row on which the word was found
    pub guess_count: u32,
    pub word: String,
    pub completed_at: DateTime<Utc>,
}

/// Failure reading or writing the results store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task failed: {0}")]
    Task(String),
}

/// Durable per-player result history
///
/// Appends for one identifier must be observed by `read_all` in the order
/// they were issued.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append one result to the identifier's history
    async fn append(&self, identifier: &Identifier, result: &GameResult) -> Result<(), StorageError>;

    /// Read the identifier's full history, oldest first
    async fn read_all(&self, identifier: &Identifier) -> Result<Vec<GameResult>, StorageError>;

    /// Flush buffered writes; called once during shutdown
    async fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_with_persisted_field_names() {
        let result = GameResult {
            elapsed_seconds: 12.5,
            guess_count: 3,
            word: "crate".to_string(),
            completed_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };

        let json = serde_json::to_value(&result).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(keys, ["completedAt", "elapsedSeconds", "guessCount", "word"]);
        assert_eq!(object["guessCount"], 3);

        let back: GameResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}

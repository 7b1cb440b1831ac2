//! Sled-backed result history
//!
//! Each identifier owns one tree (`games:<identifier>`). Keys are ids from
//! `Db::generate_id`, stored big-endian so tree order is append order.
//! Values are the JSON encoding of [`GameResult`].

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::{GameResult, ResultStore, StorageError};
use crate::session::Identifier;

const TREE_PREFIX: &str = "games:";

/// Persistent store rooted at a sled directory
#[derive(Clone)]
pub struct SledResultStore {
    db: sled::Db,
}

impl SledResultStore {
    /// Open (or create) the store rooted at `path`
    ///
    /// # Errors
    /// Returns `StorageError` if the directory cannot be created or sled
    /// fails to open it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = sled::open(path)?;
        debug!(path = %path.display(), "results store opened");
        Ok(Self { db })
    }

    fn tree_name(identifier: &Identifier) -> String {
        format!("{TREE_PREFIX}{identifier}")
    }

    fn append_blocking(
        db: &sled::Db,
        identifier: &Identifier,
        result: &GameResult,
    ) -> Result<(), StorageError> {
        let tree = db.open_tree(Self::tree_name(identifier))?;
        let key = db.generate_id()?.to_be_bytes();
        let value = serde_json::to_vec(result)?;
        tree.insert(key, value)?;
        tree.flush()?;
        Ok(())
    }

    fn read_blocking(db: &sled::Db, identifier: &Identifier) -> Result<Vec<GameResult>, StorageError> {
        let name = Self::tree_name(identifier);
        // Avoid creating empty trees for players who never won
        if !db.tree_names().iter().any(|n| n.as_ref() == name.as_bytes()) {
            return Ok(Vec::new());
        }
        let tree = db.open_tree(name)?;
        tree.iter()
            .values()
            .map(|value| Ok(serde_json::from_slice(&value?)?))
            .collect()
    }
}

#[async_trait]
impl ResultStore for SledResultStore {
    async fn append(&self, identifier: &Identifier, result: &GameResult) -> Result<(), StorageError> {
        let db = self.db.clone();
        let identifier = identifier.clone();
        let result = result.clone();
        tokio::task::spawn_blocking(move || Self::append_blocking(&db, &identifier, &result))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }

    async fn read_all(&self, identifier: &Identifier) -> Result<Vec<GameResult>, StorageError> {
        let db = self.db.clone();
        let identifier = identifier.clone();
        tokio::task::spawn_blocking(move || Self::read_blocking(&db, &identifier))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }

    async fn flush(&self) -> Result<(), StorageError> {
        self.db.flush_async().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::StatsSummary;
    use crate::session::IdentitySeed;
    use chrono::Utc;
    use tempfile::TempDir;

    fn result(guess_count: u32, word: &str) -> GameResult {
        GameResult {
            elapsed_seconds: f64::from(guess_count) * 10.0,
            guess_count,
            word: word.to_string(),
            completed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn append_then_read_in_order() {
        let dir = TempDir::new().unwrap();
        let store = SledResultStore::open(dir.path()).unwrap();
        let id = IdentitySeed::fallback("10.0.0.1").identifier();

        for (n, word) in [(4, "crate"), (2, "slate"), (6, "error")] {
            store.append(&id, &result(n, word)).await.unwrap();
        }

        let history = store.read_all(&id).await.unwrap();
        let words: Vec<&str> = history.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, ["crate", "slate", "error"]);
    }

    #[tokio::test]
    async fn history_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let id = IdentitySeed::fallback("player").identifier();
        {
            let store = SledResultStore::open(dir.path()).unwrap();
            store.append(&id, &result(3, "crate")).await.unwrap();
            store.flush().await.unwrap();
        }

        let store = SledResultStore::open(dir.path()).unwrap();
        let history = store.read_all(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].guess_count, 3);
    }

    #[tokio::test]
    async fn unknown_player_has_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = SledResultStore::open(dir.path()).unwrap();
        let id = IdentitySeed::fallback("stranger").identifier();

        assert!(store.read_all(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn players_do_not_share_history() {
        let dir = TempDir::new().unwrap();
        let store = SledResultStore::open(dir.path()).unwrap();
        let a = IdentitySeed::fallback("a").identifier();
        let b = IdentitySeed::fallback("b").identifier();

        store.append(&a, &result(1, "crate")).await.unwrap();

        assert_eq!(store.read_all(&a).await.unwrap().len(), 1);
        assert!(store.read_all(&b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_history_summarizes() {
        let dir = TempDir::new().unwrap();
        let store = SledResultStore::open(dir.path()).unwrap();
        let id = IdentitySeed::fallback("carol").identifier();

        // Elapsed time is ten seconds per guess
        for (n, word) in [(3, "crate"), (4, "slate"), (3, "trace"), (6, "error")] {
            store.append(&id, &result(n, word)).await.unwrap();
        }

        let history = store.read_all(&id).await.unwrap();
        let stats = StatsSummary::summarize(&history, 6);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.histogram, vec![0, 0, 2, 1, 0, 1]);
        assert!((stats.average_guesses - 4.0).abs() < f64::EPSILON);
        assert!((stats.average_seconds - 40.0).abs() < f64::EPSILON);
    }
}

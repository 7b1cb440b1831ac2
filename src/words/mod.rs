//! Secret-word supply and guess validation
//!
//! Two sources implement [`WordSource`]: [`StaticWordSource`] over embedded
//! or file-loaded lists, and [`RemoteWordSource`] over a WordsAPI-style HTTP
//! service. One is chosen at startup and shared by every session.

mod embedded;
pub mod loader;
mod remote;
mod static_source;

pub use embedded::{ALLOWED, ALLOWED_COUNT, ANSWERS, ANSWERS_COUNT};
pub use remote::{DEFAULT_API_BASE, RemoteWordSource};
pub use static_source::StaticWordSource;

use async_trait::async_trait;

use crate::core::Word;

/// Word source failure; every variant means "source unavailable" to a session
#[derive(Debug, thiserror::Error)]
pub enum WordSourceError {
    #[error("word source unavailable: {0}")]
    Unavailable(String),

    #[error("no words of length {0} available")]
    NoWordsOfLength(usize),

    #[error("word service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Supplies secret words and judges guesses
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Pick a random secret word of exactly `length` letters
    async fn random_word(&self, length: usize) -> Result<Word, WordSourceError>;

    /// Whether `word` is an acceptable guess
    async fn validate(&self, word: &str) -> Result<bool, WordSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_count_matches_const() {
        assert_eq!(ANSWERS.len(), ANSWERS_COUNT);
    }

    #[test]
    fn allowed_count_matches_const() {
        assert_eq!(ALLOWED.len(), ALLOWED_COUNT);
    }

    #[test]
    fn answers_are_valid_words() {
        // All answers should be 5 letters, lowercase
        for &word in ANSWERS {
            assert_eq!(word.len(), 5, "Word '{word}' is not 5 letters");
            assert!(
                word.chars().all(|c| c.is_ascii_lowercase()),
                "Word '{word}' contains non-lowercase chars"
            );
        }
    }

    #[test]
    fn allowed_are_valid_words() {
        for &word in ALLOWED {
            assert_eq!(word.len(), 5, "Word '{word}' is not 5 letters");
            assert!(
                word.chars().all(|c| c.is_ascii_lowercase()),
                "Word '{word}' contains non-lowercase chars"
            );
        }
    }

    #[test]
    fn lists_are_not_empty() {
        assert!(ANSWERS_COUNT > 0);
        assert!(ALLOWED_COUNT > 0);
    }
}

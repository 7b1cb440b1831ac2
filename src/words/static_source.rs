use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rustc_hash::FxHashSet;

use super::loader::words_from_slice;
use super::{ALLOWED, ANSWERS, WordSource, WordSourceError};
use crate::core::Word;

/// In-memory word lists
///
/// Secrets are drawn from `answers`; a guess is acceptable if it appears in
/// either list.
pub struct StaticWordSource {
    answers: Vec<Word>,
    allowed: FxHashSet<String>,
}

impl StaticWordSource {
    #[must_use]
    pub fn new(answers: Vec<Word>, allowed: &[Word]) -> Self {
        let allowed = allowed
            .iter()
            .chain(&answers)
            .map(|w| w.text().to_string())
            .collect();
        Self { answers, allowed }
    }

    /// The built-in answer and allowed lists
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(words_from_slice(ANSWERS), &words_from_slice(ALLOWED))
    }

    /// Only the built-in answers, used for both secrets and guesses
    #[must_use]
    pub fn answers_only() -> Self {
        Self::new(words_from_slice(ANSWERS), &[])
    }

    /// A custom list used for both secrets and guesses
    #[must_use]
    pub fn from_words(words: Vec<Word>) -> Self {
        Self::new(words, &[])
    }

    /// At least one secret of `length` letters exists
    #[must_use]
    pub fn has_length(&self, length: usize) -> bool {
        self.answers.iter().any(|w| w.len() == length)
    }

    #[must_use]
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }
}

#[async_trait]
impl WordSource for StaticWordSource {
    async fn random_word(&self, length: usize) -> Result<Word, WordSourceError> {
        let candidates: Vec<&Word> = self.answers.iter().filter(|w| w.len() == length).collect();
        candidates
            .choose(&mut rand::rng())
            .map(|&w| w.clone())
            .ok_or(WordSourceError::NoWordsOfLength(length))
    }

    async fn validate(&self, word: &str) -> Result<bool, WordSourceError> {
        Ok(self.allowed.contains(&word.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(answers: &[&str], allowed: &[&str]) -> StaticWordSource {
        StaticWordSource::new(words_from_slice(answers), &words_from_slice(allowed))
    }

    #[tokio::test]
    async fn random_word_respects_length() {
        let source = source(&["cat", "crate", "slate"], &[]);
        for _ in 0..20 {
            let word = source.random_word(5).await.unwrap();
            assert!(["crate", "slate"].contains(&word.text()));
        }
        assert_eq!(source.random_word(3).await.unwrap().text(), "cat");
    }

    #[tokio::test]
    async fn random_word_missing_length_is_unavailable() {
        let source = source(&["crate"], &[]);
        assert!(matches!(
            source.random_word(7).await,
            Err(WordSourceError::NoWordsOfLength(7))
        ));
    }

    #[tokio::test]
    async fn validate_accepts_answers_and_allowed() {
        let source = source(&["crate"], &["trace"]);
        assert!(source.validate("crate").await.unwrap());
        assert!(source.validate("TRACE").await.unwrap());
        assert!(!source.validate("xxxxx").await.unwrap());
        assert_eq!(source.allowed_count(), 2);
    }

    #[tokio::test]
    async fn embedded_lists_validate_their_answers() {
        let source = StaticWordSource::embedded();
        assert!(source.answer_count() > 0);
        let word = source.random_word(5).await.unwrap();
        assert!(source.validate(word.text()).await.unwrap());
    }
}

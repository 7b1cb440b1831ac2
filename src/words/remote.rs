//! WordsAPI-compatible remote word source
//!
//! Random word: `GET {base}?letters=N&random=true&partOfSpeech=noun`.
//! Validation: `GET {base}{word}/definitions`. Both answer with a JSON body
//! carrying a `word` field; an absent or empty field means "not a word".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{WordSource, WordSourceError};
use crate::core::Word;

/// Default service base URL
pub const DEFAULT_API_BASE: &str = "https://www.wordsapi.com/mashape/words/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const RANDOM_WORD_ATTEMPTS: usize = 5;

#[derive(Debug, Deserialize)]
struct WordResponse {
    #[serde(default)]
    word: Option<String>,
}

/// HTTP-backed word source
pub struct RemoteWordSource {
    client: reqwest::Client,
    base: String,
    auth: String,
}

impl RemoteWordSource {
    /// Create a source against `base`, appending the opaque `auth` query
    /// string (may be empty) to every request
    ///
    /// # Errors
    /// Returns `WordSourceError::Http` if the HTTP client cannot be built.
    pub fn new(base: impl Into<String>, auth: impl Into<String>) -> Result<Self, WordSourceError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base: base.into(),
            auth: auth.into(),
        })
    }

    /// Full request URL for `path`, with the auth query appended
    fn url(&self, path: &str) -> String {
        let mut url = format!("{}{path}", self.base);
        if !self.auth.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&self.auth);
        }
        url
    }

    async fn fetch(&self, path: &str) -> Result<Option<WordResponse>, WordSourceError> {
        let url = self.url(path);
        debug!(%url, "word service request");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json::<WordResponse>().await?))
    }
}

#[async_trait]
impl WordSource for RemoteWordSource {
    async fn random_word(&self, length: usize) -> Result<Word, WordSourceError> {
        let path = format!("?letters={length}&random=true&partOfSpeech=noun");
        for attempt in 1..=RANDOM_WORD_ATTEMPTS {
            let candidate = self.fetch(&path).await?.and_then(|r| r.word);
            match candidate.as_deref().map(|w| Word::with_length(w, length)) {
                Some(Ok(word)) => return Ok(word),
                Some(Err(e)) => debug!(attempt, error = %e, "discarding unusable random word"),
                None => debug!(attempt, "word service returned no word"),
            }
        }
        warn!(length, "word service gave no usable word");
        Err(WordSourceError::Unavailable(format!(
            "no usable {length}-letter word after {RANDOM_WORD_ATTEMPTS} attempts"
        )))
    }

    async fn validate(&self, word: &str) -> Result<bool, WordSourceError> {
        let response = self.fetch(&format!("{word}/definitions")).await?;
        Ok(response
            .and_then(|r| r.word)
            .is_some_and(|w| !w.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_auth_with_question_mark() {
        let source = RemoteWordSource::new("https://example.test/words/", "key=abc").unwrap();
        assert_eq!(
            source.url("crate/definitions"),
            "https://example.test/words/crate/definitions?key=abc"
        );
    }

    #[test]
    fn url_appends_auth_with_ampersand() {
        let source = RemoteWordSource::new("https://example.test/words/", "key=abc").unwrap();
        assert_eq!(
            source.url("?letters=5&random=true"),
            "https://example.test/words/?letters=5&random=true&key=abc"
        );
    }

    #[test]
    fn url_without_auth_is_untouched() {
        let source = RemoteWordSource::new(DEFAULT_API_BASE, "").unwrap();
        assert_eq!(
            source.url("crate/definitions"),
            format!("{DEFAULT_API_BASE}crate/definitions")
        );
    }

    #[test]
    fn response_without_word_field() {
        let parsed: WordResponse =
            serde_json::from_str(r#"{"success":false,"message":"word not found"}"#).unwrap();
        assert!(parsed.word.is_none());

        let parsed: WordResponse = serde_json::from_str(r#"{"word":"test","definitions":[]}"#).unwrap();
        assert_eq!(parsed.word.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error_not_a_panic() {
        // Port 9 on localhost (discard) is almost never listening
        let source = RemoteWordSource::new("http://127.0.0.1:9/", "").unwrap();
        assert!(source.validate("crate").await.is_err());
        assert!(source.random_word(5).await.is_err());
    }
}

//! Server configuration
//!
//! Built once from the command line, validated, then used to construct the
//! shared word source and results store. Nothing here is mutated afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::render::Theme;
use crate::results::{MemoryResultStore, ResultStore, SledResultStore, StorageError};
use crate::words::{RemoteWordSource, StaticWordSource, WordSource, WordSourceError, loader};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 1337;
pub const DEFAULT_DIFFICULTY: usize = 5;
pub const DEFAULT_DB_PATH: &str = "data/results";
pub const MIN_DIFFICULTY: usize = 3;
pub const MAX_DIFFICULTY: usize = 10;

/// Invalid or unusable configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("difficulty {0} is outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}")]
    InvalidDifficulty(usize),

    #[error("could not read word list {}: {source}", path.display())]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("word list has no {0}-letter words")]
    NoWordsOfLength(usize),

    #[error("invalid API base URL: {0}")]
    InvalidApiBase(String),

    #[error(transparent)]
    WordSource(#[from] WordSourceError),
}

/// Which built-in or custom list the static source serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordList {
    /// Embedded answers as secrets; answers and allowed words as guesses
    All,
    /// Embedded answers only
    Answers,
    /// Newline-separated file, used for both
    File(PathBuf),
}

impl WordList {
    /// `all`, `answers`, or a path
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => Self::All,
            "answers" => Self::Answers,
            path => Self::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordSourceConfig {
    Static(WordList),
    Remote { base: String, auth: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sled(PathBuf),
    Memory,
}

/// Everything `serve` needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: usize,
    pub words: WordSourceConfig,
    pub store: StoreConfig,
    pub monochrome: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            difficulty: DEFAULT_DIFFICULTY,
            words: WordSourceConfig::Static(WordList::All),
            store: StoreConfig::Sled(PathBuf::from(DEFAULT_DB_PATH)),
            monochrome: false,
        }
    }
}

impl ServerConfig {
    /// Check settings that do not need I/O
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an out-of-range difficulty or a malformed
    /// API base URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ConfigError::InvalidDifficulty(self.difficulty));
        }
        if let WordSourceConfig::Remote { base, .. } = &self.words
            && !(base.starts_with("http://") || base.starts_with("https://"))
        {
            return Err(ConfigError::InvalidApiBase(base.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        if self.monochrome {
            Theme::monochrome()
        } else {
            Theme::default()
        }
    }

    /// Construct the shared word source
    ///
    /// Static lists are checked for words of the configured difficulty so a
    /// bad combination fails at startup rather than on every connection.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a word list cannot be read or holds no words
    /// of the right length, or if the HTTP client cannot be built.
    pub fn word_source(&self) -> Result<Arc<dyn WordSource>, ConfigError> {
        let list = match &self.words {
            WordSourceConfig::Remote { base, auth } => {
                return Ok(Arc::new(RemoteWordSource::new(base.clone(), auth.clone())?));
            }
            WordSourceConfig::Static(list) => list,
        };

        let source = match list {
            WordList::All => StaticWordSource::embedded(),
            WordList::Answers => StaticWordSource::answers_only(),
            WordList::File(path) => {
                let words = loader::load_from_file(path).map_err(|source| ConfigError::WordList {
                    path: path.clone(),
                    source,
                })?;
                StaticWordSource::from_words(words)
            }
        };
        if !source.has_length(self.difficulty) {
            return Err(ConfigError::NoWordsOfLength(self.difficulty));
        }
        info!(
            answers = source.answer_count(),
            allowed = source.allowed_count(),
            "word lists loaded"
        );
        Ok(Arc::new(source))
    }

    /// Open the shared results store
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the sled database cannot be opened.
    pub fn result_store(&self) -> Result<Arc<dyn ResultStore>, StorageError> {
        Ok(match &self.store {
            StoreConfig::Sled(path) => Arc::new(SledResultStore::open(path)?),
            StoreConfig::Memory => Arc::new(MemoryResultStore::new()),
        })
    }
}

/// Parse a difficulty argument, e.g. for a clap value parser
///
/// # Errors
///
/// Returns a message for non-numbers and values outside the supported range.
pub fn parse_difficulty(value: &str) -> Result<usize, String> {
    let difficulty: usize = value.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
        Ok(difficulty)
    } else {
        Err(ConfigError::InvalidDifficulty(difficulty).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "127.0.0.1:1337");
    }

    #[test]
    fn difficulty_range() {
        for difficulty in [2, 11] {
            let config = ServerConfig {
                difficulty,
                ..ServerConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidDifficulty(d)) if d == difficulty));
        }
        assert_eq!(parse_difficulty("7"), Ok(7));
        assert!(parse_difficulty("12").is_err());
        assert!(parse_difficulty("five").is_err());
    }

    #[test]
    fn remote_base_must_be_http() {
        let config = ServerConfig {
            words: WordSourceConfig::Remote {
                base: "ftp://words".to_string(),
                auth: String::new(),
            },
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidApiBase(_))));
    }

    #[test]
    fn wordlist_parsing() {
        assert_eq!(WordList::parse("all"), WordList::All);
        assert_eq!(WordList::parse("answers"), WordList::Answers);
        assert_eq!(
            WordList::parse("/tmp/words.txt"),
            WordList::File(PathBuf::from("/tmp/words.txt"))
        );
    }

    #[test]
    fn embedded_list_rejects_other_lengths() {
        let config = ServerConfig {
            difficulty: 7,
            ..ServerConfig::default()
        };
        assert!(matches!(config.word_source(), Err(ConfigError::NoWordsOfLength(7))));
    }

    #[test]
    fn custom_wordlist_with_matching_length() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "planet\nrocket\nsaturn").unwrap();
        let config = ServerConfig {
            difficulty: 6,
            words: WordSourceConfig::Static(WordList::File(file.path().to_path_buf())),
            ..ServerConfig::default()
        };
        assert!(config.word_source().is_ok());
    }

    #[test]
    fn missing_wordlist_is_reported() {
        let config = ServerConfig {
            words: WordSourceConfig::Static(WordList::File(PathBuf::from("/nonexistent/words.txt"))),
            ..ServerConfig::default()
        };
        assert!(matches!(config.word_source(), Err(ConfigError::WordList { .. })));
    }

    #[test]
    fn stores_open() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            store: StoreConfig::Sled(dir.path().join("results")),
            ..ServerConfig::default()
        };
        assert!(config.result_store().is_ok());

        let config = ServerConfig {
            store: StoreConfig::Memory,
            ..ServerConfig::default()
        };
        assert!(config.result_store().is_ok());
    }

    #[test]
    fn monochrome_theme() {
        let config = ServerConfig {
            monochrome: true,
            ..ServerConfig::default()
        };
        assert_eq!(config.theme(), Theme::monochrome());
    }
}

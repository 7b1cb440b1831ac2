//! Inputs, phases and the I/O requests an engine hands back to its session

use crate::core::Word;
use crate::results::{GameResult, StorageError};
use crate::session::Identifier;
use crate::words::WordSourceError;

/// Discrete input delivered by the transport, one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A lowercase letter `a`-`z`
    Letter(char),
    Backspace,
    Enter,
    ToggleReveal,
    Resize { width: u16, height: u16 },
    Restart,
    Disconnect,
}

/// Lifecycle state of the current game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// The submitted row was rejected; cleared by the next edit
    InvalidFlash,
    /// Solved; the result is being saved
    Won,
    /// All rows used without solving
    Lost,
    /// Solved and saved; stats are on screen
    PostGame,
}

impl Phase {
    /// Row editing is allowed
    #[must_use]
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Playing | Self::InvalidFlash)
    }

    /// The game is over and can be restarted
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::PostGame)
    }
}

/// I/O the session must perform on the engine's behalf
///
/// The session runs each command asynchronously and feeds the outcome back
/// through [`GameEngine::complete`](super::GameEngine::complete).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadHistory(Identifier),
    Validate(String),
    Append(Identifier, GameResult),
    FetchWord(usize),
}

/// Outcome of a [`Command`]
#[derive(Debug)]
pub enum Completion {
    HistoryLoaded(Result<Vec<GameResult>, StorageError>),
    Validated {
        guess: String,
        result: Result<bool, WordSourceError>,
    },
    Appended(Result<(), StorageError>),
    WordFetched(Result<Word, WordSourceError>),
}

//! Per-connection game state machine
//!
//! The engine never performs I/O itself. Inputs that need the word source or
//! the results store return a [`Command`]; the owning session runs it and
//! reports back with a [`Completion`]. While a command is outstanding the
//! engine is busy and the session holds further input.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{Command, Completion, InputEvent, Phase, Stopwatch};
use crate::core::{Board, Feedback, Keyboard, LetterColor, Word};
use crate::results::{GameResult, StatsSummary};
use crate::session::Identifier;

const NOTICE_SOURCE_DOWN: &str = "Word source unavailable. Press Enter to try again.";
const NOTICE_NO_NEW_WORD: &str = "Could not fetch a new word. Press Space to try again.";
const NOTICE_NOT_SAVED: &str = "Your result could not be saved.";
const NOTICE_NO_HISTORY: &str = "Previous results are unavailable.";

/// Which command the engine is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    History,
    Validate,
    Append,
    Word,
}

/// Read-only view pulled by the renderer after each event
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub board: &'a Board,
    pub keyboard: &'a Keyboard,
    pub current_row: usize,
    pub elapsed: Duration,
    pub show_secret: bool,
    pub secret: &'a Word,
    pub stats: StatsSummary,
    pub notice: Option<&'a str>,
    pub last_result: Option<&'a GameResult>,
}

/// One connection's game, reused across restarts
#[derive(Debug)]
pub struct GameEngine {
    identifier: Identifier,
    secret: Word,
    board: Board,
    current_row: usize,
    current_col: usize,
    keyboard: Keyboard,
    phase: Phase,
    stopwatch: Stopwatch,
    show_secret: bool,
    history: Vec<GameResult>,
    last_result: Option<GameResult>,
    notice: Option<String>,
    pending: Option<Pending>,
    terminated: bool,
}

impl GameEngine {
    /// Fresh game for `identifier`; the difficulty is the secret's length
    #[must_use]
    pub fn new(identifier: Identifier, secret: Word) -> Self {
        Self {
            identifier,
            board: Board::for_difficulty(secret.len()),
            secret,
            current_row: 0,
            current_col: 0,
            keyboard: Keyboard::new(),
            phase: Phase::Playing,
            stopwatch: Stopwatch::start(),
            show_secret: false,
            history: Vec::new(),
            last_result: None,
            notice: None,
            pending: None,
            terminated: false,
        }
    }

    /// Request the player's prior results
    pub fn start(&mut self) -> Command {
        self.pending = Some(Pending::History);
        Command::LoadHistory(self.identifier.clone())
    }

    /// Apply one input event
    pub fn handle(&mut self, event: InputEvent) -> Option<Command> {
        if self.terminated {
            return None;
        }
        match event {
            InputEvent::Letter(letter) => {
                self.type_letter(letter);
                None
            }
            InputEvent::Backspace => {
                self.backspace();
                None
            }
            InputEvent::Enter => self.submit(),
            InputEvent::ToggleReveal => {
                self.show_secret = !self.show_secret;
                None
            }
            InputEvent::Restart => self.restart(),
            InputEvent::Resize { .. } => None,
            InputEvent::Disconnect => {
                self.terminated = true;
                None
            }
        }
    }

    /// Apply the outcome of a previously returned command
    pub fn complete(&mut self, completion: Completion) -> Option<Command> {
        if self.terminated {
            return None;
        }
        let pending = self.pending.take();
        match (pending, completion) {
            (Some(Pending::History), Completion::HistoryLoaded(result)) => {
                match result {
                    Ok(history) => self.history = history,
                    Err(e) => {
                        warn!(identifier = %self.identifier.short(), error = %e, "history read failed");
                        self.history.clear();
                        self.notice = Some(NOTICE_NO_HISTORY.to_string());
                    }
                }
                None
            }
            (Some(Pending::Validate), Completion::Validated { guess, result }) => {
                self.finish_submit(&guess, result)
            }
            (Some(Pending::Append), Completion::Appended(result)) => {
                if let Err(e) = result {
                    warn!(identifier = %self.identifier.short(), error = %e, "result append failed");
                    self.notice = Some(NOTICE_NOT_SAVED.to_string());
                }
                self.phase = Phase::PostGame;
                None
            }
            (Some(Pending::Word), Completion::WordFetched(result)) => {
                match result {
                    Ok(word) => self.reset(word),
                    Err(e) => {
                        warn!(identifier = %self.identifier.short(), error = %e, "new word fetch failed");
                        self.notice = Some(NOTICE_NO_NEW_WORD.to_string());
                    }
                }
                None
            }
            (pending, completion) => {
                debug!(?pending, ?completion, "ignoring unexpected completion");
                self.pending = pending;
                None
            }
        }
    }

    fn type_letter(&mut self, letter: char) {
        if !self.accepts_edit() || !letter.is_ascii_lowercase() {
            return;
        }
        self.clear_flash();
        if self.current_col < self.board.cols() {
            self.board
                .set_letter(self.current_row, self.current_col, Some(letter as u8));
            self.current_col += 1;
        }
    }

    fn backspace(&mut self) {
        if !self.accepts_edit() {
            return;
        }
        self.clear_flash();
        if self.current_col > 0 {
            self.current_col -= 1;
            self.board.set_letter(self.current_row, self.current_col, None);
        }
    }

    fn accepts_edit(&self) -> bool {
        self.pending.is_none() && self.phase.is_editing()
    }

    fn clear_flash(&mut self) {
        self.notice = None;
        if self.phase == Phase::InvalidFlash {
            self.board.paint_row(self.current_row, LetterColor::Blank);
            self.phase = Phase::Playing;
        }
    }

    fn submit(&mut self) -> Option<Command> {
        if self.pending.is_some()
            || self.phase != Phase::Playing
            || self.current_col != self.board.cols()
            || self.current_row >= self.board.rows()
        {
            return None;
        }
        self.pending = Some(Pending::Validate);
        Some(Command::Validate(self.board.row_text(self.current_row)))
    }

    fn finish_submit(
        &mut self,
        guess: &str,
        result: Result<bool, crate::words::WordSourceError>,
    ) -> Option<Command> {
        match result {
            Err(e) => {
                warn!(identifier = %self.identifier.short(), error = %e, "guess validation failed");
                self.notice = Some(NOTICE_SOURCE_DOWN.to_string());
                None
            }
            Ok(false) => {
                debug!(%guess, "rejected guess");
                self.board.paint_row(self.current_row, LetterColor::Flash);
                self.phase = Phase::InvalidFlash;
                None
            }
            Ok(true) => self.grade_row(),
        }
    }

    fn grade_row(&mut self) -> Option<Command> {
        let guess = match Word::with_length(self.board.row_text(self.current_row), self.board.cols()) {
            Ok(word) => word,
            Err(e) => {
                warn!(error = %e, "submitted row is not a word");
                return None;
            }
        };
        let feedback = Feedback::calculate(&self.secret, &guess);
        debug!(
            identifier = %self.identifier.short(),
            row = self.current_row,
            feedback = %feedback.to_emoji(),
            greens = feedback.count_greens(),
            yellows = feedback.count_yellows(),
            "graded guess"
        );
        self.board.apply_feedback(self.current_row, &feedback);
        self.keyboard.merge_feedback(&guess, &feedback);

        if feedback.is_perfect() {
            self.stopwatch.stop();
            let result = GameResult {
                elapsed_seconds: self.stopwatch.elapsed().as_secs_f64(),
                guess_count: (self.current_row + 1) as u32,
                word: self.secret.text().to_string(),
                completed_at: Utc::now(),
            };
            info!(
                identifier = %self.identifier.short(),
                guesses = result.guess_count,
                seconds = result.elapsed_seconds,
                "game won"
            );
            self.history.push(result.clone());
            self.last_result = Some(result.clone());
            self.phase = Phase::Won;
            self.pending = Some(Pending::Append);
            return Some(Command::Append(self.identifier.clone(), result));
        }

        if self.current_row + 1 >= self.board.rows() {
            self.stopwatch.stop();
            info!(identifier = %self.identifier.short(), word = %self.secret, "game lost");
            self.phase = Phase::Lost;
        } else {
            self.current_row += 1;
            self.current_col = 0;
        }
        None
    }

    fn restart(&mut self) -> Option<Command> {
        if self.pending.is_some() || !self.phase.is_complete() {
            return None;
        }
        self.pending = Some(Pending::Word);
        Some(Command::FetchWord(self.secret.len()))
    }

    fn reset(&mut self, secret: Word) {
        self.board = Board::for_difficulty(secret.len());
        self.secret = secret;
        self.current_row = 0;
        self.current_col = 0;
        self.keyboard = Keyboard::new();
        self.phase = Phase::Playing;
        self.stopwatch = Stopwatch::start();
        self.show_secret = false;
        self.last_result = None;
        self.notice = None;
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// A command is outstanding
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    #[must_use]
    pub const fn clock_running(&self) -> bool {
        self.stopwatch.is_running()
    }

    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    #[must_use]
    pub const fn current_row(&self) -> usize {
        self.current_row
    }

    #[must_use]
    pub const fn current_col(&self) -> usize {
        self.current_col
    }

    #[must_use]
    pub const fn secret(&self) -> &Word {
        &self.secret
    }

    #[must_use]
    pub fn history(&self) -> &[GameResult] {
        &self.history
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            board: &self.board,
            keyboard: &self.keyboard,
            current_row: self.current_row,
            elapsed: self.stopwatch.elapsed(),
            show_secret: self.show_secret,
            secret: &self.secret,
            stats: StatsSummary::summarize(&self.history, self.board.rows()),
            notice: self.notice.as_deref(),
            last_result: self.last_result.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::StorageError;
    use crate::session::IdentitySeed;
    use crate::words::WordSourceError;

    fn engine(secret: &str) -> GameEngine {
        let mut engine = GameEngine::new(
            IdentitySeed::fallback("tester").identifier(),
            Word::new(secret).unwrap(),
        );
        let command = engine.start();
        assert!(matches!(command, Command::LoadHistory(_)));
        engine.complete(Completion::HistoryLoaded(Ok(Vec::new())));
        engine
    }

    fn type_word(engine: &mut GameEngine, word: &str) {
        for letter in word.chars() {
            assert_eq!(engine.handle(InputEvent::Letter(letter)), None);
        }
    }

    /// Type and submit `word`, answering validation with `valid`
    fn guess(engine: &mut GameEngine, word: &str, valid: bool) -> Option<Command> {
        type_word(engine, word);
        let Some(Command::Validate(text)) = engine.handle(InputEvent::Enter) else {
            panic!("full row should request validation");
        };
        assert_eq!(text, word);
        engine.complete(Completion::Validated {
            guess: text,
            result: Ok(valid),
        })
    }

    #[test]
    fn initial_state() {
        let engine = engine("crate");
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!((engine.current_row(), engine.current_col()), (0, 0));
        assert!(engine.clock_running());
        assert!(!engine.is_busy());
        assert_eq!(engine.board().rows(), 6);
        assert_eq!(engine.keyboard(), &Keyboard::new());
    }

    #[test]
    fn history_load_blocks_until_complete() {
        let mut engine = GameEngine::new(
            IdentitySeed::fallback("x").identifier(),
            Word::new("crate").unwrap(),
        );
        engine.start();
        assert!(engine.is_busy());
        engine.handle(InputEvent::Letter('c'));
        assert_eq!(engine.current_col(), 0);
    }

    #[test]
    fn letters_and_backspace_edit_current_row() {
        let mut engine = engine("crate");
        type_word(&mut engine, "tra");
        assert_eq!(engine.current_col(), 3);
        assert_eq!(engine.board().row_text(0), "tra");

        engine.handle(InputEvent::Backspace);
        assert_eq!(engine.current_col(), 2);
        assert_eq!(engine.board().row_text(0), "tr");

        // Row is capped at the word length
        type_word(&mut engine, "acexyz");
        assert_eq!(engine.current_col(), 5);
        assert_eq!(engine.board().row_text(0), "trace");
    }

    #[test]
    fn backspace_on_empty_row_is_noop() {
        let mut engine = engine("crate");
        engine.handle(InputEvent::Backspace);
        assert_eq!(engine.current_col(), 0);
    }

    #[test]
    fn partial_row_submit_is_noop() {
        let mut engine = engine("crate");
        type_word(&mut engine, "tra");
        let board_before = engine.board().clone();

        assert_eq!(engine.handle(InputEvent::Enter), None);
        assert!(!engine.is_busy());
        assert_eq!((engine.current_row(), engine.current_col()), (0, 3));
        assert_eq!(engine.board(), &board_before);
    }

    #[test]
    fn invalid_guess_flashes_row_without_advancing() {
        let mut engine = engine("crate");
        assert_eq!(guess(&mut engine, "xxxxx", false), None);

        assert_eq!(engine.phase(), Phase::InvalidFlash);
        assert_eq!((engine.current_row(), engine.current_col()), (0, 5));
        assert!(engine.board().row(0).iter().all(|c| c.color == LetterColor::Flash));
        assert_eq!(engine.board().row_text(0), "xxxxx");
        assert_eq!(engine.keyboard(), &Keyboard::new());

        // Enter again does nothing until the row is edited
        assert_eq!(engine.handle(InputEvent::Enter), None);

        engine.handle(InputEvent::Backspace);
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.current_col(), 4);
        assert!(engine.board().row(0).iter().all(|c| c.color == LetterColor::Blank));
    }

    #[test]
    fn letter_clears_flash() {
        let mut engine = engine("crate");
        guess(&mut engine, "xxxxx", false);
        engine.handle(InputEvent::Letter('a'));
        assert_eq!(engine.phase(), Phase::Playing);
        // Row was full, so the letter itself is dropped
        assert_eq!(engine.board().row_text(0), "xxxxx");
    }

    #[test]
    fn valid_miss_grades_and_advances() {
        let mut engine = engine("crate");
        assert_eq!(guess(&mut engine, "trace", true), None);

        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!((engine.current_row(), engine.current_col()), (1, 0));
        let colors: Vec<LetterColor> = engine.board().row(0).iter().map(|c| c.color).collect();
        assert_eq!(colors, Feedback::parse("YGGYG").unwrap().colors());
        assert_eq!(engine.keyboard().color(b't'), LetterColor::Yellow);
        assert_eq!(engine.keyboard().color(b'r'), LetterColor::Green);
    }

    #[test]
    fn win_appends_once_then_post_game() {
        let mut engine = engine("crate");
        guess(&mut engine, "trace", true);
        let command = guess(&mut engine, "crate", true);

        let Some(Command::Append(identifier, result)) = command else {
            panic!("win should append a result");
        };
        assert_eq!(&identifier, engine.identifier());
        assert_eq!(result.guess_count, 2);
        assert_eq!(result.word, "crate");
        assert_eq!(engine.phase(), Phase::Won);
        assert!(!engine.clock_running());
        assert!(engine.is_busy());

        // Input is held while the append is outstanding
        assert_eq!(engine.handle(InputEvent::Restart), None);

        engine.complete(Completion::Appended(Ok(())));
        assert_eq!(engine.phase(), Phase::PostGame);
        assert_eq!(engine.snapshot().stats.count, 1);
        assert_eq!(engine.snapshot().stats.histogram[1], 1);
    }

    #[test]
    fn failed_append_still_shows_post_game() {
        let mut engine = engine("crate");
        guess(&mut engine, "crate", true);
        engine.complete(Completion::Appended(Err(StorageError::Task("disk full".into()))));

        assert_eq!(engine.phase(), Phase::PostGame);
        assert!(engine.notice().is_some());
    }

    #[test]
    fn loss_after_every_row_records_nothing() {
        let mut engine = engine("crate");
        for row in 0..6 {
            assert_eq!(engine.phase(), Phase::Playing, "row {row}");
            assert_eq!(guess(&mut engine, "slate", true), None);
        }

        assert_eq!(engine.phase(), Phase::Lost);
        assert!(!engine.clock_running());
        assert!(engine.history().is_empty());

        // Nothing more can be typed
        engine.handle(InputEvent::Letter('a'));
        assert_eq!(engine.current_col(), 5);
        assert_eq!(engine.handle(InputEvent::Enter), None);
    }

    #[test]
    fn source_failure_keeps_row_and_sets_notice() {
        let mut engine = engine("crate");
        type_word(&mut engine, "trace");
        let Some(Command::Validate(text)) = engine.handle(InputEvent::Enter) else {
            panic!("expected validate");
        };
        engine.complete(Completion::Validated {
            guess: text,
            result: Err(WordSourceError::Unavailable("timeout".into())),
        });

        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!((engine.current_row(), engine.current_col()), (0, 5));
        assert!(engine.notice().is_some());
        assert!(matches!(engine.handle(InputEvent::Enter), Some(Command::Validate(_))));
    }

    #[test]
    fn restart_only_from_complete() {
        let mut engine = engine("crate");
        assert_eq!(engine.handle(InputEvent::Restart), None);

        guess(&mut engine, "crate", true);
        engine.complete(Completion::Appended(Ok(())));
        assert_eq!(engine.handle(InputEvent::Restart), Some(Command::FetchWord(5)));

        engine.complete(Completion::WordFetched(Ok(Word::new("slate").unwrap())));
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.secret().text(), "slate");
        assert_eq!((engine.current_row(), engine.current_col()), (0, 0));
        assert_eq!(engine.keyboard(), &Keyboard::new());
        assert!(engine.clock_running());
        // History is kept across games on one connection
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn restart_after_loss_and_fetch_failure() {
        let mut engine = engine("crate");
        for _ in 0..6 {
            guess(&mut engine, "slate", true);
        }
        assert_eq!(engine.handle(InputEvent::Restart), Some(Command::FetchWord(5)));
        engine.complete(Completion::WordFetched(Err(WordSourceError::NoWordsOfLength(5))));

        assert_eq!(engine.phase(), Phase::Lost);
        assert!(engine.notice().is_some());
        assert!(engine.handle(InputEvent::Restart).is_some());
    }

    #[test]
    fn toggle_reveal_in_any_state() {
        let mut engine = engine("crate");
        engine.handle(InputEvent::ToggleReveal);
        assert!(engine.snapshot().show_secret);
        guess(&mut engine, "crate", true);
        engine.handle(InputEvent::ToggleReveal);
        assert!(!engine.snapshot().show_secret);
        assert_eq!(engine.phase(), Phase::Won);
    }

    #[test]
    fn history_failure_degrades_to_empty() {
        let mut engine = GameEngine::new(
            IdentitySeed::fallback("x").identifier(),
            Word::new("crate").unwrap(),
        );
        engine.start();
        engine.complete(Completion::HistoryLoaded(Err(StorageError::Task("gone".into()))));

        assert!(!engine.is_busy());
        assert!(engine.snapshot().stats.is_empty());
        assert!(engine.notice().is_some());
    }

    #[test]
    fn disconnect_stops_further_persistence() {
        let mut engine = engine("crate");
        type_word(&mut engine, "crate");
        let command = engine.handle(InputEvent::Enter);
        assert!(command.is_some());

        engine.handle(InputEvent::Disconnect);
        assert!(engine.is_terminated());
        let after = engine.complete(Completion::Validated {
            guess: "crate".into(),
            result: Ok(true),
        });
        assert_eq!(after, None);
    }

    #[test]
    fn mismatched_completion_is_ignored() {
        let mut engine = engine("crate");
        type_word(&mut engine, "trace");
        engine.handle(InputEvent::Enter);
        engine.complete(Completion::Appended(Ok(())));

        assert!(engine.is_busy());
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn win_detection_matches_all_green() {
        for secret in ["crate", "error", "aaaaa"] {
            let mut engine = engine(secret);
            assert!(guess(&mut engine, secret, true).is_some());
            assert_eq!(engine.phase(), Phase::Won);
        }
    }
}

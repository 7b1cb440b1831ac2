//! Best-colour-per-letter keyboard tracking
//!
//! Indexed by letter offset (`b'a'` = 0). A stored colour only ever moves
//! toward green.

use super::{Feedback, LetterColor, Word};

/// QWERTY rows in display order
pub const KEY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Keyboard state: the best colour ever observed for each of the 26 letters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard([LetterColor; 26]);

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    /// All letters blank
    #[must_use]
    pub const fn new() -> Self {
        Self([LetterColor::Blank; 26])
    }

    /// Current colour of `letter`; non-letters read as blank
    #[must_use]
    pub fn color(&self, letter: u8) -> LetterColor {
        Self::index(letter).map_or(LetterColor::Blank, |i| self.0[i])
    }

    /// Merge one observation, keeping the better of the stored and new colour
    ///
    /// Only grading verdicts reach the keyboard; Flash marks a rejected row
    /// and is dropped here.
    pub fn merge(&mut self, letter: u8, color: LetterColor) {
        if !color.is_verdict() {
            return;
        }
        if let Some(i) = Self::index(letter)
            && color < self.0[i]
        {
            self.0[i] = color;
        }
    }

    /// Merge every verdict of a graded guess
    pub fn merge_feedback(&mut self, guess: &Word, feedback: &Feedback) {
        for (&letter, &color) in guess.chars().iter().zip(feedback.colors()) {
            self.merge(letter, color);
        }
    }

    #[inline]
    fn index(letter: u8) -> Option<usize> {
        letter
            .to_ascii_lowercase()
            .checked_sub(b'a')
            .map(usize::from)
            .filter(|&i| i < 26)
    }
}

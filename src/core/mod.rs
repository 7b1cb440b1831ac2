//! Core domain types for Wordle
//!
//! This module contains the pure game rules with no I/O: words, grading,
//! keyboard aggregation and the board grid.

mod board;
mod color;
mod feedback;
mod keyboard;
mod word;

pub use board::{Board, Cell};
pub use color::LetterColor;
pub use feedback::Feedback;
pub use keyboard::{KEY_ROWS, Keyboard};
pub use word::{Word, WordError};

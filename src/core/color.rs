//! Letter colours shown on the board and keyboard
//!
//! The declaration order is the aggregation priority, best first:
//! `Green < Yellow < Grey < Blank < Flash`.

use std::fmt;

/// Colour of a board cell or keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LetterColor {
    /// Letter in the correct position
    Green,
    /// Letter present elsewhere in the word
    Yellow,
    /// Letter absent from the word
    Grey,
    /// Unfilled or ungraded
    #[default]
    Blank,
    /// Transient marker for a rejected guess
    Flash,
}

impl LetterColor {
    /// Whether this colour is a grading verdict (green, yellow or grey)
    #[inline]
    #[must_use]
    pub const fn is_verdict(self) -> bool {
        matches!(self, Self::Green | Self::Yellow | Self::Grey)
    }

    const fn code(self) -> char {
        match self {
            Self::Green => 'G',
            Self::Yellow => 'Y',
            Self::Grey => '-',
            Self::Blank => '.',
            Self::Flash => '!',
        }
    }

    /// Emoji square for share-style output
    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::Green => '🟩',
            Self::Yellow => '🟨',
            Self::Grey | Self::Blank => '⬜',
            Self::Flash => '🟥',
        }
    }
}

impl fmt::Display for LetterColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_best_first() {
        assert!(LetterColor::Green < LetterColor::Yellow);
        assert!(LetterColor::Yellow < LetterColor::Grey);
        assert!(LetterColor::Grey < LetterColor::Blank);
        assert!(LetterColor::Blank < LetterColor::Flash);
    }

    #[test]
    fn default_is_blank() {
        assert_eq!(LetterColor::default(), LetterColor::Blank);
    }

    #[test]
    fn only_graded_colors_are_verdicts() {
        assert!(LetterColor::Green.is_verdict());
        assert!(LetterColor::Yellow.is_verdict());
        assert!(LetterColor::Grey.is_verdict());
        assert!(!LetterColor::Blank.is_verdict());
        assert!(!LetterColor::Flash.is_verdict());
    }
}

//! Wordle feedback calculation and representation
//!
//! Feedback holds one verdict per guessed letter:
//! - Green (letter in correct position)
//! - Yellow (letter in word, wrong position)
//! - Grey (letter not in word, or all its occurrences already consumed)

use super::{LetterColor, Word};

/// Per-letter verdicts for one graded guess
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feedback(Vec<LetterColor>);

impl Feedback {
    /// Grade `guess` against `secret`
    ///
    /// Implements Wordle's feedback rules, including duplicate letters.
    ///
    /// # Algorithm
    /// 1. First pass: mark exact position matches green and consume that
    ///    position of the secret.
    /// 2. Second pass: for each remaining guess letter, in guess order, scan
    ///    the secret left to right and take the earliest unconsumed position
    ///    holding the same letter (yellow), otherwise grey.
    ///
    /// Both words must have the same length; extra letters of a longer guess
    /// are graded grey.
    ///
    /// # Examples
    /// ```
    /// use wordle_server::core::{Feedback, Word};
    ///
    /// let secret = Word::new("error").unwrap();
    /// let guess = Word::new("rarer").unwrap();
    /// let feedback = Feedback::calculate(&secret, &guess);
    ///
    /// assert_eq!(feedback.to_string(), "Y-GYG");
    /// ```
    #[must_use]
    pub fn calculate(secret: &Word, guess: &Word) -> Self {
        debug_assert_eq!(secret.len(), guess.len(), "grading needs equal lengths");

        let secret = secret.chars();
        let guess = guess.chars();
        let mut result = vec![LetterColor::Grey; guess.len()];
        let mut consumed = vec![false; secret.len()];

        // First pass: greens
        for (i, (&g, &s)) in guess.iter().zip(secret).enumerate() {
            if g == s {
                result[i] = LetterColor::Green;
                consumed[i] = true;
            }
        }

        // Second pass: yellows, earliest unconsumed occurrence in the secret
        for (i, &g) in guess.iter().enumerate() {
            if result[i] == LetterColor::Green {
                continue;
            }
            let found = secret
                .iter()
                .zip(consumed.iter())
                .position(|(&s, &used)| !used && s == g);
            if let Some(j) = found {
                result[i] = LetterColor::Yellow;
                consumed[j] = true;
            }
        }

        Self(result)
    }

    /// Verdicts in guess order
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[LetterColor] {
        &self.0
    }

    /// Check if this is a winning guess (all greens)
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&c| c == LetterColor::Green)
    }

    /// Count the number of green verdicts
    #[must_use]
    pub fn count_greens(&self) -> usize {
        self.0.iter().filter(|&&c| c == LetterColor::Green).count()
    }

    /// Count the number of yellow verdicts
    #[must_use]
    pub fn count_yellows(&self) -> usize {
        self.0.iter().filter(|&&c| c == LetterColor::Yellow).count()
    }

    /// Parse feedback from a string like "GY-GY" or "🟩🟨⬜🟩🟨"
    #[cfg(test)]
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        s.chars()
            .map(|ch| match ch {
                'G' | 'g' | '🟩' => Some(LetterColor::Green),
                'Y' | 'y' | '🟨' => Some(LetterColor::Yellow),
                '-' | '_' | '⬜' => Some(LetterColor::Grey),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Convert feedback to an emoji string like "🟩🟨⬜🟩🟨"
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|c| c.emoji()).collect()
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for color in &self.0 {
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

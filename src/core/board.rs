//! Fixed-shape grid of guess cells

use super::{Feedback, LetterColor};

/// One square on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub letter: Option<u8>,
    pub color: LetterColor,
}

/// A `rows × cols` matrix of cells; the shape never changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Empty board for a given word length: `difficulty + 1` rows of `difficulty` cells
    #[must_use]
    pub fn for_difficulty(difficulty: usize) -> Self {
        Self::new(difficulty + 1, difficulty)
    }

    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[self.offset(row, col)]
    }

    /// Cells of one row
    #[must_use]
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    pub fn set_letter(&mut self, row: usize, col: usize, letter: Option<u8>) {
        let offset = self.offset(row, col);
        self.cells[offset].letter = letter;
    }

    /// Paint every cell of `row` with one colour
    pub fn paint_row(&mut self, row: usize, color: LetterColor) {
        let start = row * self.cols;
        for cell in &mut self.cells[start..start + self.cols] {
            cell.color = color;
        }
    }

    /// Copy graded verdicts onto `row`
    pub fn apply_feedback(&mut self, row: usize, feedback: &Feedback) {
        let start = row * self.cols;
        for (cell, &color) in self.cells[start..start + self.cols]
            .iter_mut()
            .zip(feedback.colors())
        {
            cell.color = color;
        }
    }

    /// Letters of `row` as text, skipping empty cells
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        self.row(row)
            .iter()
            .filter_map(|c| c.letter.map(char::from))
            .collect()
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of bounds");
        row * self.cols + col
    }
}

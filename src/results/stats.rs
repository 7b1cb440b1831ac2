//! Aggregate statistics over a player's history

use super::GameResult;

/// Summary shown after a game
///
/// With no history every average is `0.0` and the histogram is all zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    /// `histogram[i]` counts wins in `i + 1` guesses
    pub histogram: Vec<u32>,
    pub average_guesses: f64,
    pub average_seconds: f64,
    pub count: usize,
}

impl StatsSummary {
    /// Summarize `history` for a board with `rows` rows
    ///
    /// Results with a guess count outside `1..=rows` (recorded at another
    /// difficulty) still count toward the averages but land in no bucket.
    #[must_use]
    pub fn summarize(history: &[GameResult], rows: usize) -> Self {
        let mut histogram = vec![0u32; rows];
        let mut total_guesses = 0.0;
        let mut total_seconds = 0.0;

        for result in history {
            if let Some(bucket) = (result.guess_count as usize)
                .checked_sub(1)
                .and_then(|i| histogram.get_mut(i))
            {
                *bucket += 1;
            }
            total_guesses += f64::from(result.guess_count);
            total_seconds += result.elapsed_seconds;
        }

        let count = history.len();
        let (average_guesses, average_seconds) = if count == 0 {
            (0.0, 0.0)
        } else {
            (total_guesses / count as f64, total_seconds / count as f64)
        };

        Self {
            histogram,
            average_guesses,
            average_seconds,
            count,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Share of all games falling in `bucket` (0.0 when there is no history)
    #[must_use]
    pub fn fraction(&self, bucket: usize) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.histogram
            .get(bucket)
            .map_or(0.0, |&n| f64::from(n) / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(guess_count: u32, elapsed_seconds: f64) -> GameResult {
        GameResult {
            elapsed_seconds,
            guess_count,
            word: "crate".to_string(),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_uses_zero_sentinel() {
        let stats = StatsSummary::summarize(&[], 6);
        assert!(stats.is_empty());
        assert_eq!(stats.histogram, vec![0; 6]);
        assert!(stats.average_guesses.abs() < f64::EPSILON);
        assert!(stats.average_seconds.abs() < f64::EPSILON);
        assert!(stats.fraction(0).abs() < f64::EPSILON);
    }

    #[test]
    fn averages_and_histogram() {
        let history = [result(3, 30.0), result(4, 50.0), result(3, 10.0), result(6, 70.0)];
        let stats = StatsSummary::summarize(&history, 6);

        assert_eq!(stats.count, 4);
        assert_eq!(stats.histogram, vec![0, 0, 2, 1, 0, 1]);
        assert!((stats.average_guesses - 4.0).abs() < 1e-9);
        assert!((stats.average_seconds - 40.0).abs() < 1e-9);
        assert!((stats.fraction(2) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_guess_counts_skip_histogram() {
        let history = [result(7, 10.0), result(0, 10.0), result(1, 10.0)];
        let stats = StatsSummary::summarize(&history, 6);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.histogram.iter().sum::<u32>(), 1);
        assert_eq!(stats.histogram[0], 1);
    }
}

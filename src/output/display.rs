//! Display functions for the `stats` command

use std::time::Duration;

use colored::Colorize;

use super::formatters::{format_elapsed, guess_noun};
use crate::results::{GameResult, StatsSummary};
use crate::session::Identifier;

const BAR_WIDTH: usize = 40;

/// Print a player's stored history and summary
pub fn print_player_stats(identifier: &Identifier, history: &[GameResult], rows: usize) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "PLAYER:".bright_cyan().bold(),
        identifier.short().bright_yellow().bold()
    );
    println!("{}", "═".repeat(60).cyan());

    let stats = StatsSummary::summarize(history, rows);
    if stats.is_empty() {
        println!("\n   {}", "No games won yet.".bright_black());
        return;
    }

    println!("\n📊 {}", "Performance:".bright_cyan().bold());
    println!("   Games won:        {}", stats.count);
    println!(
        "   Average guesses:  {}",
        format!("{:.2}", stats.average_guesses)
            .bright_yellow()
            .bold()
    );
    println!("   Average time:     {:.2}s", stats.average_seconds);
    if let Some(best) = history.iter().map(|r| r.guess_count).min() {
        println!(
            "   Best game:        {}",
            format!("{best} {}", guess_noun(best)).green()
        );
    }
    if let Some(last) = history.last() {
        println!(
            "   Last win:         {} in {} ({})",
            last.word.to_uppercase().bold(),
            format_elapsed(Duration::from_secs_f64(last.elapsed_seconds.max(0.0))),
            last.completed_at.format("%Y-%m-%d %H:%M UTC")
        );
    }

    println!("\n📈 {}", "Distribution:".bright_cyan().bold());
    for (i, &count) in stats.histogram.iter().enumerate() {
        let pct = stats.fraction(i) * 100.0;
        let filled = ((stats.fraction(i) * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
        let bar = format!(
            "{}{}",
            "█".repeat(filled).green(),
            "░".repeat(BAR_WIDTH - filled).bright_black()
        );
        println!("   {}: {bar} {count:4} ({pct:5.1}%)", i + 1);
    }
}

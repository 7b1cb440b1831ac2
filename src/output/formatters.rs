//! Formatting utilities shared by the terminal renderer and CLI output

use std::time::Duration;

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value.is_nan() {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max).clamp(0.0, 1.0) * width as f64) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Human-readable elapsed time: `42s`, `3m07s`, `1h02m`
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m{:02}s", secs / 60, secs % 60),
        _ => format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60),
    }
}

/// "guess" or "guesses"
#[must_use]
pub const fn guess_noun(count: u32) -> &'static str {
    if count == 1 { "guess" } else { "guesses" }
}

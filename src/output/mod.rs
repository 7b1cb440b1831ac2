//! Terminal output formatting
//!
//! Shared formatting helpers plus colored printing for the admin CLI.

pub mod display;
pub mod formatters;

pub use display::print_player_stats;

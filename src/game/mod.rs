//! Game lifecycle for one connection
//!
//! [`GameEngine`] consumes [`InputEvent`]s one at a time and hands I/O back
//! to its session as [`Command`]s.

mod engine;
mod event;
mod timer;

pub use engine::{GameEngine, Snapshot};
pub use event::{Command, Completion, InputEvent, Phase};
pub use timer::Stopwatch;

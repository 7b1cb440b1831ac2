//! Wordle Server
//!
//! Serves Wordle to many remote terminals at once. Each connection gets its
//! own game engine; finished games are stored per player so statistics can
//! be shown after every win.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_server::core::{Feedback, Word};
//!
//! let secret = Word::new("crate").unwrap();
//! let guess = Word::new("trace").unwrap();
//!
//! let feedback = Feedback::calculate(&secret, &guess);
//! assert_eq!(feedback.to_string(), "YGGYG");
//! ```

// Core domain types
pub mod core;

// Per-connection game state machine
pub mod game;

// Result history and statistics
pub mod results;

// Word sources
pub mod words;

// Remote terminal rendering
pub mod render;

// Player identity and session loop
pub mod session;

// Telnet front end
pub mod transport;

// Startup configuration
pub mod config;

// Terminal output formatting
pub mod output;

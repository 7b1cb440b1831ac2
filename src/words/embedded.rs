//! Built-in word lists
//!
//! Generated by `build.rs` from `data/answers.txt` (secret candidates) and
//! `data/allowed.txt` (extra acceptable guesses).

include!(concat!(env!("OUT_DIR"), "/answers.rs"));
include!(concat!(env!("OUT_DIR"), "/allowed.rs"));

//! numbers-station CLI library.
//!
//! Command implementations behind the `numstation` binary. Status output goes
//! to stderr so that `-o -` leaves stdout carrying only audio bytes.

pub mod commands;
pub mod status;

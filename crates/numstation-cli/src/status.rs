//! Human-readable status lines on stderr.

use colored::Colorize;
use std::fmt::Display;

/// Prints status lines unless quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Status {
    quiet: bool,
}

impl Status {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// A bold cyan heading followed by a value.
    pub fn step(&self, label: &str, value: impl Display) {
        if !self.quiet {
            eprintln!("{} {}", label.cyan().bold(), value);
        }
    }

    /// An indented detail line.
    pub fn item(&self, value: impl Display) {
        if !self.quiet {
            eprintln!("  {} {}", "->".green(), value);
        }
    }

    pub fn warn(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("  {} {}", "!!".yellow(), message);
        }
    }

    pub fn success(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{} {}", "SUCCESS".green().bold(), message);
        }
    }
}

//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Success marker
pub const CHECK: &str = "✓";

/// Marker for branches behind their PR
pub const WARNING: &str = "!";

/// Semantic colors, applied only when stdout supports them
pub trait Stylize: Display {
    /// Secondary text
    fn muted(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    /// Headings
    fn emphasis(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    /// Names and counts
    fn accent(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    /// Good outcomes
    fn success(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }

    /// Things to look at
    fn warn(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }

    /// Failures and closed PRs
    fn error(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.red())
            .to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Yellow warning marker
pub fn warning() -> String {
    WARNING.warn()
}

/// Spinner style used while talking to the platform
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

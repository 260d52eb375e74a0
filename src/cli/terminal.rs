//! Terminal capability detection and styling

use owo_colors::{colors::css, OwoColorize};

/// Whether stdout accepts colour escapes
#[must_use]
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Terminal width in columns, if stdout is a terminal
#[must_use]
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(w, _)| usize::from(w.0))
}

/// Styles for the different kinds of output
pub trait Colorize {
    /// A completed action (green)
    fn success(&self) -> String;
    /// Something the user should look at (amber)
    fn warning(&self) -> String;
    /// Neutral highlights (blue)
    fn info(&self) -> String;
    /// Secondary text
    fn dim(&self) -> String;
    /// Something that needs attention now (bold red)
    fn alert(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        paint(self, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }

    fn alert(&self) -> String {
        paint(self, |s| s.fg::<css::Red>().bold().to_string())
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn alert(&self) -> String {
        self.as_str().alert()
    }
}

fn paint(s: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(s)
    } else {
        s.to_string()
    }
}

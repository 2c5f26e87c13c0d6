//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the toolbelt CLI.
//! Errors always go to stderr; everything else goes to the configured stream.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Where non-error output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
    stream: Stream,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self {
            colored: true,
            stream: Stream::Stdout,
        }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self {
            colored: false,
            stream: Stream::Stdout,
        }
    }

    /// Send all non-error output to stderr instead of stdout
    pub fn on_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    fn emit(&self, line: impl Display) {
        match self.stream {
            Stream::Stdout => println!("{}", line),
            Stream::Stderr => eprintln!("{}", line),
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            self.emit(format!("  {} {}", "⚠".yellow().bold(), message.yellow()));
        } else {
            self.emit(format!("  [WARN] {}", message));
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            self.emit(format!("\n  {}", title.bright_white().bold().underline()));
        } else {
            self.emit(format!("\n  === {} ===", title));
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            self.emit(format!("\n  {}", title.cyan().bold()));
        } else {
            self.emit(format!("\n  --- {} ---", title));
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            self.emit(format!("    {}: {}", key.dimmed(), value.bright_white()));
        } else {
            self.emit(format!("    {}: {}", key, value));
        }
    }

    /// Print a credential status line: marker, name, state, then what it is for
    pub fn status(&self, name: &str, set: bool, detail: &str, description: &str) {
        match (self.colored, set) {
            (true, true) => self.emit(format!(
                "    {} {:<24} {:<28} {}",
                "✓".green().bold(),
                name,
                detail.green(),
                description.dimmed()
            )),
            (true, false) => self.emit(format!(
                "    {} {:<24} {:<28} {}",
                "○".yellow(),
                name,
                detail.yellow(),
                description.dimmed()
            )),
            (false, true) => self.emit(format!("    [OK] {:<24} {:<28} {}", name, detail, description)),
            (false, false) => self.emit(format!("    [--] {:<24} {:<28} {}", name, detail, description)),
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            self.emit(format!("    {} {}", "•".blue(), item));
        } else {
            self.emit(format!("    - {}", item));
        }
    }

    /// Print one tool as `name  description`
    pub fn tool(&self, name: &str, description: &str) {
        if self.colored {
            self.emit(format!("{:<28} {}", name.bright_cyan(), description.dimmed()));
        } else {
            self.emit(format!("{:<28} {}", name, description));
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            self.emit(format!("\n  {} {}", "💡".dimmed(), message.dimmed().italic()));
        } else {
            self.emit(format!("\n  [TIP] {}", message));
        }
    }

    /// Print a JSON value, never colored
    pub fn json(&self, value: &serde_json::Value) -> serde_json::Result<()> {
        self.emit(serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

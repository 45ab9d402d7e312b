//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Output and error sinks used by commands.
pub trait Ui: Send + Sync {
    /// Write command output (stdout).
    fn output(&self, msg: &str);

    /// Write an error message (stderr).
    fn error(&self, msg: &str);
}

/// [`Ui`] writing to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleUi;

impl Ui for ConsoleUi {
    fn output(&self, msg: &str) {
        info(msg);
    }

    fn error(&self, msg: &str) {
        error(msg);
    }
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print plain output (no color, for data and tables)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

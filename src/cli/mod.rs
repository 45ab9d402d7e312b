//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{ArgParser, BootstrapArgs, ClapArgParser, Parsed};
pub use commands::BootstrapCommand;
pub use error::{CliError, CliResult};
pub use output::{ConsoleUi, Ui};

//! CLI argument definitions using clap

use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};

use crate::cli::{CliError, CliResult};

/// One-line description shown in command listings.
pub const SYNOPSIS: &str = "Bootstrap the ACL system for initial token";

/// Bootstrap is used to bootstrap the ACL system and get an initial token.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "aclboot")]
#[command(author, version, about = SYNOPSIS, long_about = None)]
pub struct BootstrapArgs {
    /// Output the bootstrap response in JSON format
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        hide_default_value = true
    )]
    pub json: bool,

    /// Format and display the bootstrap response using a template, e.g. '{{.SecretID}}'
    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true
    )]
    pub template: String,

    /// Provide an operator generated management token
    #[arg(
        long = "bootstrap-token",
        value_name = "SECRET",
        default_value = "",
        hide_default_value = true,
        allow_hyphen_values = true
    )]
    pub bootstrap_token: String,

    /// Control-plane address (overrides config and ACLBOOT_ADDRESS)
    #[arg(long, value_name = "URL")]
    pub address: Option<String>,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completion: Option<clap_complete::Shell>,

    /// Positional arguments are rejected by the command
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

/// Result of parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Args(BootstrapArgs),
    /// Help or version was requested; carries the rendered text.
    Help(String),
}

/// Stateless flag parsing and help text, injected into the command.
pub trait ArgParser: Send + Sync {
    fn parse(&self, args: &[String]) -> CliResult<Parsed>;
    fn help(&self) -> String;
    fn synopsis(&self) -> &'static str;
}

/// clap-backed [`ArgParser`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ClapArgParser;

impl ArgParser for ClapArgParser {
    fn parse(&self, args: &[String]) -> CliResult<Parsed> {
        let argv = std::iter::once("aclboot".to_string()).chain(normalize_flags(args));
        match BootstrapArgs::try_parse_from(argv) {
            Ok(parsed) => Ok(Parsed::Args(parsed)),
            Err(e) => match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    Ok(Parsed::Help(e.to_string().trim_end().to_string()))
                }
                _ => {
                    let message = e.to_string();
                    let message = message.strip_prefix("error: ").unwrap_or(&message);
                    Err(CliError::Usage(message.trim_end().to_string()))
                }
            },
        }
    }

    fn help(&self) -> String {
        BootstrapArgs::command().render_long_help().to_string()
    }

    fn synopsis(&self) -> &'static str {
        SYNOPSIS
    }
}

/// Long flags also accepted with a single dash (`-json`, `-bootstrap-token=...`).
const SINGLE_DASH_LONG_FLAGS: &[&str] = &[
    "json",
    "template",
    "bootstrap-token",
    "address",
    "completion",
    "help",
    "version",
];

/// Flags whose value may follow as a separate argument.
const VALUE_FLAGS: &[&str] = &[
    "-t",
    "--template",
    "--bootstrap-token",
    "--address",
    "--completion",
];

/// Rewrite single-dash long flags into clap's `--flag` form.
///
/// Values of value-taking flags and everything after `--` are left untouched.
pub fn normalize_flags(args: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut expect_value = false;
    let mut passthrough = false;

    for arg in args {
        if passthrough || expect_value {
            expect_value = false;
            out.push(arg.clone());
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg.clone());
            continue;
        }

        let rewritten = match arg.strip_prefix('-') {
            Some(rest) if !rest.starts_with('-') => {
                let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                if SINGLE_DASH_LONG_FLAGS.contains(&name) {
                    format!("-{arg}")
                } else {
                    arg.clone()
                }
            }
            _ => arg.clone(),
        };

        expect_value = VALUE_FLAGS.contains(&rewritten.as_str());
        out.push(rewritten);
    }
    out
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::ffi::OsString;

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `herald`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "herald",
    version,
    about = "Run a command and report its result to handler programs.",
    long_about = None,
    override_usage = "herald [OPTIONS] --reporter <CMD> -- <COMMAND>..."
)]
pub struct CliArgs {
    /// Handler that receives the final report as JSON on stdin.
    ///
    /// Shell syntax, e.g. `-r 'ruby /path/to/reporter.rb'`. Repeatable.
    #[arg(short = 'r', long = "reporter", value_name = "CMD")]
    pub reporters: Vec<String>,

    /// Handler notified when the command starts. Repeatable.
    #[arg(short = 'n', long = "noticer", value_name = "CMD")]
    pub noticers: Vec<String>,

    /// Prefix each line of the merged output with a timestamp.
    #[arg(short = 'T', long)]
    pub timestamp: bool,

    /// Tag of the job.
    #[arg(short = 't', long, value_name = "NAME")]
    pub tag: Option<String>,

    /// Always exit 0, whatever the command returned.
    #[arg(short = 'o', long)]
    pub override_status: bool,

    /// Verbose diagnostics on stderr; stack for more (`-vv`, `-vvv`).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over `-v`. If neither is given, `HERALD_LOG` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Append merged output to this file. strftime patterns such as
    /// `%Y%m%d` are expanded at start.
    #[arg(short = 'l', long = "log", value_name = "PATH")]
    pub log: Option<String>,

    /// Path to a TOML config file (default: `HERALD_CONFIG`).
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<String>,

    /// The command to supervise and its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Fallible parse, for callers that decide the exit code themselves.
pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}

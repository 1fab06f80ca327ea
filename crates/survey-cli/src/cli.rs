//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use survey_protocol::DecodeOptions;

#[derive(Parser)]
#[command(
    name = "survey",
    version,
    about = "Survey protocol compiler - validate protocols and derive storage and form schemas",
    long_about = "Validate a survey protocol document and compile it into the storage\n\
                  schema of a survey database or the data-entry form of a dialog."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode and validate a protocol, then summarize its contents.
    Check(CheckArgs),

    /// Compile the storage schema a survey database would be created with.
    Storage(StorageArgs),

    /// Compile the data-entry form for the mission or one feature.
    Form(FormArgs),
}

#[derive(Args)]
pub struct ProtocolArgs {
    /// Path to the protocol document (JSON).
    #[arg(value_name = "PROTOCOL")]
    pub protocol: PathBuf,

    /// Skip cross-reference checks on legacy (meta-version 1) documents.
    #[arg(long = "skip-validation", conflicts_with = "force_validation")]
    pub skip_validation: bool,

    /// Run cross-reference checks on legacy documents too.
    #[arg(long = "force-validation")]
    pub force_validation: bool,
}

impl ProtocolArgs {
    pub fn decode_options(&self) -> DecodeOptions {
        let options = DecodeOptions::new();
        if self.skip_validation {
            options.skip_validation(true)
        } else if self.force_validation {
            options.skip_validation(false)
        } else {
            options
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,
}

#[derive(Args)]
pub struct StorageArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,

    /// Baseline storage schema (TOML). Defaults to $SURVEY_BASELINE_SCHEMA,
    /// then the built-in baseline.
    #[arg(long = "baseline", value_name = "PATH")]
    pub baseline: Option<PathBuf>,

    /// Print the schema as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct FormArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,

    /// Feature whose dialog to compile (default: the mission dialog).
    #[arg(long = "feature", value_name = "NAME")]
    pub feature: Option<String>,

    /// Current record values, a JSON object keyed by attribute name.
    #[arg(long = "record", value_name = "FILE")]
    pub record: Option<PathBuf>,

    /// Fill unset record values from the dialog's defaults first.
    #[arg(long = "init")]
    pub init: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

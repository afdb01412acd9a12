//! CLI argument definitions for the cohort builder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use cohort_cli::pipeline::ColumnOverrides;
use cohort_model::Endpoint;

#[derive(Parser)]
#[command(
    name = "dhs-cohort",
    version,
    about = "Build child-mortality survival cohorts from DHS birth recode extracts",
    long_about = "Build an analysis-ready child-mortality cohort from a DHS birth recode extract.\n\n\
                  Drops records with age-at-death quality flags, derives age in months and \
                  vital status, and adds under-5 and under-1 event indicators."
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

    /// Log output format.
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
    /// Build the cohort and print its diagnostics.
    Build(BuildArgs),

    /// Show how a variable schema resolves to column names.
    Schema(SchemaArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Survey data file (CSV, one row per child).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Variable schema file (CSV with Name, Type and Recoded columns).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Read source columns under their DHS recode names (b6, b7, b13, hw1).
    #[arg(long = "dhs-codes")]
    pub dhs_codes: bool,

    /// Column holding the age-at-death quality flag.
    #[arg(long = "flag-column", value_name = "NAME")]
    pub flag_column: Option<String>,

    /// Column holding the imputed age at death in months.
    #[arg(long = "imputed-age-column", value_name = "NAME")]
    pub imputed_age_column: Option<String>,

    /// Column holding the current age in months of living children.
    #[arg(long = "current-age-column", value_name = "NAME")]
    pub current_age_column: Option<String>,

    /// Column holding the unit-encoded raw age at death.
    #[arg(long = "raw-age-column", value_name = "NAME")]
    pub raw_age_column: Option<String>,

    /// Endpoint used for the survival formula.
    #[arg(long = "endpoint", value_enum, default_value = "u5")]
    pub endpoint: EndpointArg,

    /// Print the first N cohort rows.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,

    /// Print the build report as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

impl BuildArgs {
    pub fn overrides(&self) -> ColumnOverrides {
        ColumnOverrides {
            dhs_codes: self.dhs_codes,
            death_flag: self.flag_column.clone(),
            age_at_death_months_imputed: self.imputed_age_column.clone(),
            current_age_months: self.current_age_column.clone(),
            age_at_death_raw: self.raw_age_column.clone(),
        }
    }
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Variable schema file (CSV with Name, Type and Recoded columns).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EndpointArg {
    U5,
    U1,
}

impl From<EndpointArg> for Endpoint {
    fn from(arg: EndpointArg) -> Self {
        match arg {
            EndpointArg::U5 => Endpoint::U5,
            EndpointArg::U1 => Endpoint::U1,
        }
    }
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

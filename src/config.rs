//! Command-line configuration for the export and report tools.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use jiff::civil::Date;

use crate::reports::{Period, PeriodPreset, ReportError, ReportKind};

/// Register a tool operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Register {
    /// Bidders.
    #[value(name = "licitantes")]
    Bidders,

    /// Bidding processes.
    #[value(name = "licitacoes")]
    BiddingProcesses,

    /// Direct contracts.
    #[value(name = "contratacoes-diretas")]
    DirectContracts,

    /// Penalties.
    #[value(name = "penalidades")]
    Penalties,
}

/// Settings shared by every tool.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory holding the YAML fixture sets
    #[arg(long, env = "LICITA_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Fixture set to load
    #[arg(short, long, env = "LICITA_FIXTURE_SET", default_value = "seed")]
    pub set: String,

    /// Directory the exported files are written to
    #[arg(short, long, env = "LICITA_OUTPUT_DIR", default_value = "target/exports")]
    pub out: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Arguments for the register export tool
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Shared settings.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Register to export
    #[arg(short, long, value_enum, default_value = "licitantes")]
    pub register: Register,

    /// Free-text search applied before exporting
    #[arg(short, long, default_value = "")]
    pub query: String,
}

/// Arguments for the consolidated report tool
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Shared settings.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report kind (licitacoes, licitantes, penalidades)
    #[arg(short, long, default_value = "licitacoes")]
    pub kind: ReportKind,

    /// Predefined period ending today, e.g. "Último Mês"
    #[arg(short, long, conflicts_with_all = ["start", "end"])]
    pub preset: Option<PeriodPreset>,

    /// First day of a custom period (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    pub start: Option<Date>,

    /// Last day of a custom period (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    pub end: Option<Date>,
}

impl ReportArgs {
    /// The period selected on the command line, defaulting to the last month.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom period ends before it starts.
    pub fn period(&self, today: Date) -> Result<Period, ReportError> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Period::new(start, end),
            _ => Ok(Period::preset(
                self.preset.unwrap_or(PeriodPreset::LastMonth),
                today,
            )),
        }
    }
}

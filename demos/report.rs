//! Consolidated Report Example
//!
//! Builds a period report over the seeded registers and writes it as a spreadsheet and a PDF.
//!
//! Use `-k` to pick the report (licitacoes, licitantes, penalidades)
//! Use `-p` for a predefined period, or `--start`/`--end` for a custom one

use std::fs::create_dir_all;

use anyhow::Result;
use clap::Parser;
use jiff::Zoned;
use licita::{
    config::ReportArgs,
    export::table,
    fixtures::Fixture,
    reports::{REPORT_GENERATED, Report},
    screen::{Notifier, TracingNotifier},
};
use tracing_subscriber::EnvFilter;

/// Consolidated Report Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ReportArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.common.log_level))
        .init();

    let fixture = Fixture::with_base_path(&args.common.fixtures).load_set(&args.common.set)?;

    let now = Zoned::now().datetime();
    let period = args.period(now.date())?;

    let report = Report::build(args.kind, period, fixture.registers(), now);

    let mut notifier = TracingNotifier;
    notifier.success(REPORT_GENERATED);

    create_dir_all(&args.common.out)?;

    let workbook = report.write_workbook(&args.common.out, &mut notifier)?;
    let pdf = report.write_pdf(&args.common.out, &mut notifier)?;

    println!("{}", table::render_document(&report.document));
    println!("\n{}\n{}", workbook.display(), pdf.display());

    Ok(())
}

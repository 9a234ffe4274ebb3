//! Register Export Example
//!
//! Loads a fixture set, filters one register by a free-text query and writes its spreadsheet
//! and PDF exports.
//!
//! Use `-r` to pick the register (licitantes, licitacoes, contratacoes-diretas, penalidades)
//! Use `-q` to filter by a free-text query
//! Use `-o` to change the output directory

use std::{fs::create_dir_all, path::Path};

use anyhow::Result;
use clap::Parser;
use jiff::Zoned;
use licita::{
    config::{ExportArgs, Register},
    export::table,
    prelude::*,
};
use tracing_subscriber::EnvFilter;

/// Register Export Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExportArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.common.log_level))
        .init();

    let fixture = Fixture::with_base_path(&args.common.fixtures).load_set(&args.common.set)?;

    create_dir_all(&args.common.out)?;

    let text = TextQuery::new(&args.query);
    let out = args.common.out.as_path();

    let summary = match args.register {
        Register::Bidders => export(
            fixture.bidders().clone(),
            BidderCriteria {
                text,
                ..BidderCriteria::default()
            },
            out,
        )?,
        Register::BiddingProcesses => export(
            fixture.processes().clone(),
            BiddingProcessCriteria {
                text,
                ..BiddingProcessCriteria::default()
            },
            out,
        )?,
        Register::DirectContracts => export(
            fixture.contracts().clone(),
            DirectContractCriteria {
                text,
                ..DirectContractCriteria::default()
            },
            out,
        )?,
        Register::Penalties => export(
            fixture.penalties().clone(),
            PenaltyCriteria {
                text,
                ..PenaltyCriteria::default()
            },
            out,
        )?,
    };

    println!("{summary}");

    Ok(())
}

fn export<E: Exportable>(store: Store<E>, criteria: E::Criteria, out: &Path) -> Result<String> {
    let mut screen = Screen::new(store, TracingNotifier);
    screen.set_criteria(criteria);

    let now = Zoned::now().datetime();

    let workbook = screen.export_workbook(out, now.date())?;
    let pdf = screen.export_pdf(out, now)?;

    let preview = table::render_document(&PdfProjection::of(&screen.visible(), now));

    Ok(format!(
        "{preview}\n\n{}\n{}",
        workbook.display(),
        pdf.display()
    ))
}

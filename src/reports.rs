//! Consolidated Reports
//!
//! Period-bounded reports across the registers, exported the same way as a register but with
//! their own column sets and a `Período` line.

use std::path::{Path, PathBuf};

use jiff::{
    ToSpan,
    civil::{Date, DateTime},
};
use thiserror::Error;
use tracing::info;

use crate::{
    entities::{
        bidders::Bidder,
        bidding_processes::{BiddingProcess, percent_points, savings_ratio},
        penalties::Penalty,
    },
    export::{
        ExportError, PdfProjection, SheetProjection,
        format::{format_file_date, format_period, or_missing},
        format_date, generation_line, pdf, write_file, xlsx,
    },
    labels::labelled_enum,
    money::{brl, format_amount, format_brl},
    records::{Record, utc_date},
    screen::Notifier,
    store::Store,
};

/// Shown once a report has been built.
pub const REPORT_GENERATED: &str = "Relatório gerado com sucesso!";

/// Shown after a report spreadsheet export.
pub const REPORT_XLSX_EXPORTED: &str = "Relatório exportado para Excel com sucesso!";

/// Shown after a report PDF export.
pub const REPORT_PDF_EXPORTED: &str = "Relatório exportado para PDF com sucesso!";

const SHEET_NAME: &str = "Relatório";

/// Errors raised while preparing a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The period ends before it starts.
    #[error("period ends on {end} before it starts on {start}")]
    InvertedPeriod {
        /// First day.
        start: Date,

        /// Last day.
        end: Date,
    },
}

labelled_enum! {
    /// Register a report covers.
    pub enum ReportKind {
        /// Bidding processes with savings.
        BiddingProcesses => "licitacoes",
        /// Bidders.
        Bidders => "licitantes",
        /// Penalties.
        Penalties => "penalidades",
    }
}

impl ReportKind {
    /// Document title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::BiddingProcesses => "Relatório de Licitações",
            Self::Bidders => "Relatório de Licitantes",
            Self::Penalties => "Relatório de Penalidades",
        }
    }

    /// `relatorio_<kind>_<dd-MM-yyyy>.<extension>`.
    pub fn file_name(self, today: Date, extension: &str) -> String {
        format!(
            "relatorio_{}_{}.{extension}",
            self.label(),
            format_file_date(today)
        )
    }
}

labelled_enum! {
    /// Predefined report periods, each ending today.
    pub enum PeriodPreset {
        /// Today only.
        Today => "Hoje",
        /// The last seven days.
        LastWeek => "Última Semana",
        /// The last month.
        LastMonth => "Último Mês",
        /// The last three months.
        LastQuarter => "Último Trimestre",
        /// The last year.
        LastYear => "Último Ano",
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: Date,
    end: Date,
}

impl Period {
    /// The range `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvertedPeriod`] if `end` precedes `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, ReportError> {
        if end < start {
            return Err(ReportError::InvertedPeriod { start, end });
        }

        Ok(Self { start, end })
    }

    /// The range a preset covers, ending on `today`.
    pub fn preset(preset: PeriodPreset, today: Date) -> Self {
        let start = match preset {
            PeriodPreset::Today => today,
            PeriodPreset::LastWeek => today.saturating_sub(1.week()),
            PeriodPreset::LastMonth => today.saturating_sub(1.month()),
            PeriodPreset::LastQuarter => today.saturating_sub(3.months()),
            PeriodPreset::LastYear => today.saturating_sub(1.year()),
        };

        Self { start, end: today }
    }

    /// First day.
    pub fn start(self) -> Date {
        self.start
    }

    /// Last day.
    pub fn end(self) -> Date {
        self.end
    }

    /// True when `date` falls inside the range.
    pub fn contains(self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when `start..=end` shares at least one day with the range.
    pub fn overlaps(self, start: Date, end: Date) -> bool {
        start <= self.end && end >= self.start
    }

    /// `Período: dd/MM/yyyy a dd/MM/yyyy`.
    pub fn line(self) -> String {
        format!("Período: {}", format_period(self.start, self.end))
    }
}

/// Registers a report can draw on.
#[derive(Debug, Clone, Copy)]
pub struct Registers<'a> {
    /// Bidders.
    pub bidders: &'a Store<Bidder>,

    /// Bidding processes.
    pub processes: &'a Store<BiddingProcess>,

    /// Penalties.
    pub penalties: &'a Store<Penalty>,
}

/// A built report, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Register covered.
    pub kind: ReportKind,

    /// Range covered.
    pub period: Period,

    /// Generation time.
    pub generated_at: DateTime,

    /// Spreadsheet projection.
    pub sheet: SheetProjection,

    /// PDF projection.
    pub document: PdfProjection,
}

impl Report {
    /// Build a report of `kind` over `period`.
    ///
    /// Bidding processes are selected by opening date, bidders by registration date and
    /// penalties whose sanction period overlaps `period`.
    pub fn build(
        kind: ReportKind,
        period: Period,
        registers: Registers<'_>,
        generated_at: DateTime,
    ) -> Self {
        let (headers, rows, columns, pdf_rows) = match kind {
            ReportKind::BiddingProcesses => {
                let selected: Vec<_> = registers
                    .processes
                    .iter()
                    .filter(|record| period.contains(record.data().opening_date))
                    .collect();

                (
                    PROCESS_SHEET_COLUMNS,
                    selected.iter().map(|record| process_sheet_row(record)).collect(),
                    PROCESS_PDF_COLUMNS,
                    selected.iter().map(|record| process_pdf_row(record)).collect(),
                )
            }
            ReportKind::Bidders => {
                let selected: Vec<_> = registers
                    .bidders
                    .iter()
                    .filter(|record| period.contains(utc_date(record.created_at())))
                    .collect();

                let rows: Vec<Vec<String>> =
                    selected.iter().map(|record| bidder_row(record)).collect();

                (BIDDER_COLUMNS, rows.clone(), BIDDER_COLUMNS, rows)
            }
            ReportKind::Penalties => {
                let selected: Vec<_> = registers
                    .penalties
                    .iter()
                    .filter(|record| {
                        period.overlaps(record.data().start_date, record.data().end_date)
                    })
                    .collect();

                (
                    PENALTY_SHEET_COLUMNS,
                    selected.iter().map(|record| penalty_sheet_row(record)).collect(),
                    PENALTY_PDF_COLUMNS,
                    selected.iter().map(|record| penalty_pdf_row(record)).collect(),
                )
            }
        };

        let report = Self {
            kind,
            period,
            generated_at,
            sheet: SheetProjection {
                sheet_name: SHEET_NAME.to_string(),
                headers: owned(headers),
                rows,
            },
            document: PdfProjection {
                title: kind.title().to_string(),
                subtitle_lines: vec![generation_line(generated_at), period.line()],
                columns: owned(columns),
                rows: pdf_rows,
            },
        };

        info!(
            kind = kind.label(),
            rows = report.sheet.rows.len(),
            "report generated"
        );

        report
    }

    /// Write the spreadsheet into `dir` and tell `notifier` how it went.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if rendering or writing fails.
    pub fn write_workbook(
        &self,
        dir: &Path,
        notifier: &mut impl Notifier,
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.kind.file_name(self.generated_at.date(), "xlsx"));
        let result = xlsx::render_workbook(&self.sheet)
            .and_then(|bytes| write_file(&path, &bytes))
            .map(|()| path);

        notify(notifier, result, REPORT_XLSX_EXPORTED)
    }

    /// Write the PDF into `dir` and tell `notifier` how it went.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if rendering or writing fails.
    pub fn write_pdf(
        &self,
        dir: &Path,
        notifier: &mut impl Notifier,
    ) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.kind.file_name(self.generated_at.date(), "pdf"));
        let result = pdf::render_pdf(&self.document)
            .and_then(|bytes| write_file(&path, &bytes))
            .map(|()| path);

        notify(notifier, result, REPORT_PDF_EXPORTED)
    }
}

fn notify(
    notifier: &mut impl Notifier,
    result: Result<PathBuf, ExportError>,
    success: &str,
) -> Result<PathBuf, ExportError> {
    match &result {
        Ok(path) => {
            info!(path = %path.display(), "report written");
            notifier.success(success);
        }
        Err(err) => notifier.error(&err.to_string()),
    }

    result
}

const PROCESS_SHEET_COLUMNS: &[&str] = &[
    "Identificação",
    "Modalidade",
    "Objeto",
    "Data de Abertura",
    "Valor Estimado (R$)",
    "Valor Final (R$)",
    "Status",
    "Economia (R$)",
    "Economia (%)",
];

const PROCESS_PDF_COLUMNS: &[&str] = &["ID", "Modalidade", "Valor Estimado", "Status"];

const BIDDER_COLUMNS: &[&str] = &["Razão Social", "CNPJ", "Cidade/UF", "Situação"];

const PENALTY_SHEET_COLUMNS: &[&str] = &[
    "Fornecedor",
    "CNPJ",
    "Tipo de Sanção",
    "Data de Início",
    "Data de Fim",
    "Status",
];

const PENALTY_PDF_COLUMNS: &[&str] = &["Fornecedor", "Tipo de Sanção", "Período", "Status"];

fn process_sheet_row(record: &Record<BiddingProcess>) -> Vec<String> {
    let process = record.data();
    let difference = process.price_difference();

    vec![
        process.identification.clone(),
        process.modality.to_string(),
        process.object.clone(),
        format_date(process.opening_date),
        format_amount(&process.estimated_value),
        process
            .final_value
            .as_ref()
            .map_or_else(|| or_missing(None), format_amount),
        process.status.to_string(),
        difference.map_or_else(
            || or_missing(None),
            |difference| format_amount(&brl(difference)),
        ),
        difference.map_or_else(
            || or_missing(None),
            |difference| {
                let ratio = savings_ratio(difference, *process.estimated_value.amount());

                format!("{:.2}%", percent_points(ratio))
            },
        ),
    ]
}

fn process_pdf_row(record: &Record<BiddingProcess>) -> Vec<String> {
    let process = record.data();

    vec![
        process.identification.clone(),
        process.modality.to_string(),
        format_brl(&process.estimated_value),
        process.status.to_string(),
    ]
}

fn bidder_row(record: &Record<Bidder>) -> Vec<String> {
    let bidder = record.data();

    vec![
        bidder.legal_name.clone(),
        bidder.cnpj.clone(),
        format!("{}/{}", bidder.city, bidder.state),
        bidder.status.to_string(),
    ]
}

fn penalty_sheet_row(record: &Record<Penalty>) -> Vec<String> {
    let penalty = record.data();

    vec![
        penalty.supplier.clone(),
        penalty.cnpj.clone(),
        penalty.sanction.to_string(),
        format_date(penalty.start_date),
        format_date(penalty.end_date),
        penalty.status.to_string(),
    ]
}

fn penalty_pdf_row(record: &Record<Penalty>) -> Vec<String> {
    let penalty = record.data();

    vec![
        penalty.supplier.clone(),
        penalty.sanction.to_string(),
        format_period(penalty.start_date, penalty.end_date),
        penalty.status.to_string(),
    ]
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(ToString::to_string).collect()
}

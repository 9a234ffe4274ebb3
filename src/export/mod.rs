//! Export Projection
//!
//! A register is exported in two shapes: a full [`SheetProjection`] with every column, and a
//! condensed [`PdfProjection`] suited to a printed page. Projections are plain data; the
//! [`xlsx`], [`pdf`] and [`table`] renderers turn them into bytes or text.

use std::{
    io,
    path::{Path, PathBuf},
};

use jiff::civil::{Date, DateTime};
use thiserror::Error;
use tracing::info;

use crate::records::{Entity, Record};

pub mod format;
pub mod pdf;
pub mod table;
pub mod xlsx;

pub use format::{
    MISSING, PDF_TEXT_BUDGET, format_date, format_datetime, format_timestamp_date, truncate,
};

/// Success message shown after a spreadsheet export.
pub const XLSX_EXPORTED: &str = "Dados exportados para Excel com sucesso!";

/// Success message shown after a PDF export.
pub const PDF_EXPORTED: &str = "Dados exportados para PDF com sucesso!";

/// Errors raised while rendering or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The spreadsheet writer failed.
    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF writer failed.
    #[error("pdf rendering failed: {0}")]
    Pdf(String),

    /// The projection does not fit the output format.
    #[error("{rows} rows exceed the {limit} row limit of the sheet")]
    TooManyRows {
        /// Rows in the projection.
        rows: usize,

        /// Rows the format accepts.
        limit: usize,
    },

    /// Writing the file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination file.
        path: PathBuf,

        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Entity with spreadsheet and PDF projections.
pub trait Exportable: Entity {
    /// File name stem, e.g. `licitantes`.
    const FILE_STEM: &'static str;

    /// Worksheet name.
    const SHEET_NAME: &'static str;

    /// PDF title.
    const TITLE: &'static str;

    /// Spreadsheet headers, one per business field plus audit dates.
    const SHEET_COLUMNS: &'static [&'static str];

    /// PDF headers.
    const PDF_COLUMNS: &'static [&'static str];

    /// One spreadsheet row, aligned with [`Exportable::SHEET_COLUMNS`].
    fn sheet_row(record: &Record<Self>) -> Vec<String>;

    /// One PDF row, aligned with [`Exportable::PDF_COLUMNS`].
    fn pdf_row(record: &Record<Self>) -> Vec<String>;
}

/// Tabular projection of a register for a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetProjection {
    /// Worksheet name.
    pub sheet_name: String,

    /// Header row.
    pub headers: Vec<String>,

    /// Data rows, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl SheetProjection {
    /// Project `records` in the given order.
    pub fn of<E: Exportable>(records: &[&Record<E>]) -> Self {
        Self {
            sheet_name: E::SHEET_NAME.to_string(),
            headers: owned(E::SHEET_COLUMNS),
            rows: records.iter().map(|record| E::sheet_row(record)).collect(),
        }
    }
}

/// Condensed projection of a register for a printed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfProjection {
    /// Document title.
    pub title: String,

    /// Lines printed under the title.
    pub subtitle_lines: Vec<String>,

    /// Column headers.
    pub columns: Vec<String>,

    /// Data rows, aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}

impl PdfProjection {
    /// Project `records` with a generation-time line.
    pub fn of<E: Exportable>(records: &[&Record<E>], generated_at: DateTime) -> Self {
        Self {
            title: E::TITLE.to_string(),
            subtitle_lines: vec![generation_line(generated_at)],
            columns: owned(E::PDF_COLUMNS),
            rows: records.iter().map(|record| E::pdf_row(record)).collect(),
        }
    }

    /// Append a line under the title.
    #[must_use]
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.subtitle_lines.push(line.into());
        self
    }
}

/// `Data de geração: dd/MM/yyyy HH:mm`.
pub fn generation_line(generated_at: DateTime) -> String {
    format!("Data de geração: {}", format_datetime(generated_at))
}

/// `<stem>_<dd-MM-yyyy>.<extension>`.
pub fn file_name(stem: &str, today: Date, extension: &str) -> String {
    format!("{stem}_{}.{extension}", format::format_file_date(today))
}

/// Write the spreadsheet export of `records` into `dir`.
///
/// # Errors
///
/// Returns an [`ExportError`] if rendering or writing fails.
pub fn export_workbook<E: Exportable>(
    records: &[&Record<E>],
    dir: &Path,
    today: Date,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(E::FILE_STEM, today, "xlsx"));
    let bytes = xlsx::render_workbook(&SheetProjection::of(records))?;

    write_file(&path, &bytes)?;

    info!(kind = E::KIND, rows = records.len(), path = %path.display(), "exported workbook");

    Ok(path)
}

/// Write the PDF export of `records` into `dir`.
///
/// # Errors
///
/// Returns an [`ExportError`] if rendering or writing fails.
pub fn export_pdf<E: Exportable>(
    records: &[&Record<E>],
    dir: &Path,
    generated_at: DateTime,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(E::FILE_STEM, generated_at.date(), "pdf"));
    let bytes = pdf::render_pdf(&PdfProjection::of(records, generated_at))?;

    write_file(&path, &bytes)?;

    info!(kind = E::KIND, rows = records.len(), path = %path.display(), "exported pdf");

    Ok(path)
}

pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn owned(columns: &[&str]) -> Vec<String> {
    columns.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn file_names_carry_stem_and_date() {
        assert_eq!(
            file_name("licitantes", date(2025, 5, 20), "xlsx"),
            "licitantes_20-05-2025.xlsx"
        );
        assert_eq!(
            file_name("contratacoes_diretas", date(2025, 12, 1), "pdf"),
            "contratacoes_diretas_01-12-2025.pdf"
        );
    }

    #[test]
    fn generation_line_uses_minutes() {
        assert_eq!(
            generation_line(date(2025, 5, 20).at(9, 5, 0, 0)),
            "Data de geração: 20/05/2025 09:05"
        );
    }
}

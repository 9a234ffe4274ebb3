//! Spreadsheet rendering

use rust_xlsxwriter::{Format, Workbook};

use crate::export::{ExportError, SheetProjection};

/// Data rows a worksheet can hold below the header.
pub const MAX_ROWS: usize = 1_048_575;

/// Render `projection` as a single-sheet `.xlsx` workbook with a bold header row.
///
/// # Errors
///
/// Returns an [`ExportError`] if the projection does not fit a worksheet or the writer fails.
pub fn render_workbook(projection: &SheetProjection) -> Result<Vec<u8>, ExportError> {
    if projection.rows.len() > MAX_ROWS {
        return Err(ExportError::TooManyRows {
            rows: projection.rows.len(),
            limit: MAX_ROWS,
        });
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&projection.sheet_name)?;

    for (col, title) in (0_u16..).zip(&projection.headers) {
        worksheet.write_string_with_format(0, col, title, &header)?;
    }

    for (row, cells) in (1_u32..).zip(&projection.rows) {
        for (col, cell) in (0_u16..).zip(cells) {
            worksheet.write_string(row, col, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn renders_zip_container() -> TestResult {
        let projection = SheetProjection {
            sheet_name: "Licitações".to_string(),
            headers: vec!["Identificação".to_string(), "Status".to_string()],
            rows: vec![vec!["PE-2025-001".to_string(), "Concluído".to_string()]],
        };

        let bytes = render_workbook(&projection)?;

        assert!(bytes.starts_with(b"PK"));

        Ok(())
    }

    #[test]
    fn rejects_invalid_sheet_name() {
        let projection = SheetProjection {
            sheet_name: "Licitações [2025]".to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
        };

        assert!(matches!(
            render_workbook(&projection),
            Err(ExportError::Xlsx(_))
        ));
    }
}

//! Terminal table rendering

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{Color, Style, Theme, object::Rows},
};

use crate::export::{PdfProjection, SheetProjection};

/// Render a sheet projection as a boxed terminal table.
pub fn render_sheet(projection: &SheetProjection) -> String {
    render(&projection.headers, &projection.rows)
}

/// Render a PDF projection as title lines followed by a boxed terminal table.
pub fn render_document(projection: &PdfProjection) -> String {
    let mut out = String::new();

    out.push_str(&projection.title);
    out.push('\n');

    for line in &projection.subtitle_lines {
        out.push_str(line);
        out.push('\n');
    }

    out.push_str(&render(&projection.columns, &projection.rows));
    out
}

fn render(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();

    builder.push_record(headers.iter().cloned());

    for row in rows {
        builder.push_record(row.iter().cloned());
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_title_lines_and_cells() {
        let projection = PdfProjection {
            title: "Relatório de Penalidades".to_string(),
            subtitle_lines: vec!["Data de geração: 20/05/2025 10:00".to_string()],
            columns: vec!["Fornecedor".to_string(), "Status".to_string()],
            rows: vec![vec!["Empresa ABC Ltda".to_string(), "Ativa".to_string()]],
        };

        let rendered = render_document(&projection);

        assert!(rendered.starts_with("Relatório de Penalidades\nData de geração: 20/05/2025 10:00\n"));
        assert!(rendered.contains("Empresa ABC Ltda"));
        assert!(rendered.contains("Ativa"));
    }

    #[test]
    fn empty_sheet_still_has_headers() {
        let projection = SheetProjection {
            sheet_name: "Licitantes".to_string(),
            headers: vec!["Razão Social".to_string()],
            rows: Vec::new(),
        };

        assert!(render_sheet(&projection).contains("Razão Social"));
    }
}

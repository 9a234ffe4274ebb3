//! PDF rendering
//!
//! Lays a [`PdfProjection`] out on A4 portrait pages: the title and subtitle lines on the first
//! page, then a striped table whose header band repeats on every page.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};

use crate::export::{ExportError, PdfProjection};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;
const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 2.0;
const TEXT_BASELINE: f32 = 2.7;

const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 10.0;
const HEADER_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 8.0;

const TABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Millimetres per typographic point.
const PT_TO_MM: f32 = 0.3528;

/// Average Helvetica advance, in ems. Wide enough for digits and capitals.
const CHAR_EM: f32 = 0.6;

const LAYER: &str = "Camada 1";

/// Header band colour.
pub const HEADER_FILL: (u8, u8, u8) = (41, 128, 185);

/// Fill of every other body row.
pub const STRIPE_FILL: (u8, u8, u8) = (240, 240, 240);

/// Render `projection` as PDF bytes.
///
/// # Errors
///
/// Returns [`ExportError::Pdf`] if the document cannot be built.
pub fn render_pdf(projection: &PdfProjection) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(&projection.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;

    let mut canvas = Canvas {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        regular,
        bold,
        table: TableLayout::fit(&projection.columns, &projection.rows),
        cursor: PAGE_HEIGHT - MARGIN - 6.0,
    };

    canvas.text(&projection.title, TITLE_SIZE, MARGIN, true);
    canvas.cursor -= 8.0;

    for line in &projection.subtitle_lines {
        canvas.text(line, SUBTITLE_SIZE, MARGIN, false);
        canvas.cursor -= 6.0;
    }

    canvas.cursor -= 4.0;
    canvas.header_band(&projection.columns);

    for (idx, row) in projection.rows.iter().enumerate() {
        if canvas.cursor - ROW_HEIGHT < MARGIN {
            canvas.new_page();
            canvas.header_band(&projection.columns);
        }

        canvas.body_row(row, idx % 2 == 1);
    }

    drop(canvas);

    doc.save_to_bytes()
        .map_err(|err| ExportError::Pdf(err.to_string()))
}

struct Canvas<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    table: TableLayout,

    /// Top edge of the next row, in millimetres from the page bottom.
    cursor: f32,
}

impl Canvas<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);

        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        self.text_at(text, size, x, self.cursor, bold);
    }

    fn text_at(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };

        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn band(&self, fill: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(fill));
        self.layer.add_rect(Rect::new(
            Mm(MARGIN),
            Mm(self.cursor - ROW_HEIGHT),
            Mm(PAGE_WIDTH - MARGIN),
            Mm(self.cursor),
        ));
    }

    fn cells(&mut self, cells: &[String], size: f32, bold: bool) {
        let baseline = self.cursor - ROW_HEIGHT + TEXT_BASELINE;
        let size = size * self.table.scale;
        let mut x = MARGIN;

        for (cell, width) in cells.iter().zip(&self.table.widths) {
            self.text_at(cell, size, x + CELL_PADDING * self.table.scale, baseline, bold);
            x += width;
        }

        self.cursor -= ROW_HEIGHT;
    }

    fn header_band(&mut self, columns: &[String]) {
        self.band(HEADER_FILL);
        self.layer.set_fill_color(rgb((255, 255, 255)));
        self.cells(columns, HEADER_SIZE, true);
    }

    fn body_row(&mut self, row: &[String], striped: bool) {
        if striped {
            self.band(STRIPE_FILL);
        }

        self.layer.set_fill_color(rgb((0, 0, 0)));
        self.cells(row, BODY_SIZE, false);
    }
}

/// Column widths sized to their widest cell, spread over the table width.
///
/// When the content is wider than the page every width and font size shrinks by the same
/// `scale`, so a cell is never clipped.
#[derive(Debug, Clone, PartialEq)]
struct TableLayout {
    widths: Vec<f32>,
    scale: f32,
}

impl TableLayout {
    fn fit(columns: &[String], rows: &[Vec<String>]) -> Self {
        let natural: Vec<f32> = columns
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| text_width(cell, BODY_SIZE))
                    .fold(text_width(header, HEADER_SIZE), f32::max)
                    + 2.0 * CELL_PADDING
            })
            .collect();

        let total: f32 = natural.iter().sum();

        if total <= 0.0 {
            return Self {
                widths: natural,
                scale: 1.0,
            };
        }

        let stretch = TABLE_WIDTH / total;

        Self {
            widths: natural.iter().map(|width| width * stretch).collect(),
            scale: stretch.min(1.0),
        }
    }
}

/// Estimated printed width of `text` at `size` points, in millimetres.
fn text_width(text: &str, size: f32) -> f32 {
    let chars = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);

    f32::from(chars) * CHAR_EM * size * PT_TO_MM
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

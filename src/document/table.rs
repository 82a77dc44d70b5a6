//! Generic table writer driven by a [`TableLayout`].

use super::template::{Align, Borders, TableLayout, TextStyle};
use super::xml::{write_paragraph, ParagraphProps, Run};

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub runs: Vec<Run>,
    /// Overrides the column alignment
    pub align: Option<Align>,
    /// Number of grid columns this cell covers
    pub span: usize,
}

impl Cell {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            runs: vec![Run::new(text, style)],
            align: None,
            span: 1,
        }
    }

    pub fn empty() -> Self {
        Self {
            runs: Vec::new(),
            align: None,
            span: 1,
        }
    }

    pub fn spanning(mut self, span: usize) -> Self {
        self.span = span.max(1);
        self
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }
}

pub type Row = Vec<Cell>;

/// Write a table. Column widths, borders and alignment come from `layout`;
/// the header row (if the layout has one) is built from `titles`. Body rows
/// are padded with blank rows up to `layout.min_body_rows`.
pub fn write_table(out: &mut String, layout: &TableLayout, titles: &[&str], body: Vec<Row>) {
    out.push_str("<w:tbl><w:tblPr>");
    out.push_str(&format!(r#"<w:tblW w:w="{}" w:type="dxa"/>"#, layout.width()));
    write_borders(out, &layout.borders);
    out.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
    out.push_str("</w:tblPr><w:tblGrid>");
    for column in layout.columns {
        out.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, column.width));
    }
    out.push_str("</w:tblGrid>");

    if let Some(header) = &layout.header {
        out.push_str("<w:tr><w:trPr><w:tblHeader/></w:trPr>");
        for (index, title) in titles.iter().enumerate() {
            let align = header.aligns.get(index).copied().unwrap_or(Align::Left);
            let cell = Cell::text(*title, header.text).aligned(align);
            write_cell(out, layout, index, &cell, header.shading);
        }
        out.push_str("</w:tr>");
    }

    let padding = layout.min_body_rows.saturating_sub(body.len());
    let blank_rows = (0..padding).map(|_| -> Row {
        (0..layout.columns.len()).map(|_| Cell::empty()).collect()
    });
    for row in body.into_iter().chain(blank_rows) {
        write_row(out, layout, &row);
    }

    out.push_str("</w:tbl>");
}

fn write_row(out: &mut String, layout: &TableLayout, row: &[Cell]) {
    out.push_str("<w:tr>");
    let mut column = 0;
    for cell in row {
        write_cell(out, layout, column, cell, None);
        column += cell.span;
    }
    out.push_str("</w:tr>");
}

fn write_cell(
    out: &mut String,
    layout: &TableLayout,
    column: usize,
    cell: &Cell,
    shading: Option<&str>,
) {
    let width = layout.span_width(column, cell.span);
    out.push_str("<w:tc><w:tcPr>");
    out.push_str(&format!(r#"<w:tcW w:w="{}" w:type="dxa"/>"#, width));
    if cell.span > 1 {
        out.push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, cell.span));
    }
    if let Some(fill) = shading {
        out.push_str(&format!(
            r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
            fill
        ));
    }
    out.push_str(r#"<w:vAlign w:val="center"/>"#);
    out.push_str("</w:tcPr>");

    let align = cell
        .align
        .or_else(|| layout.columns.get(column).map(|spec| spec.align))
        .unwrap_or(Align::Left);
    // Every cell needs at least one paragraph, even an empty one
    write_paragraph(out, &ParagraphProps::aligned(align).space_after(0), &cell.runs);
    out.push_str("</w:tc>");
}

fn write_borders(out: &mut String, borders: &Borders) {
    let edge = match borders {
        Borders::None => r#"w:val="none" w:sz="0" w:space="0" w:color="auto""#.to_string(),
        Borders::Single { size, color } => format!(
            r#"w:val="single" w:sz="{}" w:space="0" w:color="{}""#,
            size, color
        ),
    };
    out.push_str("<w:tblBorders>");
    for name in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        out.push_str(&format!("<w:{} {}/>", name, edge));
    }
    out.push_str("</w:tblBorders>");
}

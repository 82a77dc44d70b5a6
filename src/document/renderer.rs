//! Invoice renderer.
//!
//! Walks the fixed paper layout from top to bottom and fills it with a
//! submitted [`InvoiceRecord`]. Rendering is a pure function of the record
//! and the issuer: the same input always yields the same bytes.

use super::common::{format_amount, format_invoice_date, invoice_filename};
use super::package::{pack_docx, DocumentProperties, WORDML_NAMESPACE};
use super::table::{write_table, Cell, Row};
use super::template::{
    Align, Issuer, ACCEPTANCE_CLAUSE, ACKNOWLEDGEMENT_PLACEHOLDERS, ACKNOWLEDGEMENT_TABLE,
    BODY_TEXT, GRAND_TOTAL_TEXT, HEADING_TEXT, HEADER_TABLE, ITEMS_TABLE, ITEM_COLUMN_TITLES, PAGE,
    PAYMENT_TERMS_LABEL, RECEIVED_BY, RETENTION_CLAUSE, SUMMARY_TABLE, TERMS_HEADING, TITLE,
    TITLE_TEXT,
};
use super::traits::Generator;
use super::xml::{write_blank_line, write_paragraph, write_table_spacer, ParagraphProps, Run};
use super::{DocumentError, GeneratedDocument, DOCX_CONTENT_TYPE};
use crate::invoice::model::InvoiceRecord;

const CURRENCY: &str = "BHD";

/// Renders invoices for one issuing company.
#[derive(Debug, Clone, Default)]
pub struct InvoiceRenderer {
    issuer: Issuer,
}

impl InvoiceRenderer {
    pub fn new(issuer: Issuer) -> Self {
        Self { issuer }
    }

    /// Build `word/document.xml` for `record`.
    pub fn document_xml(&self, record: &InvoiceRecord) -> String {
        let mut body = String::new();

        self.write_title(&mut body);
        write_blank_line(&mut body);
        self.write_header_table(&mut body, record);
        write_table_spacer(&mut body);
        self.write_items_table(&mut body, record);
        write_table_spacer(&mut body);
        self.write_summary_table(&mut body, record);
        write_blank_line(&mut body);
        self.write_payment_details(&mut body);
        self.write_terms(&mut body, record);
        write_blank_line(&mut body);
        self.write_acknowledgement(&mut body);
        self.write_signature_block(&mut body);

        format!(
            concat!(
                r#"<w:document xmlns:w="{ns}"><w:body>{body}"#,
                r#"<w:sectPr><w:pgSz w:w="{width}" w:h="{height}"/>"#,
                r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="709" w:footer="709" w:gutter="0"/>"#,
                "</w:sectPr></w:body></w:document>"
            ),
            ns = WORDML_NAMESPACE,
            body = body,
            width = PAGE.width,
            height = PAGE.height,
            top = PAGE.margin_top,
            right = PAGE.margin_right,
            bottom = PAGE.margin_bottom,
            left = PAGE.margin_left,
        )
    }

    /// Render `record` to a complete `.docx`.
    pub fn render(&self, record: &InvoiceRecord) -> Result<GeneratedDocument, DocumentError> {
        let filename = invoice_filename(&record.header.invoice_number);
        let properties = DocumentProperties {
            title: format!("Invoice {}", record.header.invoice_number),
            creator: self.issuer.name.clone(),
        };
        let bytes = pack_docx(&self.document_xml(record), &properties)?;

        log::info!(
            "Rendered invoice {} ({} items, {} bytes)",
            record.header.invoice_number,
            record.items.len(),
            bytes.len()
        );

        Ok(GeneratedDocument {
            filename,
            content_type: DOCX_CONTENT_TYPE,
            bytes,
        })
    }

    fn write_title(&self, out: &mut String) {
        write_paragraph(
            out,
            &ParagraphProps::aligned(Align::Center),
            &[Run::new(TITLE, TITLE_TEXT)],
        );
    }

    /// Label/value pairs. The last three rows have no right-hand pair, so
    /// their value cell is merged across it.
    fn write_header_table(&self, out: &mut String, record: &InvoiceRecord) {
        let header = &record.header;
        let text = HEADER_TABLE.text;
        let paired = [
            ("To:", header.to_company.as_str(), "Date:", format_invoice_date(header.invoice_date)),
            ("Address:", header.customer_address.as_str(), "SSS Invoice No:", header.invoice_number.clone()),
            ("Tel:", header.customer_tel.as_str(), "Customer VAT No.:", header.customer_vat_no.clone()),
        ];
        let single = [
            ("ATTN:", header.attn_person.as_str()),
            ("Email:", header.customer_email.as_str()),
            ("Customer PO#:", header.customer_po.as_str()),
        ];

        let mut rows: Vec<Row> = paired
            .into_iter()
            .map(|(label, value, right_label, right_value)| {
                vec![
                    Cell::text(label, text),
                    Cell::text(value, text),
                    Cell::text(right_label, text),
                    Cell::text(right_value, text),
                ]
            })
            .collect();
        rows.extend(single.into_iter().map(|(label, value)| {
            vec![Cell::text(label, text), Cell::text(value, text).spanning(3)]
        }));

        write_table(out, &HEADER_TABLE, &[], rows);
    }

    fn write_items_table(&self, out: &mut String, record: &InvoiceRecord) {
        let text = ITEMS_TABLE.text;
        let rows = record
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                vec![
                    Cell::text((index + 1).to_string(), text),
                    Cell::text(item.description.as_str(), text),
                    Cell::text(format_amount(item.unit_price), text),
                    Cell::text(CURRENCY, text),
                    Cell::text(item.quantity.to_string(), text),
                    Cell::text(format_amount(item.total_price()), text),
                    Cell::text(CURRENCY, text),
                ]
            })
            .collect();

        write_table(out, &ITEMS_TABLE, &ITEM_COLUMN_TITLES, rows);
    }

    fn write_summary_table(&self, out: &mut String, record: &InvoiceRecord) {
        let totals = &record.totals;
        let amount = |value| format!("{} {}", format_amount(value), CURRENCY);
        let rows = vec![
            vec![
                Cell::text("Subtotal:", SUMMARY_TABLE.text),
                Cell::text(amount(totals.subtotal), SUMMARY_TABLE.text),
            ],
            vec![
                Cell::text("VAT @ 10%:", SUMMARY_TABLE.text),
                Cell::text(amount(totals.vat_amount), SUMMARY_TABLE.text),
            ],
            vec![
                Cell::text("Grand Total in BHD", GRAND_TOTAL_TEXT),
                Cell::text(amount(totals.grand_total), GRAND_TOTAL_TEXT),
            ],
        ];

        write_table(out, &SUMMARY_TABLE, &[], rows);
    }

    fn write_payment_details(&self, out: &mut String) {
        write_paragraph(
            out,
            &ParagraphProps::default(),
            &[Run::new(self.issuer.payment_details.as_str(), BODY_TEXT)],
        );
    }

    fn write_terms(&self, out: &mut String, record: &InvoiceRecord) {
        write_paragraph(
            out,
            &ParagraphProps::styled("Heading2"),
            &[Run::new(TERMS_HEADING, HEADING_TEXT)],
        );
        write_paragraph(
            out,
            &ParagraphProps::default(),
            &[
                Run::new(PAYMENT_TERMS_LABEL, BODY_TEXT.bold()),
                Run::new(record.header.payment_terms.as_str(), BODY_TEXT),
            ],
        );
        for clause in [RETENTION_CLAUSE, ACCEPTANCE_CLAUSE] {
            write_paragraph(out, &ParagraphProps::default(), &[Run::new(clause, BODY_TEXT)]);
        }
    }

    fn write_acknowledgement(&self, out: &mut String) {
        let text = ACKNOWLEDGEMENT_TABLE.text;
        let mut row = vec![Cell::text(RECEIVED_BY, BODY_TEXT)];
        row.extend(
            ACKNOWLEDGEMENT_PLACEHOLDERS
                .iter()
                .map(|placeholder| Cell::text(*placeholder, text)),
        );
        write_table(out, &ACKNOWLEDGEMENT_TABLE, &[], vec![row]);
    }

    fn write_signature_block(&self, out: &mut String) {
        let lines = [
            format!("For {}", self.issuer.name),
            self.issuer.signer.clone(),
            self.issuer.signer_title.clone(),
        ];
        write_blank_line(out);
        for line in lines {
            write_paragraph(
                out,
                &ParagraphProps::default().space_after(0),
                &[Run::new(line, BODY_TEXT)],
            );
        }
    }
}

impl Generator<InvoiceRecord> for InvoiceRenderer {
    fn generate(&self, request: &InvoiceRecord) -> Result<GeneratedDocument, DocumentError> {
        self.render(request)
    }
}

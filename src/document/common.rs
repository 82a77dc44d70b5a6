//! Common utilities for document generation.
//!
//! Unit conversion, amount/date formatting, and XML escaping.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::invoice::model::round_money;

/// Twentieths of a point, the length unit used throughout WordprocessingML.
pub type Twips = u32;

/// Convert millimetres to twips (1 inch = 25.4 mm = 1440 twips).
pub const fn mm(value: u32) -> Twips {
    value * 14400 / 254
}

/// Format an amount with the three decimals BHD uses, e.g. `1234.500`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.3}", round_money(amount))
}

/// Invoice dates are printed day first, e.g. `07-03-2025`.
pub fn format_invoice_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Escape text for use in XML character data and attribute values.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // Not allowed in XML 1.0 character data
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Download name for an invoice, e.g. `Invoice_SSS-250307-001.docx`.
pub fn invoice_filename(invoice_number: &str) -> String {
    sanitize_filename::sanitize(format!("Invoice_{}.docx", invoice_number.trim()))
}

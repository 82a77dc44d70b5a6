//! Fixed layout of the paper invoice.
//!
//! Every size, width, font and border used by the renderer is declared here;
//! the writers in `xml` and `table` only interpret these values. Font sizes
//! are in half-points as WordprocessingML expects them.

use super::common::{mm, Twips};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub font: &'static str,
    /// Half-points
    pub size: u32,
    pub bold: bool,
}

impl TextStyle {
    pub const fn new(font: &'static str, size: u32) -> Self {
        Self {
            font,
            size,
            bold: false,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: Twips,
    pub height: Twips,
    pub margin_top: Twips,
    pub margin_right: Twips,
    pub margin_bottom: Twips,
    pub margin_left: Twips,
}

impl PageLayout {
    pub const fn content_width(&self) -> Twips {
        self.width - self.margin_left - self.margin_right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub width: Twips,
    pub align: Align,
}

impl ColumnSpec {
    const fn new(width_mm: u32, align: Align) -> Self {
        Self {
            width: mm(width_mm),
            align,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Borders {
    None,
    /// Single line on every edge, `size` in eighths of a point
    Single { size: u32, color: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRowLayout {
    pub text: TextStyle,
    pub aligns: &'static [Align],
    /// Hex fill colour
    pub shading: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub columns: &'static [ColumnSpec],
    pub borders: Borders,
    pub text: TextStyle,
    pub header: Option<HeaderRowLayout>,
    /// Body rows are padded with blank rows up to this count
    pub min_body_rows: usize,
}

impl TableLayout {
    pub fn width(&self) -> Twips {
        self.columns.iter().map(|column| column.width).sum()
    }

    /// Width of `span` grid columns starting at `start`.
    pub fn span_width(&self, start: usize, span: usize) -> Twips {
        self.columns
            .iter()
            .skip(start)
            .take(span)
            .map(|column| column.width)
            .sum()
    }
}

pub const BODY_FONT: &str = "Calibri";
pub const MONO_FONT: &str = "Courier New";

/// A4 portrait, 20 mm top/bottom and 15 mm side margins (180 mm of text width).
pub const PAGE: PageLayout = PageLayout {
    width: mm(210),
    height: mm(297),
    margin_top: mm(20),
    margin_right: mm(15),
    margin_bottom: mm(20),
    margin_left: mm(15),
};

pub const BODY_TEXT: TextStyle = TextStyle::new(BODY_FONT, 22);
pub const TITLE_TEXT: TextStyle = TextStyle::new(BODY_FONT, 28).bold();
pub const HEADING_TEXT: TextStyle = TextStyle::new(BODY_FONT, 26).bold();
pub const ACKNOWLEDGEMENT_TEXT: TextStyle = TextStyle::new(MONO_FONT, 20);

/// Customer and invoice details, label/value pairs side by side.
pub const HEADER_TABLE: TableLayout = TableLayout {
    columns: &[
        ColumnSpec::new(25, Align::Left),
        ColumnSpec::new(65, Align::Left),
        ColumnSpec::new(30, Align::Left),
        ColumnSpec::new(60, Align::Left),
    ],
    borders: Borders::None,
    text: TextStyle::new(BODY_FONT, 20),
    header: None,
    min_body_rows: 0,
};

pub const ITEM_COLUMN_TITLES: [&str; 7] = [
    "No",
    "Description",
    "Unit price",
    "BHD",
    "Qty",
    "Total price",
    "BHD",
];

pub const ITEMS_TABLE: TableLayout = TableLayout {
    columns: &[
        ColumnSpec::new(15, Align::Center),
        ColumnSpec::new(70, Align::Left),
        ColumnSpec::new(25, Align::Right),
        ColumnSpec::new(15, Align::Center),
        ColumnSpec::new(15, Align::Center),
        ColumnSpec::new(25, Align::Right),
        ColumnSpec::new(15, Align::Center),
    ],
    borders: Borders::Single {
        size: 4,
        color: "000000",
    },
    text: TextStyle::new(BODY_FONT, 18),
    header: Some(HeaderRowLayout {
        text: TextStyle::new(BODY_FONT, 18).bold(),
        aligns: &[
            Align::Center,
            Align::Left,
            Align::Left,
            Align::Center,
            Align::Center,
            Align::Left,
            Align::Center,
        ],
        shading: Some("D9D9D9"),
    }),
    min_body_rows: 8,
};

pub const SUMMARY_TABLE: TableLayout = TableLayout {
    columns: &[
        ColumnSpec::new(135, Align::Right),
        ColumnSpec::new(45, Align::Right),
    ],
    borders: Borders::None,
    text: BODY_TEXT,
    header: None,
    min_body_rows: 0,
};

pub const GRAND_TOTAL_TEXT: TextStyle = BODY_TEXT.bold();

/// "Received by" followed by the three placeholders.
pub const ACKNOWLEDGEMENT_TABLE: TableLayout = TableLayout {
    columns: &[
        ColumnSpec::new(30, Align::Left),
        ColumnSpec::new(50, Align::Center),
        ColumnSpec::new(50, Align::Center),
        ColumnSpec::new(50, Align::Center),
    ],
    borders: Borders::None,
    text: ACKNOWLEDGEMENT_TEXT,
    header: None,
    min_body_rows: 0,
};

pub const TITLE: &str = "TAX INVOICE/DELIVERY NOTE";
pub const TERMS_HEADING: &str = "Terms and Conditions";
pub const PAYMENT_TERMS_LABEL: &str = "Payment terms: ";
pub const RETENTION_CLAUSE: &str = "Title and property at all above remain ours until full payment is received and we reserve the rights to withdraw goods/services if not paid for when due.";
pub const ACCEPTANCE_CLAUSE: &str = "Signing this document implies acceptance of these terms.";
pub const RECEIVED_BY: &str = "Received by";
pub const ACKNOWLEDGEMENT_PLACEHOLDERS: [&str; 3] = ["(Name)", "(Date)", "(Signature)"];

/// The company issuing the invoice and who signs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    pub name: String,
    pub signer: String,
    pub signer_title: String,
    /// One line per entry in the printed payment instructions
    pub payment_details: String,
}

impl Default for Issuer {
    fn default() -> Self {
        Self {
            name: "SALAHUDDIN SOFTTECH SOLUTIONS".to_string(),
            signer: "Jobin George".to_string(),
            signer_title: "Operations Manager".to_string(),
            payment_details: [
                "Payment will be remitted to the following account:",
                "Salahuddin Softtech Solutions, Arab Bank, A/C No.: 2002-146072-510,",
                "IBAN: BH31 ARAB 0200 2146072510, Swift Code: ARAB BHBM,",
                "Address: Arab Bank Plc. , P.O Box: 395, Manama, Kingdom of Bahrain.",
            ]
            .join("\n"),
        }
    }
}

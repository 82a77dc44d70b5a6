//! Document generation - turns a submitted invoice into a DOCX file.
//!
//! - `template` - the fixed paper layout (page, fonts, table geometry)
//! - `xml` / `table` - WordprocessingML writers driven by that layout
//! - `package` - zips the parts into a `.docx`
//! - `renderer` - composes the invoice itself

pub mod common;
pub mod package;
pub mod renderer;
pub mod table;
pub mod template;
pub mod traits;
pub mod xml;

pub use renderer::InvoiceRenderer;
pub use template::Issuer;
pub use traits::Generator;

use thiserror::Error;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Errors that can occur while packaging a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to write document archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write document part: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful document generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

//! Traits for generator system standardization.

use super::{DocumentError, GeneratedDocument};

/// Trait for document generators.
pub trait Generator<Req> {
    /// Generate a document from the request.
    fn generate(&self, request: &Req) -> Result<GeneratedDocument, DocumentError>;
}

//! Expense field extraction and validation.

mod parser;
pub mod rules;
pub mod validate;

pub use parser::{assemble, ExpenseParser, ExtractedFields, ExtractionResult};
pub use validate::{validate, validate_record, Rejection, RequiredField};

/// Trait for expense extractors.
///
/// Extraction never fails: fields that cannot be found fall back to their
/// documented defaults and are listed in the result's warnings.
pub trait ExpenseExtractor {
    /// Extract an expense record from document text.
    fn extract(&self, text: &str, source_ref: &str) -> ExtractionResult;
}

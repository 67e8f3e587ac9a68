//! Core library for receipt expense extraction.
//!
//! This crate provides:
//! - Field extraction from receipt text (amount, category, description, date)
//! - A validation gate for assembled expense records
//! - Source classification and text acquisition (plain text, PDF, OCR responses)
//! - Batch processing into an expense store
//! - Listing and decimal summaries over stored expenses

pub mod batch;
pub mod error;
pub mod expense;
pub mod models;
pub mod report;
pub mod source;
pub mod store;

pub use batch::{BatchProcessor, BatchReport, DocumentOutcome, DocumentReport, SkipReason};
pub use error::{ReceiptError, Result, SourceError, StoreError};
pub use expense::{
    assemble, validate, validate_record, ExpenseExtractor, ExpenseParser, ExtractedFields,
    ExtractionResult, Rejection, RequiredField,
};
pub use models::config::ReceiptConfig;
pub use models::expense::{Category, ExpenseCandidate, ExpenseRecord};
pub use report::{sort_by_date_desc, Bucket, Summary};
pub use source::{content_type, FsTextProvider, SourceKind, SourcePolicy, TextProvider};
pub use store::{ExpenseStore, JsonlStore, MemoryStore};

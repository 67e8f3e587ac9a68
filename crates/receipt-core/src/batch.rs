//! Batch processing of source documents.
//!
//! Each document runs through classify, extract text, parse, validate and
//! store. Failures are isolated per document and reported in the
//! [`BatchReport`]; the batch itself never fails.

use std::fmt;

use tracing::{info, warn};

use crate::expense::{ExpenseParser, Rejection};
use crate::models::config::ReceiptConfig;
use crate::models::expense::ExpenseRecord;
use crate::source::{content_type, SourceKind, SourcePolicy, TextProvider};
use crate::store::ExpenseStore;

/// Why a document was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension is not on any allow-list.
    UnsupportedType,
    /// The provider returned no text.
    EmptyText,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedType => f.write_str("unsupported file type"),
            SkipReason::EmptyText => f.write_str("no text extracted"),
        }
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    /// Accepted and written to the store.
    Stored(ExpenseRecord),
    /// Assembled but refused by the validation gate.
    Rejected {
        record: ExpenseRecord,
        reason: Rejection,
    },
    /// Not processed.
    Skipped(SkipReason),
    /// Text extraction or storage failed.
    Failed(String),
}

impl DocumentOutcome {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentOutcome::Stored(_) => "stored",
            DocumentOutcome::Rejected { .. } => "rejected",
            DocumentOutcome::Skipped(_) => "skipped",
            DocumentOutcome::Failed(_) => "failed",
        }
    }
}

/// Per-document entry of a batch report.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub source_ref: String,
    pub kind: SourceKind,
    /// MIME type derived from the document name.
    pub content_type: &'static str,
    pub outcome: DocumentOutcome,
    /// Extraction warnings (fields that used their defaults).
    pub warnings: Vec<String>,
}

/// Result of processing a batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Number of records stored.
    pub fn processed_count(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Stored(_)))
    }

    pub fn rejected_count(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Rejected { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Skipped(_)))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed(_)))
    }

    /// Records stored during this batch, in processing order.
    pub fn stored_records(&self) -> impl Iterator<Item = &ExpenseRecord> {
        self.documents.iter().filter_map(|d| match &d.outcome {
            DocumentOutcome::Stored(record) => Some(record),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.outcome)).count()
    }
}

/// Drives documents from a text provider into a store.
pub struct BatchProcessor<P, S> {
    policy: SourcePolicy,
    provider: P,
    store: S,
    parser: ExpenseParser,
}

impl<P: TextProvider, S: ExpenseStore> BatchProcessor<P, S> {
    /// Create a processor with the default policy and parser.
    pub fn new(provider: P, store: S) -> Self {
        Self {
            policy: SourcePolicy::default(),
            provider,
            store,
            parser: ExpenseParser::new(),
        }
    }

    /// Create a processor from configuration.
    pub fn from_config(config: &ReceiptConfig, provider: P, store: S) -> Self {
        Self {
            policy: SourcePolicy::from_config(&config.sources),
            provider,
            store,
            parser: ExpenseParser::from_config(&config.extraction),
        }
    }

    /// Replace the expense parser.
    pub fn with_parser(mut self, parser: ExpenseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the source policy.
    pub fn with_policy(mut self, policy: SourcePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Process one document.
    pub fn process_document(&mut self, source_ref: &str) -> DocumentReport {
        let kind = self.policy.classify(source_ref);
        let mut report = DocumentReport {
            source_ref: source_ref.to_string(),
            kind,
            content_type: content_type(source_ref),
            outcome: DocumentOutcome::Skipped(SkipReason::UnsupportedType),
            warnings: Vec::new(),
        };

        if !kind.is_supported() {
            warn!("Skipping unsupported file type: {}", source_ref);
            return report;
        }

        let text = match self.provider.extract_text(source_ref, kind) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to extract text from {}: {}", source_ref, e);
                report.outcome = DocumentOutcome::Failed(e.to_string());
                return report;
            }
        };

        if text.trim().is_empty() {
            warn!("No text extracted from {}", source_ref);
            report.outcome = DocumentOutcome::Skipped(SkipReason::EmptyText);
            return report;
        }

        let result = crate::expense::ExpenseExtractor::extract(&self.parser, &text, source_ref);
        report.warnings = result.warnings.clone();

        report.outcome = match result.validate() {
            Err(reason) => {
                warn!("Rejected {}: {}", source_ref, reason);
                DocumentOutcome::Rejected {
                    record: result.record,
                    reason,
                }
            }
            Ok(()) => match self.store.put(&result.record) {
                Ok(()) => {
                    info!("Stored expense {} from {}", result.record.id, source_ref);
                    DocumentOutcome::Stored(result.record)
                }
                Err(e) => {
                    warn!("Failed to store expense from {}: {}", source_ref, e);
                    DocumentOutcome::Failed(e.to_string())
                }
            },
        };

        report
    }

    /// Process every document in order.
    pub fn process_all<I, R>(&mut self, source_refs: I) -> BatchReport
    where
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        let documents: Vec<DocumentReport> = source_refs
            .into_iter()
            .map(|r| self.process_document(r.as_ref()))
            .collect();

        let report = BatchReport { documents };
        info!(
            "Batch complete: {} stored, {} rejected, {} skipped, {} failed",
            report.processed_count(),
            report.rejected_count(),
            report.skipped_count(),
            report.failed_count()
        );
        report
    }
}

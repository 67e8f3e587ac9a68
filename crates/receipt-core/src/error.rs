//! Error types for the receipt-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the receipt library.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// Text could not be obtained from a source document.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Persistence layer error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a source document into raw text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file extension is not on the allow-list.
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    /// The document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plain text source is not valid UTF-8.
    #[error("{0} is not valid UTF-8")]
    Encoding(String),

    /// PDF processing failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// No OCR response was found for an image document.
    #[error("no OCR response for {0}")]
    MissingOcrResponse(String),

    /// The OCR response could not be decoded.
    #[error("invalid OCR response: {0}")]
    OcrPayload(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised by expense stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying storage I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored line could not be decoded.
    #[error("corrupt record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// A record could not be encoded.
    #[error("failed to encode record {id}: {reason}")]
    Encode { id: String, reason: String },
}

/// Result type for the receipt library.
pub type Result<T> = std::result::Result<T, ReceiptError>;

//! Rule-based field extractors for receipts.

pub mod amounts;
pub mod categories;
pub mod dates;
pub mod description;
pub mod patterns;

pub use amounts::{extract_amount, AmountExtractor, AmountRule};
pub use categories::{categorize, CategoryMatcher, CATEGORY_KEYWORDS};
pub use dates::{extract_date, extract_date_or, parse_date, DateExtractor, DateFormat, DEFAULT_YEAR_CUTOFF};
pub use description::{extract_description, fallback_description, DescriptionExtractor, MAX_LEN as MAX_DESCRIPTION_LEN};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract every candidate, in priority order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

//! Expense parser assembling the field rules into one record.

use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::config::ExtractionConfig;
use crate::models::expense::{Category, ExpenseRecord};

use super::rules::{
    description::fallback_description, AmountExtractor, CategoryMatcher, DateExtractor,
    DescriptionExtractor, FieldExtractor, MAX_DESCRIPTION_LEN,
};
use super::validate::{validate_record, Rejection};
use super::ExpenseExtractor;

/// Result of expense extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Assembled record.
    pub record: ExpenseRecord,
    /// Fields that fell back to their defaults.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Run the validation gate over the assembled record.
    pub fn validate(&self) -> Result<(), Rejection> {
        validate_record(&self.record)
    }

    /// Consume the result, keeping the record only if it passes validation.
    pub fn accept(self) -> Result<ExpenseRecord, Rejection> {
        self.validate()?;
        Ok(self.record)
    }
}

/// The four extracted fields, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub amount: Decimal,
    pub category: Category,
    pub description: String,
    pub date: NaiveDate,
}

/// Pair extracted fields with a fresh id, a timestamp and provenance.
pub fn assemble(
    fields: ExtractedFields,
    source_ref: &str,
    text: &str,
    excerpt_len: usize,
) -> ExpenseRecord {
    ExpenseRecord {
        id: Uuid::new_v4().to_string(),
        amount: fields.amount,
        category: fields.category,
        description: fields.description,
        date: fields.date,
        processed_at: Utc::now(),
        source_ref: source_ref.to_string(),
        raw_text_excerpt: text.chars().take(excerpt_len).collect(),
    }
}

/// Rule-based expense parser.
pub struct ExpenseParser {
    /// Maximum description length in characters.
    description_max_len: usize,
    /// Characters of source text kept on the record.
    excerpt_len: usize,
    /// Two-digit year cutoff for dates.
    year_cutoff: i32,
}

impl ExpenseParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from the extraction configuration.
    ///
    /// The description length is capped at [`MAX_DESCRIPTION_LEN`] even if the
    /// configuration was not validated.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            description_max_len: config.description_max_len.min(MAX_DESCRIPTION_LEN),
            excerpt_len: config.excerpt_len,
            year_cutoff: config.two_digit_year_cutoff,
        }
    }

    /// Set the maximum description length, capped at [`MAX_DESCRIPTION_LEN`].
    pub fn with_description_max_len(mut self, max_len: usize) -> Self {
        self.description_max_len = max_len.min(MAX_DESCRIPTION_LEN);
        self
    }

    /// Set the excerpt length.
    pub fn with_excerpt_len(mut self, excerpt_len: usize) -> Self {
        self.excerpt_len = excerpt_len;
        self
    }

    /// Set the two-digit year cutoff.
    pub fn with_year_cutoff(mut self, year_cutoff: i32) -> Self {
        self.year_cutoff = year_cutoff;
        self
    }

    /// Run the four field rules, using `today` when no date is found.
    pub fn extract_fields(
        &self,
        text: &str,
        source_ref: &str,
        today: NaiveDate,
        warnings: &mut Vec<String>,
    ) -> ExtractedFields {
        let amount = match AmountExtractor::new().extract(text) {
            Some(m) => {
                debug!("Amount {} at {:?}", m.value, m.position);
                m.value
            }
            None => {
                warnings.push("No amount found, defaulting to 0.00".to_string());
                Decimal::new(0, 2)
            }
        };

        let category = match CategoryMatcher::new().extract(text) {
            Some(m) => {
                debug!("Category {} from keyword {:?}", m.value, m.source);
                m.value
            }
            None => {
                warnings.push("No category keyword found, defaulting to other".to_string());
                Category::Other
            }
        };

        let description = match DescriptionExtractor::new()
            .with_max_len(self.description_max_len)
            .extract(text)
        {
            Some(m) => m.value,
            None => {
                warnings.push("No description line found, using source name".to_string());
                fallback_description(source_ref, self.description_max_len)
            }
        };

        let date = match DateExtractor::new()
            .with_year_cutoff(self.year_cutoff)
            .extract(text)
        {
            Some(m) => {
                debug!("Date {} from {:?} at {:?}", m.value, m.source, m.position);
                m.value
            }
            None => {
                warnings.push("No date found, defaulting to today".to_string());
                today
            }
        };

        ExtractedFields {
            amount,
            category,
            description,
            date,
        }
    }

    /// Extract and assemble a record with an explicit fallback date.
    pub fn parse_with_today(&self, text: &str, source_ref: &str, today: NaiveDate) -> ExtractionResult {
        // chrono's clock works on wasm32-unknown-unknown, std::time::Instant does not
        let start = Utc::now();
        let mut warnings = Vec::new();

        debug!(
            "Parsing expense from {} characters of text ({})",
            text.len(),
            source_ref
        );

        let fields = self.extract_fields(text, source_ref, today, &mut warnings);
        let record = assemble(fields, source_ref, text, self.excerpt_len);

        info!(
            "Extracted expense {}: {} {} on {}",
            record.id, record.amount, record.category, record.date
        );

        ExtractionResult {
            record,
            warnings,
            processing_time_ms: (Utc::now() - start).num_milliseconds().max(0) as u64,
        }
    }
}

impl Default for ExpenseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseExtractor for ExpenseParser {
    fn extract(&self, text: &str, source_ref: &str) -> ExtractionResult {
        self.parse_with_today(text, source_ref, Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::validate::RequiredField;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const STARBUCKS: &str = "Starbucks Coffee\n123 Main Street\nDate: 01/15/2024\n\nCoffee - Grande    $4.50\nTax               $0.35\nTotal:            $4.85\n\nThank you!";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_complete_extraction() {
        let parser = ExpenseParser::new();
        let result = parser.extract(STARBUCKS, "starbucks_receipt.jpg");

        assert_eq!(
            ExtractedFields {
                amount: result.record.amount,
                category: result.record.category,
                description: result.record.description.clone(),
                date: result.record.date,
            },
            ExtractedFields {
                amount: Decimal::from_str("4.85").unwrap(),
                category: Category::Food,
                description: "Starbucks Coffee".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            }
        );
        assert!(result.warnings.is_empty());
        assert_eq!(result.record.source_ref, "starbucks_receipt.jpg");
        assert_eq!(result.validate(), Ok(()));
    }

    #[test]
    fn test_indented_receipt() {
        let text = "\n        Starbucks Coffee\n        123 Main Street\n        Date: 01/15/2024\n\n        Total:            $4.85\n        ";
        let record = ExpenseParser::new()
            .extract(text, "starbucks_receipt.jpg")
            .accept()
            .unwrap();
        assert_eq!(record.description, "Starbucks Coffee");
        assert_eq!(record.amount, Decimal::new(485, 2));
    }

    #[test]
    fn test_ride_without_amount_is_rejected() {
        let result = ExpenseParser::new().parse_with_today("Uber ride to airport", "uber.txt", today());

        assert_eq!(result.record.category, Category::Transport);
        assert_eq!(result.record.amount.to_string(), "0.00");
        assert_eq!(result.record.date, today());
        assert_eq!(
            result.accept(),
            Err(Rejection::NonPositiveAmount(Decimal::new(0, 2)))
        );
    }

    #[test]
    fn test_bare_number_uses_defaults() {
        let result = ExpenseParser::new().parse_with_today("15.75", "x.txt", today());

        assert_eq!(result.record.amount, Decimal::new(1575, 2));
        assert_eq!(result.record.category, Category::Other);
        assert_eq!(result.record.description, "x.txt");
        assert_eq!(result.record.date, today());
        assert_eq!(result.warnings.len(), 3);
        assert!(result.accept().is_ok());
    }

    #[test]
    fn test_two_digit_year_label() {
        let result = ExpenseParser::new().extract("Date: 01/15/24", "d.txt");
        assert_eq!(result.record.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_excerpt_and_id() {
        let text = "x".repeat(700);
        let parser = ExpenseParser::new();
        let first = parser.extract(&text, "a.txt").record;
        let second = parser.extract(&text, "a.txt").record;

        assert_eq!(first.raw_text_excerpt.chars().count(), 500);
        assert_ne!(first.id, second.id);
        assert!(Uuid::parse_str(&first.id).is_ok());

        let short = ExpenseParser::new().with_excerpt_len(10).extract(&text, "a.txt").record;
        assert_eq!(short.raw_text_excerpt, "x".repeat(10));
    }

    #[test]
    fn test_assemble_then_validate_accepts() {
        let fields = ExtractedFields {
            amount: Decimal::new(1299, 2),
            category: Category::Office,
            description: "Staples".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let record = assemble(fields, "s.txt", "Staples 12.99", 500);
        assert_eq!(validate_record(&record), Ok(()));
    }

    #[test]
    fn test_empty_fallback_description_is_rejected() {
        let result = ExpenseParser::new().extract("$3.00", "uploads/");
        assert_eq!(
            result.validate(),
            Err(Rejection::MissingField(RequiredField::Description))
        );
    }

    #[test]
    fn test_long_first_line_is_capped() {
        let text = format!("{}\nTotal: $5.00", "A".repeat(80));
        let config = ExtractionConfig {
            description_max_len: 80,
            ..ExtractionConfig::default()
        };

        for parser in [
            ExpenseParser::from_config(&config),
            ExpenseParser::new().with_description_max_len(80),
        ] {
            let record = parser.extract(&text, "long.txt").accept().unwrap();
            assert_eq!(record.description.chars().count(), MAX_DESCRIPTION_LEN);
            assert_eq!(record.amount, Decimal::new(500, 2));
        }
    }

    #[test]
    fn test_processing_time_is_recorded() {
        let result = ExpenseParser::new().parse_with_today(STARBUCKS, "s.txt", today());
        assert!(result.processing_time_ms < 60_000);
        assert!(result.record.processed_at <= Utc::now());
    }
}

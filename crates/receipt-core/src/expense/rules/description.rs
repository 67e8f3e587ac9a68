//! Description extraction for receipts.

use super::patterns::DATE_LIKE_PREFIX;
use super::{ExtractionMatch, FieldExtractor};

/// Upper bound on description length, in characters.
pub const MAX_LEN: usize = 50;

/// Default maximum description length, in characters.
pub const DEFAULT_MAX_LEN: usize = MAX_LEN;

/// Lines at or under this many characters are too short to describe an expense.
const MIN_LINE_LEN: usize = 5;

/// Picks the first meaningful line of a receipt, usually the merchant name.
pub struct DescriptionExtractor {
    max_len: usize,
}

impl DescriptionExtractor {
    pub fn new() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Set the maximum description length, capped at [`MAX_LEN`].
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len.min(MAX_LEN);
        self
    }

    fn is_candidate(line: &str) -> bool {
        line.chars().count() > MIN_LINE_LEN && !DATE_LIKE_PREFIX.is_match(line)
    }
}

impl Default for DescriptionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DescriptionExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| Self::is_candidate(line))
            .map(|line| ExtractionMatch::new(truncate_chars(line, self.max_len), 0.8, line))
            .collect()
    }
}

/// Derive a description from the source reference's last path segment.
pub fn fallback_description(source_ref: &str, max_len: usize) -> String {
    let name = source_ref.rsplit('/').next().unwrap_or(source_ref);
    truncate_chars(&name.replace('_', " "), max_len.min(MAX_LEN))
}

/// Extract a description, falling back to the source reference.
pub fn extract_description(text: &str, source_ref: &str) -> String {
    DescriptionExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_else(|| fallback_description(source_ref, DEFAULT_MAX_LEN))
}

fn truncate_chars(s: &str, max_len: usize) -> String {
    s.chars().take(max_len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_extraction() {
        assert_eq!(
            extract_description("Starbucks\n123 Main St\nTotal: $5.50", "test_receipt.jpg"),
            "Starbucks"
        );
        assert_eq!(
            extract_description("McDonald's Restaurant\nOrder #123", "test_receipt.jpg"),
            "McDonald's Restaurant"
        );
    }

    #[test]
    fn test_falls_back_to_source_name() {
        assert_eq!(extract_description("", "test_receipt.jpg"), "test receipt.jpg");
        assert_eq!(extract_description("15.75", "x.txt"), "x.txt");
        assert_eq!(
            extract_description("Hi\n\n  ok  ", "uploads/20240115_103000_cab_fare.png"),
            "20240115 103000 cab fare.png"
        );
    }

    #[test]
    fn test_skips_short_and_date_led_lines() {
        let text = "  \nBP\n01/15/2024 14:02\n2024-01-15\nShell Station #42\n";
        assert_eq!(extract_description(text, "a.txt"), "Shell Station #42");
    }

    #[test]
    fn test_truncates_to_max_len() {
        let long = "A".repeat(80);
        let description = extract_description(&long, "a.txt");
        assert_eq!(description.chars().count(), 50);

        let custom = DescriptionExtractor::new().with_max_len(10).extract(&long).unwrap();
        assert_eq!(custom.value, "AAAAAAAAAA");
        assert_eq!(custom.source, long);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let text = "Café ".repeat(20);
        let description = extract_description(&text, "a.txt");
        assert_eq!(description.chars().count(), 50);
        assert!(description.starts_with("Café Café"));
    }

    #[test]
    fn test_fallback_is_bounded() {
        let source = format!("uploads/{}.txt", "long_name".repeat(10));
        assert!(fallback_description(&source, 50).chars().count() <= 50);
        assert_eq!(fallback_description(&source, 200).chars().count(), MAX_LEN);
    }

    #[test]
    fn test_max_len_is_capped() {
        let long = "B".repeat(80);
        let m = DescriptionExtractor::new().with_max_len(80).extract(&long).unwrap();
        assert_eq!(m.value.chars().count(), MAX_LEN);
    }
}

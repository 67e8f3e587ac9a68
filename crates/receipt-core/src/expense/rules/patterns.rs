//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled totals ("Total: $4.85", "TOTAL 12.00")
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)Total[:\s]*[$€£]?(\d+\.\d{2})\b"
    ).unwrap();

    pub static ref LABELED_AMOUNT: Regex = Regex::new(
        r"(?i)Amount[:\s]*[$€£]?(\d+\.\d{2})\b"
    ).unwrap();

    // Any currency-prefixed amount
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        r"[$€£](\d+\.\d{2})\b"
    ).unwrap();

    // Bare amount bounded by whitespace or text edges
    pub static ref BARE_AMOUNT: Regex = Regex::new(
        r"(?:^|\s)(\d+\.\d{2})(?:\s|$)"
    ).unwrap();

    // Month-first or day-first with four-digit year
    pub static ref DATE_FULL_YEAR: Regex = Regex::new(
        r"(\d{1,2}[/-]\d{1,2}[/-]\d{4})"
    ).unwrap();

    pub static ref DATE_YEAR_FIRST: Regex = Regex::new(
        r"(\d{4}[/-]\d{1,2}[/-]\d{1,2})"
    ).unwrap();

    pub static ref DATE_SHORT_YEAR: Regex = Regex::new(
        r"(\d{1,2}[/-]\d{1,2}[/-]\d{2})"
    ).unwrap();

    pub static ref DATE_LABELED: Regex = Regex::new(
        r"(?i)Date[:\s]*(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})"
    ).unwrap();

    // Lines led by a date-like number ("01/15/2024", "12.50 ...")
    pub static ref DATE_LIKE_PREFIX: Regex = Regex::new(
        r"^\d+[.\-/]\d+"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_requires_two_fraction_digits() {
        assert_eq!(&TOTAL_AMOUNT.captures("Total: $4.85").unwrap()[1], "4.85");
        assert_eq!(&TOTAL_AMOUNT.captures("TOTAL 12.00").unwrap()[1], "12.00");
        assert!(TOTAL_AMOUNT.captures("Total: 100").is_none());
        assert!(TOTAL_AMOUNT.captures("Total: 4.856").is_none());
    }

    #[test]
    fn test_bare_amount_needs_boundaries() {
        assert_eq!(&BARE_AMOUNT.captures("15.75").unwrap()[1], "15.75");
        assert_eq!(&BARE_AMOUNT.captures("paid 3.20 cash").unwrap()[1], "3.20");
        assert!(BARE_AMOUNT.captures("$3.20").is_none());
        assert!(BARE_AMOUNT.captures("v1.20a").is_none());
    }

    #[test]
    fn test_date_like_prefix() {
        assert!(DATE_LIKE_PREFIX.is_match("01/15/2024 Visa"));
        assert!(DATE_LIKE_PREFIX.is_match("2024-01-15"));
        assert!(!DATE_LIKE_PREFIX.is_match("123 Main Street"));
    }
}

//! Expense record data models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A structured expense extracted from one source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier, generated at assembly time.
    pub id: String,

    /// Total amount, fixed-point with two fractional digits.
    pub amount: Decimal,

    /// Spend category.
    pub category: Category,

    /// Short human-readable label (at most 50 characters).
    pub description: String,

    /// Transaction date.
    pub date: NaiveDate,

    /// When the document was processed.
    pub processed_at: DateTime<Utc>,

    /// Reference to the originating document (e.g. storage key).
    pub source_ref: String,

    /// Leading excerpt of the source text, kept for auditing.
    pub raw_text_excerpt: String,
}

impl ExpenseRecord {
    /// Calendar month of the transaction as `YYYY-MM`.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Closed set of spend categories.
///
/// Declaration order is the keyword tie-break order used by the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Office,
    Travel,
    Healthcare,
    Other,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Office,
        Category::Travel,
        Category::Healthcare,
        Category::Other,
    ];

    /// Lower-case name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Office => "office",
            Category::Travel => "travel",
            Category::Healthcare => "healthcare",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Loosely typed view of a record, as seen by the validation gate.
///
/// Every field is optional so that records from untrusted input (JSON,
/// hand-built values) can be checked for presence as well as shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseCandidate {
    pub id: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl ExpenseCandidate {
    /// Decode a candidate from a JSON object.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&ExpenseRecord> for ExpenseCandidate {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            amount: Some(record.amount),
            category: Some(record.category.to_string()),
            description: Some(record.description.clone()),
            date: Some(record.date.format("%Y-%m-%d").to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_name() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serializes_lower_case() {
        let json = serde_json::to_string(&Category::Healthcare).unwrap();
        assert_eq!(json, "\"healthcare\"");
    }

    #[test]
    fn test_candidate_from_json_accepts_missing_fields() {
        let candidate =
            ExpenseCandidate::from_json(r#"{"id": "a", "amount": "12.50"}"#).unwrap();
        assert_eq!(candidate.id.as_deref(), Some("a"));
        assert_eq!(candidate.amount, Some(Decimal::new(1250, 2)));
        assert!(candidate.date.is_none());
    }

    #[test]
    fn test_record_amount_serializes_as_decimal_string() {
        let record = ExpenseRecord {
            id: "id-1".to_string(),
            amount: Decimal::new(485, 2),
            category: Category::Food,
            description: "Starbucks Coffee".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            processed_at: Utc::now(),
            source_ref: "starbucks_receipt.jpg".to_string(),
            raw_text_excerpt: String::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["amount"], "4.85");
        assert_eq!(value["date"], "2024-01-15");
        assert_eq!(record.month(), "2024-01");
    }
}

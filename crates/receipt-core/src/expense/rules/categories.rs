//! Keyword-based expense categorization.

use super::{ExtractionMatch, FieldExtractor};
use crate::models::expense::Category;

/// Keyword table in tie-break order.
///
/// Keywords are lower-case substrings; the first category with any hit wins.
pub static CATEGORY_KEYWORDS: [(Category, &[&str]); 5] = [
    (
        Category::Food,
        &[
            "restaurant", "cafe", "food", "lunch", "dinner", "pizza", "burger", "starbucks",
            "mcdonald", "subway",
        ],
    ),
    (
        Category::Transport,
        &[
            "taxi", "uber", "bus", "train", "fuel", "gas", "parking", "metro", "lyft",
            "transport",
        ],
    ),
    (
        Category::Office,
        &[
            "office", "supplies", "stationery", "paper", "computer", "software", "staples",
            "depot",
        ],
    ),
    (
        Category::Travel,
        &[
            "hotel", "flight", "airline", "accommodation", "booking", "airbnb", "expedia",
            "marriott",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "pharmacy", "medical", "doctor", "hospital", "clinic", "cvs", "walgreens", "health",
        ],
    ),
];

/// Category matcher over [`CATEGORY_KEYWORDS`].
pub struct CategoryMatcher;

impl CategoryMatcher {
    pub fn new() -> Self {
        Self
    }

    fn matches(lowered: &str) -> impl Iterator<Item = ExtractionMatch<Category>> + '_ {
        CATEGORY_KEYWORDS.iter().filter_map(move |(category, keywords)| {
            keywords
                .iter()
                .find(|keyword| lowered.contains(*keyword))
                .map(|keyword| ExtractionMatch::new(*category, 1.0, *keyword))
        })
    }
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CategoryMatcher {
    type Output = ExtractionMatch<Category>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let lowered = text.to_lowercase();
        Self::matches(&lowered).next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lowered = text.to_lowercase();
        Self::matches(&lowered).collect()
    }
}

/// Classify text into a category, defaulting to [`Category::Other`].
pub fn categorize(text: &str) -> Category {
    CategoryMatcher::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_default()
}

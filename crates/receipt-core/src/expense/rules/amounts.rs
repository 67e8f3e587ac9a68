//! Amount extraction for receipts.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, trace};

use super::patterns::{BARE_AMOUNT, CURRENCY_AMOUNT, LABELED_AMOUNT, TOTAL_AMOUNT};
use super::{ExtractionMatch, FieldExtractor};

/// Amount rules, from most to least trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    /// "Total" keyword followed by an amount.
    LabeledTotal,
    /// "Amount" keyword followed by an amount.
    LabeledAmount,
    /// Any amount prefixed by a currency symbol.
    CurrencySymbol,
    /// A standalone number with two fractional digits.
    BareNumber,
}

impl AmountRule {
    /// Evaluation order. The first rule producing a positive value wins.
    pub const ORDER: [AmountRule; 4] = [
        AmountRule::LabeledTotal,
        AmountRule::LabeledAmount,
        AmountRule::CurrencySymbol,
        AmountRule::BareNumber,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            AmountRule::LabeledTotal => &*TOTAL_AMOUNT,
            AmountRule::LabeledAmount => &*LABELED_AMOUNT,
            AmountRule::CurrencySymbol => &*CURRENCY_AMOUNT,
            AmountRule::BareNumber => &*BARE_AMOUNT,
        }
    }

    /// Confidence attached to matches of this rule.
    pub fn confidence(&self) -> f32 {
        match self {
            AmountRule::LabeledTotal => 0.95,
            AmountRule::LabeledAmount => 0.9,
            AmountRule::CurrencySymbol => 0.7,
            AmountRule::BareNumber => 0.4,
        }
    }

    /// Apply this rule to its first occurrence in `text`.
    ///
    /// A capture that does not parse as a decimal is treated as no match.
    pub fn apply(&self, text: &str) -> Option<ExtractionMatch<Decimal>> {
        let caps = self.pattern().captures(text)?;
        let number = caps.get(1)?;

        match Decimal::from_str(number.as_str()) {
            Ok(amount) => Some(
                ExtractionMatch::new(amount, self.confidence(), number.as_str())
                    .with_position(number.start(), number.end()),
            ),
            Err(e) => {
                debug!("{:?} matched unparseable amount {:?}: {}", self, number.as_str(), e);
                None
            }
        }
    }
}

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    /// First strictly positive candidate in rule order.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        AmountRule::ORDER.iter().find_map(|rule| {
            let found = rule.apply(text).filter(|m| m.value > Decimal::ZERO);
            if let Some(m) = &found {
                trace!("amount {} from {:?}", m.value, rule);
            }
            found
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AmountRule::ORDER
            .iter()
            .filter_map(|rule| rule.apply(text))
            .collect()
    }
}

/// Extract the receipt total, or `0.00` when nothing usable is found.
pub fn extract_amount(text: &str) -> Decimal {
    AmountExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_else(|| Decimal::new(0, 2))
}

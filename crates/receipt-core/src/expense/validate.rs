//! Validation gate for assembled expense records.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::rules::MAX_DESCRIPTION_LEN;
use crate::models::expense::{Category, ExpenseCandidate, ExpenseRecord};

/// Fields that must be present and non-empty on an accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Id,
    Amount,
    Category,
    Description,
    Date,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequiredField::Id => "id",
            RequiredField::Amount => "amount",
            RequiredField::Category => "category",
            RequiredField::Description => "description",
            RequiredField::Date => "date",
        };
        f.write_str(name)
    }
}

/// Why a record was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// A required field is absent or empty.
    #[error("missing or empty field: {0}")]
    MissingField(RequiredField),

    /// The category is not one of the known categories.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Amount is zero or negative.
    #[error("invalid amount: {0}")]
    NonPositiveAmount(Decimal),

    /// Date is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date format: {0}")]
    InvalidDate(String),

    /// Description exceeds the maximum length (in characters).
    #[error("description too long: {0} characters")]
    DescriptionTooLong(usize),
}

/// Check a candidate record. The first failing check is reported.
pub fn validate(candidate: &ExpenseCandidate) -> Result<(), Rejection> {
    non_empty(candidate.id.as_deref()).ok_or(Rejection::MissingField(RequiredField::Id))?;
    let amount = candidate
        .amount
        .ok_or(Rejection::MissingField(RequiredField::Amount))?;
    let category = non_empty(candidate.category.as_deref())
        .ok_or(Rejection::MissingField(RequiredField::Category))?;
    let description = non_empty(candidate.description.as_deref())
        .ok_or(Rejection::MissingField(RequiredField::Description))?;
    let date = non_empty(candidate.date.as_deref())
        .ok_or(Rejection::MissingField(RequiredField::Date))?;

    if category.parse::<Category>().is_err() {
        return Err(Rejection::UnknownCategory(category.to_string()));
    }

    if amount <= Decimal::ZERO {
        return Err(Rejection::NonPositiveAmount(amount));
    }

    if !is_iso_date(date) {
        return Err(Rejection::InvalidDate(date.to_string()));
    }

    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(Rejection::DescriptionTooLong(len));
    }

    Ok(())
}

/// Check an assembled record.
pub fn validate_record(record: &ExpenseRecord) -> Result<(), Rejection> {
    validate(&ExpenseCandidate::from(record))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strict `YYYY-MM-DD`: four-digit year, two-digit month and day.
fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    shape_ok && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

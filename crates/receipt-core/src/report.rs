//! Listing and summary views over stored expenses.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::expense::{Category, ExpenseRecord};

/// Sort records by transaction date, newest first.
///
/// Records on the same date keep their stored order.
pub fn sort_by_date_desc(records: &mut [ExpenseRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Total and count for one group of expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bucket {
    pub total: Decimal,
    pub count: usize,
}

impl Bucket {
    fn add(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
    }
}

/// Aggregate view of a set of expenses.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of every amount.
    pub total: Decimal,
    /// Number of records.
    pub count: usize,
    /// Totals per category, in category order.
    pub by_category: BTreeMap<Category, Bucket>,
    /// Totals per `YYYY-MM` month, oldest first.
    pub by_month: BTreeMap<String, Bucket>,
    /// Category totals within each month.
    pub by_month_category: BTreeMap<String, BTreeMap<Category, Bucket>>,
}

impl Summary {
    /// Build a summary from records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut summary = Summary::default();
        for record in records {
            summary.total += record.amount;
            summary.count += 1;
            summary
                .by_category
                .entry(record.category)
                .or_default()
                .add(record.amount);
            summary
                .by_month
                .entry(record.month())
                .or_default()
                .add(record.amount);
            summary
                .by_month_category
                .entry(record.month())
                .or_default()
                .entry(record.category)
                .or_default()
                .add(record.amount);
        }
        summary
    }
}

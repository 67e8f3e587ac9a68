//! Expense record persistence.
//!
//! Stores are keyed by record id: putting a record whose id is already
//! present replaces the earlier one.

mod jsonl;

pub use jsonl::JsonlStore;

use std::collections::HashMap;

use crate::error::StoreError;
use crate::models::expense::ExpenseRecord;

/// Storage for accepted expense records.
pub trait ExpenseStore {
    /// Insert or replace a record.
    fn put(&mut self, record: &ExpenseRecord) -> Result<(), StoreError>;

    /// Every stored record, in first-insertion order.
    fn scan(&self) -> Result<Vec<ExpenseRecord>, StoreError>;
}

impl<S: ExpenseStore + ?Sized> ExpenseStore for &mut S {
    fn put(&mut self, record: &ExpenseRecord) -> Result<(), StoreError> {
        (**self).put(record)
    }

    fn scan(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        (**self).scan()
    }
}

/// Volatile store for tests and one-shot runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<ExpenseRecord>,
    index: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&ExpenseRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub(crate) fn upsert(&mut self, record: ExpenseRecord) {
        match self.index.get(&record.id) {
            Some(&i) => self.records[i] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub(crate) fn into_records(self) -> Vec<ExpenseRecord> {
        self.records
    }
}

impl ExpenseStore for MemoryStore {
    fn put(&mut self, record: &ExpenseRecord) -> Result<(), StoreError> {
        self.upsert(record.clone());
        Ok(())
    }

    fn scan(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::expense::Category;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    pub(crate) fn record(id: &str, cents: i64, category: Category, date: (i32, u32, u32)) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            amount: Decimal::new(cents, 2),
            category,
            description: format!("Expense {id}"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            processed_at: Utc::now(),
            source_ref: format!("{id}.txt"),
            raw_text_excerpt: String::new(),
        }
    }

    #[test]
    fn test_memory_store_upsert() {
        let mut store = MemoryStore::new();
        store.put(&record("a", 100, Category::Food, (2024, 1, 1))).unwrap();
        store.put(&record("b", 200, Category::Travel, (2024, 1, 2))).unwrap();
        store.put(&record("a", 300, Category::Food, (2024, 1, 1))).unwrap();

        let records = store.scan().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].amount, Decimal::new(300, 2));
        assert_eq!(store.get("b").map(|r| r.category), Some(Category::Travel));
    }

    #[test]
    fn test_store_through_mut_reference() {
        let mut store = MemoryStore::new();
        {
            let mut borrowed = &mut store;
            borrowed.put(&record("x", 50, Category::Other, (2024, 5, 5))).unwrap();
        }
        assert_eq!(store.len(), 1);
    }
}

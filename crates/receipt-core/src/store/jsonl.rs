//! Append-only JSON-lines ledger.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ExpenseStore, MemoryStore};
use crate::error::StoreError;
use crate::models::expense::ExpenseRecord;

/// Expense store backed by a JSON-lines file.
///
/// Every `put` appends one line. On `scan`, a later line with the same id
/// replaces the earlier one, so the file behaves like a keyed table.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Open (lazily) a ledger at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpenseStore for JsonlStore {
    fn put(&mut self, record: &ExpenseRecord) -> Result<(), StoreError> {
        let line = serde_json::to_string(record).map_err(|e| StoreError::Encode {
            id: record.id.clone(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        debug!("Stored expense {} in {}", record.id, self.path.display());
        Ok(())
    }

    fn scan(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut table = MemoryStore::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ExpenseRecord =
                serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                    line: i + 1,
                    reason: e.to_string(),
                })?;
            table.upsert(record);
        }

        Ok(table.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::Category;
    use crate::store::tests::record;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("none.jsonl"));
        assert!(store.scan().unwrap().is_empty());
    }

    #[test]
    fn test_put_then_scan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expenses.jsonl");
        let mut store = JsonlStore::new(&path);

        let first = record("a", 485, Category::Food, (2024, 1, 15));
        let second = record("b", 4000, Category::Transport, (2024, 2, 1));
        store.put(&first).unwrap();
        store.put(&second).unwrap();

        let reopened = JsonlStore::new(&path);
        assert_eq!(reopened.scan().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_later_line_replaces_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonlStore::new(dir.path().join("e.jsonl"));

        store.put(&record("a", 100, Category::Food, (2024, 1, 1))).unwrap();
        store.put(&record("b", 200, Category::Food, (2024, 1, 2))).unwrap();
        store.put(&record("a", 999, Category::Office, (2024, 1, 1))).unwrap();

        let records = store.scan().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[0].category, Category::Office);
    }

    #[test]
    fn test_amount_stored_as_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e.jsonl");
        let mut store = JsonlStore::new(&path);
        store.put(&record("a", 485, Category::Food, (2024, 1, 15))).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#""amount":"4.85""#));
        assert!(content.contains(r#""date":"2024-01-15""#));
    }

    #[test]
    fn test_corrupt_line_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e.jsonl");
        fs::write(&path, "\n{not json}\n").unwrap();

        let store = JsonlStore::new(&path);
        assert!(matches!(
            store.scan(),
            Err(StoreError::Corrupt { line: 2, .. })
        ));
    }
}

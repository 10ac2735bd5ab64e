// 💾 Record Store - Append-only CSV persistence
// One expense per row, fixed field order: name, amount, category, date
//
// The backing file is the single source of truth:
// - append opens in append mode and flushes before returning (never truncates)
// - load_all reads the whole file back in row order
// - a missing file is a distinct condition from an existing-but-empty one

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

// ============================================================================
// EXPENSE RECORD
// ============================================================================

/// One logged expense, exactly as it round-trips through the CSV file.
///
/// Field order here defines the column order on disk (no header row).
/// `amount` keeps the text the user entered; the validator guarantees it
/// parses, but rows edited by hand may not - see [`ExpenseRecord::amount_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl ExpenseRecord {
    /// Permissive numeric coercion of the stored amount text.
    ///
    /// Returns `None` for anything that is not a finite number, so summaries
    /// can skip malformed rows instead of failing on them.
    pub fn amount_value(&self) -> Option<f64> {
        match self.amount.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// STORE ERRORS
// ============================================================================

/// Failure modes of the backing file, kept apart so the shell can tell
/// "nothing saved yet" from a real I/O problem.
#[derive(Debug)]
pub enum StoreError {
    /// The backing file does not exist yet - no expense was ever saved.
    NotFound(PathBuf),
    /// The backing file exists but could not be opened, read, or written.
    Io(anyhow::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(path) => {
                write!(f, "expense file not found: {}", path.display())
            }
            StoreError::Io(err) => write!(f, "expense file error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::NotFound(_) => None,
            StoreError::Io(err) => Some(err.as_ref()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.into())
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Io(err.into())
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// Append-only store over a single CSV file.
///
/// Single user, single process: the file is opened, used, and closed within
/// each operation, so there is no held-open handle and no locking.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single CSV row and flush it to disk.
    ///
    /// Creates the file on first use; existing rows are never touched.
    pub fn append(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Read every stored record back, in file order.
    ///
    /// `NotFound` when the file was never created; an empty file is simply
    /// an empty list.
    pub fn load_all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }

        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: ExpenseRecord = result?;
            records.push(record);
        }

        Ok(records)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, amount: &str, category: &str, date: &str) -> ExpenseRecord {
        ExpenseRecord {
            name: name.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_append_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));

        let records = vec![
            record("Groceries", "42.50", "Food", "2024-01-05"),
            record("Bus pass", "12.5e2", "Transport", "2024-01-06"),
            record("Refund", "-9.99", "Shopping", "2024-01-07"),
        ];

        for r in &records {
            store.append(r).unwrap();
        }

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nope.csv"));

        match store.load_all() {
            Err(StoreError::NotFound(path)) => {
                assert_eq!(path, dir.path().join("nope.csv"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_empty_file_is_empty_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        File::create(&path).unwrap();

        let store = RecordStore::new(&path);
        let loaded = store.load_all().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_append_never_truncates_existing_rows() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));

        let first = record("Coffee", "3.20", "Food", "2024-02-01");
        let second = record("Train", "15.00", "Transport", "2024-02-02");

        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn test_delimiter_and_quote_fields_roundtrip() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));

        let tricky = record(
            "Lunch, with dessert",
            "18.75",
            "Food \"out\"",
            "2024-03-10",
        );

        store.append(&tricky).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded, vec![tricky]);
    }

    #[test]
    fn test_amount_value_coercion() {
        assert_eq!(
            record("A", "12.5e2", "X", "2024-01-01").amount_value(),
            Some(1250.0)
        );
        assert_eq!(
            record("A", "-9.99", "X", "2024-01-01").amount_value(),
            Some(-9.99)
        );
        assert_eq!(
            record("A", " 10 ", "X", "2024-01-01").amount_value(),
            Some(10.0)
        );
        assert_eq!(record("A", "abc", "X", "2024-01-01").amount_value(), None);
        assert_eq!(record("A", "", "X", "2024-01-01").amount_value(), None);
        assert_eq!(record("A", "inf", "X", "2024-01-01").amount_value(), None);
        assert_eq!(record("A", "NaN", "X", "2024-01-01").amount_value(), None);
    }
}

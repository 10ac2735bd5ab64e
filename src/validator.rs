// 📝 Field Validator - Turns raw capture-form input into a valid ExpenseRecord
// Rules run in a fixed order and the first violation wins:
// 1. every field filled in
// 2. amount parses as a number
// 3. date is a real YYYY-MM-DD calendar date

use crate::store::ExpenseRecord;
use chrono::NaiveDate;

// ============================================================================
// FORM INPUT
// ============================================================================

/// Raw text of the four capture-form fields, exactly as entered.
///
/// The presentation layer builds one of these and hands it over by value,
/// which keeps validation independent of any UI toolkit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub name: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// First rule an expense form violated. Messages match what the shell
/// shows the user, so they read as complete sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// At least one field is empty or whitespace-only
    MissingField,
    /// Amount does not parse as a finite number
    AmountNotNumeric,
    /// Date is not a real calendar date in YYYY-MM-DD shape
    InvalidDate,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField => write!(f, "All fields must be filled!"),
            ValidationError::AmountNotNumeric => write!(f, "Amount must be a number!"),
            ValidationError::InvalidDate => write!(f, "Date must be in YYYY-MM-DD format!"),
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate the four raw fields and produce the record to persist.
///
/// Outer whitespace is trimmed before any rule runs; the record stores the
/// trimmed text (amount stays verbatim otherwise - `12.5e2` is kept as
/// typed, not normalized to `1250`).
pub fn validate(form: &ExpenseForm) -> Result<ExpenseRecord, ValidationError> {
    let name = form.name.trim();
    let amount = form.amount.trim();
    let category = form.category.trim();
    let date = form.date.trim();

    if name.is_empty() || amount.is_empty() || category.is_empty() || date.is_empty() {
        return Err(ValidationError::MissingField);
    }

    match amount.parse::<f64>() {
        Ok(value) if value.is_finite() => {}
        _ => return Err(ValidationError::AmountNotNumeric),
    }

    if !is_calendar_date(date) {
        return Err(ValidationError::InvalidDate);
    }

    Ok(ExpenseRecord {
        name: name.to_string(),
        amount: amount.to_string(),
        category: category.to_string(),
        date: date.to_string(),
    })
}

/// Strict YYYY-MM-DD check: exact shape (4-digit year, zero-padded month
/// and day) plus calendar validity, so 2024-02-29 passes and 2024-02-30
/// does not.
fn is_calendar_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }

    let digits_at = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !digits_at(0..4) || !digits_at(5..7) || !digits_at(8..10) {
        return false;
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

// ============================================================================
// TESTS
// ============================================================================

// 📊 Aggregator - Sum of spending grouped by category label
// Pure functions over the full record list, recomputed on every request.
// Labels group by exact string equality ("Food" and "food" stay distinct).

use crate::store::ExpenseRecord;
use std::collections::HashMap;

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// Sum amounts per category label.
///
/// Coercion here is permissive and independent of the validator: a row whose
/// amount text no longer parses (hand-edited file) is skipped entirely, not
/// counted as zero. Map iteration order is unspecified.
pub fn category_totals(records: &[ExpenseRecord]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for record in records {
        if let Some(amount) = record.amount_value() {
            *totals.entry(record.category.clone()).or_insert(0.0) += amount;
        }
    }

    totals
}

// ============================================================================
// DISPLAY BREAKDOWN
// ============================================================================

/// One slice of the spending breakdown, ready for a chart or table.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    /// Share of the overall sum, in percent. Zero when the overall sum is
    /// zero (nothing meaningful to apportion).
    pub percent: f64,
}

/// Category totals sorted largest-first, with each category's share of the
/// overall sum - the numbers the original pie chart labeled with `%1.1f%%`.
pub fn spending_breakdown(records: &[ExpenseRecord]) -> Vec<CategoryShare> {
    let totals = category_totals(records);
    let grand_total: f64 = totals.values().sum();

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, total)| {
            let percent = if grand_total == 0.0 {
                0.0
            } else {
                total / grand_total * 100.0
            };
            CategoryShare {
                category,
                total,
                percent,
            }
        })
        .collect();

    // Largest spend first; ties broken by label so the order is stable
    shares.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    shares
}

// ============================================================================
// TESTS
// ============================================================================

// Eco-Friendly Budget Tracker - Core Library
// Exposes record storage, validation, and aggregation for the shell and tests

pub mod store;
pub mod summary;
pub mod tips;
pub mod validator;

// Re-export commonly used types
pub use store::{ExpenseRecord, RecordStore, StoreError};
pub use summary::{category_totals, spending_breakdown, CategoryShare};
pub use tips::ECO_TIPS;
pub use validator::{validate, ExpenseForm, ValidationError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

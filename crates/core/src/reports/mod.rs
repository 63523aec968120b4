//! Report aggregation.
//!
//! Pure, deterministic computations over a loaded transaction set:
//! - Monthly summary (income, expense, balance, top categories, top expenses)
//! - Expense breakdown by category
//! - Expense breakdown by payment method
//! - Month-over-month evolution
//!
//! All rankings use stable sorts, so ties keep retrieval order.

pub mod error;
pub mod period;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use period::{DateRange, YearMonth};
pub use service::ReportService;
pub use types::*;

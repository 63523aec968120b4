//! Monthly budget tracking and alert levels.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{BudgetAlert, BudgetPeriod, BudgetUsage};

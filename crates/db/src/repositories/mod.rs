//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped to the requesting owner.

use sea_orm::{DbErr, SqlErr};

pub mod account;
pub mod budget;
pub mod card;
pub mod category;
pub mod goal;
pub mod refresh_token;
pub mod report;
pub mod transaction;
pub mod user;

pub use account::{
    AccountError, AccountRepository, CreateAccountInput, TransferInput, UpdateAccountInput,
};
pub use budget::{
    BudgetError, BudgetRepository, BudgetStatus, BudgetWithCategory, CreateBudgetInput,
    UpdateBudgetInput,
};
pub use card::{CardError, CardInvoice, CardRepository, CreateCardInput, UpdateCardInput};
pub use category::{
    CategoryError, CategoryRepository, CategoryTree, CreateCategoryInput, UpdateCategoryInput,
};
pub use goal::{
    ContributionInput, CreateGoalInput, GoalError, GoalRepository, GoalWithContributions,
    UpdateGoalInput,
};
pub use refresh_token::RefreshTokenRepository;
pub use report::{ReportError, ReportRepository};
pub use transaction::{
    CreateTransactionInput, TransactionDetails, TransactionError, TransactionFilter,
    TransactionRepository, UpdateTransactionInput,
};
pub use user::{CreateUserInput, UpdateProfileInput, UserError, UserRepository};

/// Message of a unique-index violation, if `err` is one.
///
/// Existence checks run before inserts, but two concurrent requests can both
/// pass them; the index then rejects the loser.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

//! `SeaORM` entity definitions.

pub mod bank_accounts;
pub mod budgets;
pub mod categories;
pub mod credit_cards;
pub mod goal_contributions;
pub mod goals;
pub mod refresh_tokens;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod transfers;
pub mod users;

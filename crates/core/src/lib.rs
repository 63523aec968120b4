//! Core business logic for Lyvinx.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Transaction lifecycle, balance effects and transfers
//! - `budget` - Monthly spending limits and alert levels
//! - `goal` - Savings goals and contributions
//! - `category` - Category ownership and the default catalog
//! - `card` - Credit card invoice periods
//! - `reports` - Summary, breakdown and evolution aggregation
//! - `auth` - Password hashing, CPF validation and account status

pub mod auth;
pub mod budget;
pub mod card;
pub mod category;
pub mod goal;
pub mod ledger;
pub mod percent;
pub mod reports;

pub use percent::calculate_percentage;

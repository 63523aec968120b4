//! Report data types.

use chrono::NaiveDate;
use lyvinx_shared::types::{CategoryId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{PaymentMethod, TransactionStatus, TransactionType};

/// Category attributes carried by a report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Icon identifier.
    pub icon: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
}

/// A transaction as loaded for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTransaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Description.
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Business date.
    pub date: NaiveDate,
    /// Income or expense.
    pub transaction_type: TransactionType,
    /// Lifecycle status.
    pub status: TransactionStatus,
    /// Payment method, if recorded.
    pub payment_method: Option<PaymentMethod>,
    /// Category.
    pub category: CategoryRef,
}

impl ReportTransaction {
    /// PAID expense.
    #[must_use]
    pub fn is_paid_expense(&self) -> bool {
        self.status.is_paid() && self.transaction_type == TransactionType::Expense
    }

    /// PAID income.
    #[must_use]
    pub fn is_paid_income(&self) -> bool {
        self.status.is_paid() && self.transaction_type == TransactionType::Income
    }
}

/// A category's share of total expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub category_name: String,
    /// Total spent.
    pub total: Decimal,
    /// Share of total expense, in percent.
    pub percentage: Decimal,
}

/// One of the largest expenses of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    /// Transaction ID.
    pub id: TransactionId,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: Decimal,
    /// Business date.
    pub date: NaiveDate,
    /// Category name.
    pub category: String,
}

/// Income, expense and balance for a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Month of the range start.
    pub month: u32,
    /// Year of the range start.
    pub year: i32,
    /// Sum of PAID income.
    pub total_income: Decimal,
    /// Sum of PAID expense.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub balance: Decimal,
    /// Top 5 expense categories by total.
    pub top_categories: Vec<CategoryShare>,
    /// Top 10 PAID expenses by amount.
    pub top_expenses: Vec<ExpenseItem>,
}

/// Expense breakdown row for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub category_name: String,
    /// Icon identifier.
    pub icon: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Total spent.
    pub total: Decimal,
    /// Share of total expense, in percent.
    pub percentage: Decimal,
    /// Number of transactions.
    pub transaction_count: u64,
}

/// Expense breakdown row for one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodReport {
    /// Payment method; unset methods are reported as OTHER.
    pub payment_method: PaymentMethod,
    /// Total spent.
    pub total: Decimal,
    /// Share of total expense, in percent.
    pub percentage: Decimal,
    /// Number of transactions.
    pub transaction_count: u64,
}

/// One month of the evolution series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionPoint {
    /// `mmm/yy` label.
    pub month: String,
    /// PAID income.
    pub income: Decimal,
    /// PAID expense.
    pub expense: Decimal,
    /// `income - expense`.
    pub balance: Decimal,
}

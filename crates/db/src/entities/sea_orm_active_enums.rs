//! String-backed enums shared by several tables.
//!
//! Each enum mirrors its `lyvinx-core` counterpart; the `From` impls are the
//! only place the two are mapped.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use lyvinx_core::auth::UserStatus as CoreUserStatus;
use lyvinx_core::goal::GoalStatus as CoreGoalStatus;
use lyvinx_core::ledger::{
    AccountType as CoreAccountType, PaymentMethod as CorePaymentMethod,
    RecurrenceFrequency as CoreRecurrenceFrequency, TransactionStatus as CoreTransactionStatus,
    TransactionType as CoreTransactionType,
};

/// Mirrors a core enum one variant at a time, both directions.
macro_rules! mirror_enum {
    ($db:ident, $core:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

/// Account holder status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserStatus {
    /// Awaiting activation.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Can sign in.
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Disabled.
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

mirror_enum!(UserStatus, CoreUserStatus, [Pending, Active, Inactive]);

/// Bank account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    /// Checking account.
    #[sea_orm(string_value = "CHECKING")]
    Checking,
    /// Savings account.
    #[sea_orm(string_value = "SAVINGS")]
    Savings,
    /// Investment account.
    #[sea_orm(string_value = "INVESTMENT")]
    Investment,
}

mirror_enum!(AccountType, CoreAccountType, [Checking, Savings, Investment]);

/// Transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionType {
    /// Money in.
    #[sea_orm(string_value = "INCOME")]
    Income,
    /// Money out.
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

mirror_enum!(TransactionType, CoreTransactionType, [Income, Expense]);

/// Transaction lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    /// Settled.
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Not yet settled.
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Planned.
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
}

mirror_enum!(TransactionStatus, CoreTransactionStatus, [Paid, Pending, Scheduled]);

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentMethod {
    /// Cash.
    #[sea_orm(string_value = "CASH")]
    Cash,
    /// PIX instant payment.
    #[sea_orm(string_value = "PIX")]
    Pix,
    /// Debit card.
    #[sea_orm(string_value = "DEBIT_CARD")]
    DebitCard,
    /// Credit card.
    #[sea_orm(string_value = "CREDIT_CARD")]
    CreditCard,
    /// Bank slip (boleto).
    #[sea_orm(string_value = "BANK_SLIP")]
    BankSlip,
    /// Bank transfer.
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    /// Anything else.
    #[sea_orm(string_value = "OTHER")]
    Other,
}

mirror_enum!(
    PaymentMethod,
    CorePaymentMethod,
    [Cash, Pix, DebitCard, CreditCard, BankSlip, Transfer, Other]
);

/// Recurrence step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RecurrenceFrequency {
    /// Every day.
    #[sea_orm(string_value = "DAILY")]
    Daily,
    /// Every week.
    #[sea_orm(string_value = "WEEKLY")]
    Weekly,
    /// Every month.
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
    /// Every year.
    #[sea_orm(string_value = "YEARLY")]
    Yearly,
}

mirror_enum!(
    RecurrenceFrequency,
    CoreRecurrenceFrequency,
    [Daily, Weekly, Monthly, Yearly]
);

/// Savings goal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum GoalStatus {
    /// Still collecting.
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    /// Target reached.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Abandoned.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

mirror_enum!(GoalStatus, CoreGoalStatus, [InProgress, Completed, Cancelled]);

//! Bank account repository, including atomic transfers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use lyvinx_core::ledger::{LedgerError, ensure_sufficient_funds, validate_transfer_request};
use lyvinx_shared::types::{AccountId, UserId};

use crate::entities::{bank_accounts, sea_orm_active_enums::AccountType, transfers};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found or owned by someone else.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Transfer rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name.
    pub name: String,
    /// Bank name.
    pub bank: String,
    /// Account kind.
    pub account_type: AccountType,
    /// Opening balance.
    pub balance: Decimal,
    /// `#RRGGBB` color.
    pub color: Option<String>,
}

/// Input for updating an account. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// Account name.
    pub name: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Manual balance correction.
    pub balance: Option<Decimal>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Whether the account is listed.
    pub is_active: Option<bool>,
}

/// Input for a transfer between two accounts of one owner.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Source account.
    pub from_account_id: AccountId,
    /// Destination account.
    pub to_account_id: AccountId,
    /// Amount moved, strictly positive.
    pub amount: Decimal,
    /// Business date.
    pub date: NaiveDate,
    /// Free text.
    pub description: Option<String>,
}

/// Adds `delta` to an account balance inside the database.
pub(crate) async fn apply_balance_delta<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    delta: Decimal,
) -> Result<u64, DbErr> {
    let result = bank_accounts::Entity::update_many()
        .col_expr(
            bank_accounts::Column::Balance,
            Expr::col(bank_accounts::Column::Balance).add(delta),
        )
        .col_expr(
            bank_accounts::Column::UpdatedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(bank_accounts::Column::Id.eq(account_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's active accounts by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<bank_accounts::Model>, DbErr> {
        bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(owner.into_inner()))
            .filter(bank_accounts::Column::IsActive.eq(true))
            .order_by_asc(bank_accounts::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds one of the owner's accounts.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn find(
        &self,
        owner: UserId,
        id: AccountId,
    ) -> Result<bank_accounts::Model, AccountError> {
        find_owned(&self.db, owner, id)
            .await?
            .ok_or(AccountError::NotFound(id.into_inner()))
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateAccountInput,
    ) -> Result<bank_accounts::Model, AccountError> {
        let now = chrono::Utc::now().into();
        let account = bank_accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            user_id: Set(owner.into_inner()),
            name: Set(input.name),
            bank: Set(input.bank),
            account_type: Set(input.account_type),
            balance: Set(input.balance),
            color: Set(input.color),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn update(
        &self,
        owner: UserId,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<bank_accounts::Model, AccountError> {
        let account = self.find(owner, id).await?;

        let mut active: bank_accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(bank) = input.bank {
            active.bank = Set(bank);
        }
        if let Some(balance) = input.balance {
            active.balance = Set(balance);
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn delete(&self, owner: UserId, id: AccountId) -> Result<(), AccountError> {
        let result = bank_accounts::Entity::delete_many()
            .filter(bank_accounts::Column::Id.eq(id.into_inner()))
            .filter(bank_accounts::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AccountError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    /// Moves money between two of the owner's accounts.
    ///
    /// Inside one database transaction: lock the source row, re-check its
    /// balance, decrement the source, increment the destination and insert the
    /// transfer record. Any failure rolls all three writes back.
    ///
    /// # Errors
    ///
    /// `Ledger(SameAccount | NonPositiveAmount | InsufficientFunds)`,
    /// `Ledger(AccountNotFound)` when either account is missing or foreign,
    /// or `Database`.
    pub async fn transfer(
        &self,
        owner: UserId,
        input: TransferInput,
    ) -> Result<transfers::Model, AccountError> {
        validate_transfer_request(input.from_account_id, input.to_account_id, input.amount)?;

        let txn = self.db.begin().await?;

        let source = bank_accounts::Entity::find_by_id(input.from_account_id.into_inner())
            .filter(bank_accounts::Column::UserId.eq(owner.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::AccountNotFound(input.from_account_id.into_inner()))?;

        find_owned(&txn, owner, input.to_account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(input.to_account_id.into_inner()))?;

        ensure_sufficient_funds(source.balance, input.amount)?;

        // conditional decrement still holds where the backend has no row locks
        let debited = bank_accounts::Entity::update_many()
            .col_expr(
                bank_accounts::Column::Balance,
                Expr::col(bank_accounts::Column::Balance).sub(input.amount),
            )
            .col_expr(
                bank_accounts::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(bank_accounts::Column::Id.eq(source.id))
            .filter(bank_accounts::Column::Balance.gte(input.amount))
            .exec(&txn)
            .await?;
        if debited.rows_affected == 0 {
            return Err(LedgerError::InsufficientFunds {
                available: source.balance,
                requested: input.amount,
            }
            .into());
        }

        apply_balance_delta(&txn, input.to_account_id.into_inner(), input.amount).await?;

        let transfer = transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner.into_inner()),
            from_account_id: Set(input.from_account_id.into_inner()),
            to_account_id: Set(input.to_account_id.into_inner()),
            amount: Set(input.amount),
            date: Set(input.date),
            description: Set(input.description),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!(
            transfer_id = %transfer.id,
            amount = %transfer.amount,
            "transfer committed"
        );
        Ok(transfer)
    }

    /// Lists the owner's transfers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_transfers(&self, owner: UserId) -> Result<Vec<transfers::Model>, DbErr> {
        transfers::Entity::find()
            .filter(transfers::Column::UserId.eq(owner.into_inner()))
            .order_by_desc(transfers::Column::Date)
            .order_by_desc(transfers::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}

/// Loads an account only if `owner` holds it.
pub(crate) async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    id: AccountId,
) -> Result<Option<bank_accounts::Model>, DbErr> {
    bank_accounts::Entity::find_by_id(id.into_inner())
        .filter(bank_accounts::Column::UserId.eq(owner.into_inner()))
        .one(conn)
        .await
}

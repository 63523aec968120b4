//! Transaction repository.
//!
//! Only [`TransactionRepository::set_status`] touches account balances; create,
//! update and delete are plain record operations.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use lyvinx_core::ledger::{self, LedgerError, Schedule, status_change_delta};
use lyvinx_shared::types::{
    AccountId, CardId, CategoryId, PageRequest, PageResponse, TransactionId, UserId,
};

use super::{account, card, category};
use crate::entities::{
    bank_accounts, categories, credit_cards,
    sea_orm_active_enums::{PaymentMethod, RecurrenceFrequency, TransactionStatus, TransactionType},
    transactions,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found or owned by someone else.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Category missing or not visible to the owner.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Card missing or owned by someone else.
    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    /// Account missing or owned by someone else.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Amount or schedule rule violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filters for listing transactions. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Income or expense.
    pub transaction_type: Option<TransactionType>,
    /// Lifecycle status.
    pub status: Option<TransactionStatus>,
    /// Category.
    pub category_id: Option<CategoryId>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// First date included.
    pub start_date: Option<NaiveDate>,
    /// Last date included.
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive match on description or notes.
    pub search: Option<String>,
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Description.
    pub description: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Business date.
    pub date: NaiveDate,
    /// Income or expense.
    pub transaction_type: TransactionType,
    /// Initial status.
    pub status: TransactionStatus,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Category, own or default.
    pub category_id: CategoryId,
    /// Linked card.
    pub credit_card_id: Option<CardId>,
    /// Linked bank account.
    pub bank_account_id: Option<AccountId>,
    /// Whether the transaction repeats.
    pub is_recurring: bool,
    /// Repetition frequency.
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    /// Last date of the series.
    pub recurrence_end: Option<NaiveDate>,
    /// Total installments.
    pub installments: Option<i32>,
    /// This installment's number.
    pub installment_number: Option<i32>,
    /// Notes.
    pub notes: Option<String>,
    /// Tags.
    pub tags: Vec<String>,
}

/// Input for updating a transaction. Status changes go through
/// [`TransactionRepository::set_status`].
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// Description.
    pub description: Option<String>,
    /// Positive amount.
    pub amount: Option<Decimal>,
    /// Business date.
    pub date: Option<NaiveDate>,
    /// Income or expense.
    pub transaction_type: Option<TransactionType>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Category.
    pub category_id: Option<CategoryId>,
    /// Linked card.
    pub credit_card_id: Option<CardId>,
    /// Linked bank account.
    pub bank_account_id: Option<AccountId>,
    /// Notes.
    pub notes: Option<String>,
    /// Tags.
    pub tags: Option<Vec<String>>,
}

/// A transaction with the records it references.
#[derive(Debug, Clone)]
pub struct TransactionDetails {
    /// The transaction.
    pub transaction: transactions::Model,
    /// Its category.
    pub category: Option<categories::Model>,
    /// Linked card.
    pub card: Option<credit_cards::Model>,
    /// Linked bank account.
    pub account: Option<bank_accounts::Model>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's transactions, newest first, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: UserId,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<TransactionDetails>, DbErr> {
        let query = Self::filtered(owner, &filter);
        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        let data = self.attach_references(rows).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Finds one of the owner's transactions with its references.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn find(
        &self,
        owner: UserId,
        id: TransactionId,
    ) -> Result<TransactionDetails, TransactionError> {
        let row = self.find_model(owner, id).await?;
        let mut details = self.attach_references(vec![row]).await?;
        details
            .pop()
            .ok_or(TransactionError::NotFound(id.into_inner()))
    }

    /// Creates a transaction. Balances are not touched.
    ///
    /// # Errors
    ///
    /// `Ledger` for a non-positive amount or inconsistent schedule,
    /// `CategoryNotFound`, `CardNotFound`, `AccountNotFound`, or `Database`.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount.into());
        }
        let schedule = Schedule {
            is_recurring: input.is_recurring,
            frequency: input.recurrence_frequency.map(Into::into),
            recurrence_end: input.recurrence_end,
            installments: input.installments,
            installment_number: input.installment_number,
        };
        ledger::validate_schedule(input.date, &schedule)?;

        self.check_references(
            owner,
            Some(input.category_id),
            input.credit_card_id,
            input.bank_account_id,
        )
        .await?;

        let now = chrono::Utc::now().into();
        let model = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            user_id: Set(owner.into_inner()),
            category_id: Set(input.category_id.into_inner()),
            credit_card_id: Set(input.credit_card_id.map(CardId::into_inner)),
            bank_account_id: Set(input.bank_account_id.map(AccountId::into_inner)),
            description: Set(input.description),
            amount: Set(input.amount),
            date: Set(input.date),
            transaction_type: Set(input.transaction_type),
            status: Set(input.status),
            payment_method: Set(input.payment_method),
            is_recurring: Set(input.is_recurring),
            recurrence_frequency: Set(input.recurrence_frequency),
            recurrence_end: Set(input.recurrence_end),
            installments: Set(input.installments),
            installment_number: Set(input.installment_number),
            notes: Set(input.notes),
            tags: Set(serde_json::json!(input.tags)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Updates a transaction. Balances are not touched.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ledger(NonPositiveAmount)`, a reference error, or `Database`.
    pub async fn update(
        &self,
        owner: UserId,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let existing = self.find_model(owner, id).await?;

        if input.amount.is_some_and(|a| a <= Decimal::ZERO) {
            return Err(LedgerError::NonPositiveAmount.into());
        }
        self.check_references(
            owner,
            input.category_id,
            input.credit_card_id,
            input.bank_account_id,
        )
        .await?;

        let mut active: transactions::ActiveModel = existing.into();
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(transaction_type) = input.transaction_type {
            active.transaction_type = Set(transaction_type);
        }
        if let Some(method) = input.payment_method {
            active.payment_method = Set(Some(method));
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id.into_inner());
        }
        if let Some(card_id) = input.credit_card_id {
            active.credit_card_id = Set(Some(card_id.into_inner()));
        }
        if let Some(account_id) = input.bank_account_id {
            active.bank_account_id = Set(Some(account_id.into_inner()));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(tags) = input.tags {
            active.tags = Set(serde_json::json!(tags));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction. Balances are not touched.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn delete(&self, owner: UserId, id: TransactionId) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    /// Changes a transaction's status and applies the balance effect of
    /// crossing the PAID boundary to its linked account, atomically.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`; on error nothing is written.
    pub async fn set_status(
        &self,
        owner: UserId,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<transactions::Model, TransactionError> {
        let txn = self.db.begin().await?;

        let existing = transactions::Entity::find_by_id(id.into_inner())
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(TransactionError::NotFound(id.into_inner()))?;

        let delta = status_change_delta(
            existing.transaction_type.into(),
            existing.amount,
            existing.status.into(),
            status.into(),
        );
        if let (Some(delta), Some(account_id)) = (delta, existing.bank_account_id) {
            account::apply_balance_delta(&txn, account_id, delta).await?;
            tracing::debug!(
                transaction_id = %existing.id,
                account_id = %account_id,
                delta = %delta,
                "applied status change to balance"
            );
        }

        let mut active: transactions::ActiveModel = existing.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    fn filtered(owner: UserId, filter: &TransactionFilter) -> Select<transactions::Entity> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(owner.into_inner()));

        if let Some(ty) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(ty));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id.into_inner()));
        }
        if let Some(method) = filter.payment_method {
            query = query.filter(transactions::Column::PaymentMethod.eq(method));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transactions::Column::Date.lte(end));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(transactions::Column::Description)))
                            .like(pattern.clone()),
                    )
                    .add(Expr::expr(Func::lower(Expr::col(transactions::Column::Notes))).like(pattern)),
            );
        }
        query
    }

    async fn find_model(
        &self,
        owner: UserId,
        id: TransactionId,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id.into_inner())
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id.into_inner()))
    }

    async fn check_references(
        &self,
        owner: UserId,
        category_id: Option<CategoryId>,
        card_id: Option<CardId>,
        account_id: Option<AccountId>,
    ) -> Result<(), TransactionError> {
        if let Some(id) = category_id {
            category::find_visible(&self.db, owner, id)
                .await?
                .ok_or(TransactionError::CategoryNotFound(id.into_inner()))?;
        }
        if let Some(id) = card_id {
            card::find_owned(&self.db, owner, id)
                .await?
                .ok_or(TransactionError::CardNotFound(id.into_inner()))?;
        }
        if let Some(id) = account_id {
            account::find_owned(&self.db, owner, id)
                .await?
                .ok_or(TransactionError::AccountNotFound(id.into_inner()))?;
        }
        Ok(())
    }

    /// Batch-loads the category, card and account of each row.
    async fn attach_references(
        &self,
        rows: Vec<transactions::Model>,
    ) -> Result<Vec<TransactionDetails>, DbErr> {
        let category_ids: HashSet<Uuid> = rows.iter().map(|t| t.category_id).collect();
        let card_ids: HashSet<Uuid> = rows.iter().filter_map(|t| t.credit_card_id).collect();
        let account_ids: HashSet<Uuid> = rows.iter().filter_map(|t| t.bank_account_id).collect();

        let categories: HashMap<Uuid, categories::Model> = categories::Entity::find()
            .filter(categories::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let cards: HashMap<Uuid, credit_cards::Model> = credit_cards::Entity::find()
            .filter(credit_cards::Column::Id.is_in(card_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let accounts: HashMap<Uuid, bank_accounts::Model> = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(rows
            .into_iter()
            .map(|transaction| TransactionDetails {
                category: categories.get(&transaction.category_id).cloned(),
                card: transaction.credit_card_id.and_then(|id| cards.get(&id).cloned()),
                account: transaction
                    .bank_account_id
                    .and_then(|id| accounts.get(&id).cloned()),
                transaction,
            })
            .collect())
    }
}

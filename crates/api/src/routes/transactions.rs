//! Transaction routes.
//!
//! Status changes are the only writes that move account balances and go
//! through their own endpoint.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extractors::{ValidatedJson, ValidatedQuery},
    middleware::AuthUser,
    response,
    validation::positive,
};
use lyvinx_core::ledger::{
    PaymentMethod, RecurrenceFrequency, TransactionStatus, TransactionType, upcoming_occurrence,
};
use lyvinx_db::{
    TransactionRepository,
    entities::{bank_accounts, categories, credit_cards, transactions},
    repositories::{
        CreateTransactionInput, TransactionDetails, TransactionFilter, UpdateTransactionInput,
    },
};
use lyvinx_shared::types::{AccountId, CardId, CategoryId, PageRequest, TransactionId};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/transactions/{id}/status", patch(update_status))
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 20, max: 100).
    pub limit: Option<u32>,
    /// INCOME or EXPENSE.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// Lifecycle status.
    pub status: Option<TransactionStatus>,
    /// Category filter.
    pub category_id: Option<Uuid>,
    /// Payment method filter.
    pub payment_method: Option<PaymentMethod>,
    /// First date included.
    pub start_date: Option<NaiveDate>,
    /// Last date included.
    pub end_date: Option<NaiveDate>,
    /// Text searched in description and notes.
    #[validate(length(max = 100, message = "must have at most 100 characters"))]
    pub search: Option<String>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, max = 255, message = "must have between 1 and 255 characters"))]
    pub description: String,
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Initial status (default: PENDING).
    pub status: Option<TransactionStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub category_id: Uuid,
    pub credit_card_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    pub recurrence_end: Option<NaiveDate>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub installments: Option<i32>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub installment_number: Option<i32>,
    #[validate(length(max = 1000, message = "must have at most 1000 characters"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[validate(length(min = 1, max = 255, message = "must have between 1 and 255 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "positive"))]
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub payment_method: Option<PaymentMethod>,
    pub category_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    #[validate(length(max = 1000, message = "must have at most 1000 characters"))]
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: TransactionStatus,
}

/// Category summary embedded in a transaction.
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl From<categories::Model> for CategorySummary {
    fn from(category: categories::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            icon: category.icon,
            color: category.color,
        }
    }
}

/// Card summary embedded in a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: Uuid,
    pub name: String,
    pub last_digits: String,
}

impl From<credit_cards::Model> for CardSummary {
    fn from(card: credit_cards::Model) -> Self {
        Self {
            id: card.id,
            name: card.name,
            last_digits: card.last_digits,
        }
    }
}

/// Account summary embedded in a transaction.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub bank: String,
}

impl From<bank_accounts::Model> for AccountSummary {
    fn from(account: bank_accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            bank: account.bank,
        }
    }
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub payment_method: Option<PaymentMethod>,
    pub category_id: Uuid,
    pub credit_card_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub is_recurring: bool,
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    pub recurrence_end: Option<NaiveDate>,
    /// Next date of a recurring series, if any remains.
    pub next_occurrence: Option<NaiveDate>,
    pub installments: Option<i32>,
    pub installment_number: Option<i32>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CardSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<AccountSummary>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(tx: transactions::Model) -> Self {
        let frequency: Option<RecurrenceFrequency> = tx.recurrence_frequency.map(Into::into);
        let next_occurrence = frequency
            .filter(|_| tx.is_recurring)
            .and_then(|f| upcoming_occurrence(tx.date, f, tx.recurrence_end));
        let tags = serde_json::from_value(tx.tags).unwrap_or_default();

        Self {
            id: tx.id,
            description: tx.description,
            amount: tx.amount,
            date: tx.date,
            transaction_type: tx.transaction_type.into(),
            status: tx.status.into(),
            payment_method: tx.payment_method.map(Into::into),
            category_id: tx.category_id,
            credit_card_id: tx.credit_card_id,
            bank_account_id: tx.bank_account_id,
            is_recurring: tx.is_recurring,
            recurrence_frequency: frequency,
            recurrence_end: tx.recurrence_end,
            next_occurrence,
            installments: tx.installments,
            installment_number: tx.installment_number,
            notes: tx.notes,
            tags,
            category: None,
            credit_card: None,
            bank_account: None,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

impl From<TransactionDetails> for TransactionResponse {
    fn from(details: TransactionDetails) -> Self {
        let mut response = Self::from(details.transaction);
        response.category = details.category.map(Into::into);
        response.credit_card = details.card.map(Into::into);
        response.bank_account = details.account.map(Into::into);
        response
    }
}

/// GET /transactions - Paginated, filtered listing.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.limit.unwrap_or(defaults.limit),
    );
    let filter = TransactionFilter {
        transaction_type: query.transaction_type.map(Into::into),
        status: query.status.map(Into::into),
        category_id: query.category_id.map(CategoryId::from),
        payment_method: query.payment_method.map(Into::into),
        start_date: query.start_date,
        end_date: query.end_date,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };

    let result = TransactionRepository::new((*state.db).clone())
        .list(auth.user_id(), filter, page)
        .await?;

    Ok(response::ok(result.map(TransactionResponse::from)))
}

/// GET /transactions/{id} - Get one transaction with its references.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let details = TransactionRepository::new((*state.db).clone())
        .find(auth.user_id(), TransactionId::from(id))
        .await?;

    Ok(response::ok(TransactionResponse::from(details)))
}

/// POST /transactions - Record a transaction. Balances are not touched.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let tx = TransactionRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateTransactionInput {
                description: payload.description.trim().to_string(),
                amount: payload.amount,
                date: payload.date,
                transaction_type: payload.transaction_type.into(),
                status: payload.status.unwrap_or(TransactionStatus::Pending).into(),
                payment_method: payload.payment_method.map(Into::into),
                category_id: CategoryId::from(payload.category_id),
                credit_card_id: payload.credit_card_id.map(CardId::from),
                bank_account_id: payload.bank_account_id.map(AccountId::from),
                is_recurring: payload.is_recurring,
                recurrence_frequency: payload.recurrence_frequency.map(Into::into),
                recurrence_end: payload.recurrence_end,
                installments: payload.installments,
                installment_number: payload.installment_number,
                notes: payload.notes,
                tags: payload.tags,
            },
        )
        .await?;

    info!(transaction_id = %tx.id, user_id = %auth.user_id(), "Transaction created");
    Ok(response::created(
        "Transaction created",
        TransactionResponse::from(tx),
    ))
}

/// PUT /transactions/{id} - Edit a transaction's fields.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let tx = TransactionRepository::new((*state.db).clone())
        .update(
            auth.user_id(),
            TransactionId::from(id),
            UpdateTransactionInput {
                description: payload.description.map(|d| d.trim().to_string()),
                amount: payload.amount,
                date: payload.date,
                transaction_type: payload.transaction_type.map(Into::into),
                payment_method: payload.payment_method.map(Into::into),
                category_id: payload.category_id.map(CategoryId::from),
                credit_card_id: payload.credit_card_id.map(CardId::from),
                bank_account_id: payload.bank_account_id.map(AccountId::from),
                notes: payload.notes,
                tags: payload.tags,
            },
        )
        .await?;

    info!(transaction_id = %tx.id, "Transaction updated");
    Ok(response::ok(TransactionResponse::from(tx)))
}

/// DELETE /transactions/{id} - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    TransactionRepository::new((*state.db).clone())
        .delete(auth.user_id(), TransactionId::from(id))
        .await?;

    info!(transaction_id = %id, "Transaction deleted");
    Ok(response::message("Transaction deleted"))
}

/// PATCH /transactions/{id}/status - Change status and settle the linked account.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let tx = TransactionRepository::new((*state.db).clone())
        .set_status(
            auth.user_id(),
            TransactionId::from(id),
            payload.status.into(),
        )
        .await?;

    info!(transaction_id = %tx.id, status = ?payload.status, "Transaction status changed");
    Ok(response::ok(TransactionResponse::from(tx)))
}

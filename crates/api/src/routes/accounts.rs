//! Bank account routes, including transfers between accounts.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
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
    extractors::ValidatedJson,
    middleware::AuthUser,
    response,
    validation::{hex_color, non_negative, positive},
};
use lyvinx_core::ledger::AccountType;
use lyvinx_db::{
    AccountRepository,
    entities::{bank_accounts, transfers},
    repositories::{CreateAccountInput, TransferInput, UpdateAccountInput},
};
use lyvinx_shared::types::AccountId;

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/transfer", post(transfer))
        .route("/accounts/transfers", get(list_transfers))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Account name.
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub name: String,
    /// Bank name.
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub bank: String,
    /// CHECKING, SAVINGS or INVESTMENT.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Opening balance (default: 0).
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub balance: Decimal,
    /// `#RRGGBB` color.
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// Account name.
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub name: Option<String>,
    /// Bank name.
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub bank: Option<String>,
    /// Manual balance correction.
    pub balance: Option<Decimal>,
    /// `#RRGGBB` color.
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
    /// Whether the account is listed.
    pub is_active: Option<bool>,
}

/// Request body for a transfer.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Amount moved.
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    /// Business date (default: today).
    pub date: Option<NaiveDate>,
    /// Free text.
    #[validate(length(max = 255, message = "must have at most 255 characters"))]
    pub description: Option<String>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub bank: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: Decimal,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<bank_accounts::Model> for AccountResponse {
    fn from(account: bank_accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            bank: account.bank,
            account_type: account.account_type.into(),
            balance: account.balance,
            color: account.color,
            is_active: account.is_active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Response for a transfer record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<transfers::Model> for TransferResponse {
    fn from(transfer: transfers::Model) -> Self {
        Self {
            id: transfer.id,
            from_account_id: transfer.from_account_id,
            to_account_id: transfer.to_account_id,
            amount: transfer.amount,
            date: transfer.date,
            description: transfer.description,
            created_at: transfer.created_at,
        }
    }
}

/// GET /accounts - List active accounts.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let accounts = AccountRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;

    let data: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

/// GET /accounts/{id} - Get one account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let account = AccountRepository::new((*state.db).clone())
        .find(auth.user_id(), AccountId::from(id))
        .await?;

    Ok(response::ok(AccountResponse::from(account)))
}

/// POST /accounts - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = AccountRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateAccountInput {
                name: payload.name.trim().to_string(),
                bank: payload.bank.trim().to_string(),
                account_type: payload.account_type.into(),
                balance: payload.balance,
                color: payload.color,
            },
        )
        .await?;

    info!(account_id = %account.id, user_id = %auth.user_id(), "Account created");
    Ok(response::created(
        "Account created",
        AccountResponse::from(account),
    ))
}

/// PUT /accounts/{id} - Update an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = AccountRepository::new((*state.db).clone())
        .update(
            auth.user_id(),
            AccountId::from(id),
            UpdateAccountInput {
                name: payload.name.map(|n| n.trim().to_string()),
                bank: payload.bank.map(|b| b.trim().to_string()),
                balance: payload.balance,
                color: payload.color,
                is_active: payload.is_active,
            },
        )
        .await?;

    info!(account_id = %account.id, "Account updated");
    Ok(response::ok(AccountResponse::from(account)))
}

/// DELETE /accounts/{id} - Delete an account.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    AccountRepository::new((*state.db).clone())
        .delete(auth.user_id(), AccountId::from(id))
        .await?;

    info!(account_id = %id, "Account deleted");
    Ok(response::message("Account deleted"))
}

/// POST /accounts/transfer - Move money between two of the caller's accounts.
async fn transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<TransferRequest>,
) -> ApiResult<impl IntoResponse> {
    let transfer = AccountRepository::new((*state.db).clone())
        .transfer(
            auth.user_id(),
            TransferInput {
                from_account_id: AccountId::from(payload.from_account_id),
                to_account_id: AccountId::from(payload.to_account_id),
                amount: payload.amount,
                date: payload
                    .date
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
                description: payload.description,
            },
        )
        .await?;

    info!(
        transfer_id = %transfer.id,
        from = %transfer.from_account_id,
        to = %transfer.to_account_id,
        amount = %transfer.amount,
        "Transfer completed"
    );
    Ok(response::created(
        "Transfer completed",
        TransferResponse::from(transfer),
    ))
}

/// GET /accounts/transfers - Transfer history, newest first.
async fn list_transfers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let transfers = AccountRepository::new((*state.db).clone())
        .list_transfers(auth.user_id())
        .await?;

    let data: Vec<TransferResponse> = transfers.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

//! Credit card routes and monthly invoices.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Datelike, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::transactions::TransactionResponse;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{ValidatedJson, ValidatedQuery},
    middleware::AuthUser,
    response,
    validation::{hex_color, positive},
};
use lyvinx_core::card::InvoicePeriod;
use lyvinx_db::{
    CardRepository,
    entities::credit_cards,
    repositories::{CardInvoice, CreateCardInput, UpdateCardInput},
};
use lyvinx_shared::types::CardId;

/// Creates the card routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cards", get(list_cards).post(create_card))
        .route(
            "/cards/{id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/cards/{id}/invoice", get(get_invoice))
}

/// Request body for creating a card.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(equal = 4, message = "must have exactly 4 digits"))]
    pub last_digits: String,
    #[validate(custom(function = "positive"))]
    pub limit: Decimal,
    #[validate(range(min = 1, max = 31, message = "must be between 1 and 31"))]
    pub closing_day: u32,
    #[validate(range(min = 1, max = 31, message = "must be between 1 and 31"))]
    pub due_day: u32,
    #[validate(length(max = 50, message = "must have at most 50 characters"))]
    pub brand: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
}

/// Request body for updating a card.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "positive"))]
    pub limit: Option<Decimal>,
    #[validate(range(min = 1, max = 31, message = "must be between 1 and 31"))]
    pub closing_day: Option<u32>,
    #[validate(range(min = 1, max = 31, message = "must be between 1 and 31"))]
    pub due_day: Option<u32>,
    #[validate(length(max = 50, message = "must have at most 50 characters"))]
    pub brand: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

/// Invoice month selector; both default to the current month.
#[derive(Debug, Deserialize, Validate)]
pub struct InvoiceQuery {
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Response for a card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub name: String,
    pub last_digits: String,
    pub limit: Decimal,
    pub closing_day: i32,
    pub due_day: i32,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<credit_cards::Model> for CardResponse {
    fn from(card: credit_cards::Model) -> Self {
        Self {
            id: card.id,
            name: card.name,
            last_digits: card.last_digits,
            limit: card.credit_limit,
            closing_day: card.closing_day,
            due_day: card.due_day,
            brand: card.brand,
            color: card.color,
            is_active: card.is_active,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub card: CardResponse,
    pub month: u32,
    pub year: i32,
    pub period: InvoicePeriod,
    pub total: Decimal,
    /// Credit left after this invoice.
    pub available_limit: Decimal,
    pub transactions: Vec<TransactionResponse>,
}

impl From<CardInvoice> for InvoiceResponse {
    fn from(invoice: CardInvoice) -> Self {
        let available_limit = invoice.card.credit_limit - invoice.total;
        Self {
            card: invoice.card.into(),
            month: invoice.month,
            year: invoice.year,
            period: invoice.period,
            total: invoice.total,
            available_limit,
            transactions: invoice.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

/// GET /cards - List active cards.
async fn list_cards(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let cards = CardRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;

    let data: Vec<CardResponse> = cards.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

/// GET /cards/{id} - Get one card.
async fn get_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let card = CardRepository::new((*state.db).clone())
        .find(auth.user_id(), CardId::from(id))
        .await?;

    Ok(response::ok(CardResponse::from(card)))
}

/// POST /cards - Create a card.
async fn create_card(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCardRequest>,
) -> ApiResult<impl IntoResponse> {
    let card = CardRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateCardInput {
                name: payload.name.trim().to_string(),
                last_digits: payload.last_digits,
                limit: payload.limit,
                closing_day: payload.closing_day,
                due_day: payload.due_day,
                brand: payload.brand,
                color: payload.color,
            },
        )
        .await?;

    info!(card_id = %card.id, user_id = %auth.user_id(), "Card created");
    Ok(response::created("Card created", CardResponse::from(card)))
}

/// PUT /cards/{id} - Update a card.
async fn update_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCardRequest>,
) -> ApiResult<impl IntoResponse> {
    let card = CardRepository::new((*state.db).clone())
        .update(
            auth.user_id(),
            CardId::from(id),
            UpdateCardInput {
                name: payload.name.map(|n| n.trim().to_string()),
                limit: payload.limit,
                closing_day: payload.closing_day,
                due_day: payload.due_day,
                brand: payload.brand,
                color: payload.color,
                is_active: payload.is_active,
            },
        )
        .await?;

    info!(card_id = %card.id, "Card updated");
    Ok(response::ok(CardResponse::from(card)))
}

/// DELETE /cards/{id} - Delete a card.
async fn delete_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    CardRepository::new((*state.db).clone())
        .delete(auth.user_id(), CardId::from(id))
        .await?;

    info!(card_id = %id, "Card deleted");
    Ok(response::message("Card deleted"))
}

/// GET /cards/{id}/invoice - Transactions inside one invoice window.
async fn get_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedQuery(query): ValidatedQuery<InvoiceQuery>,
) -> ApiResult<impl IntoResponse> {
    let today = chrono::Local::now().date_naive();
    let invoice = CardRepository::new((*state.db).clone())
        .invoice(
            auth.user_id(),
            CardId::from(id),
            query.month.unwrap_or_else(|| today.month()),
            query.year.unwrap_or_else(|| today.year()),
        )
        .await?;

    Ok(response::ok(InvoiceResponse::from(invoice)))
}

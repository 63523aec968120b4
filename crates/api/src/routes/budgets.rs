//! Monthly budget routes.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Datelike, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::transactions::CategorySummary;
use crate::{
    AppState,
    error::ApiResult,
    extractors::{ValidatedJson, ValidatedQuery},
    middleware::AuthUser,
    response,
    validation::positive,
};
use lyvinx_core::budget::{BudgetPeriod, BudgetUsage};
use lyvinx_db::{
    BudgetRepository,
    entities::budgets,
    repositories::{BudgetStatus, BudgetWithCategory, CreateBudgetInput, UpdateBudgetInput},
};
use lyvinx_shared::types::{BudgetId, CategoryId};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/status", get(budget_status))
        .route("/budgets/{id}", put(update_budget).delete(delete_budget))
}

/// Month selector; both default to the current month.
#[derive(Debug, Deserialize, Validate)]
pub struct PeriodQuery {
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub month: Option<u32>,
    #[validate(range(min = 2020, max = 2100, message = "must be between 2020 and 2100"))]
    pub year: Option<i32>,
}

impl PeriodQuery {
    fn period(&self) -> ApiResult<BudgetPeriod> {
        let today = chrono::Local::now().date_naive();
        Ok(BudgetPeriod::new(
            self.month.unwrap_or_else(|| today.month()),
            self.year.unwrap_or_else(|| today.year()),
        )?)
    }
}

fn default_true() -> bool {
    true
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    pub category_id: Uuid,
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub month: u32,
    #[validate(range(min = 2020, max = 2100, message = "must be between 2020 and 2100"))]
    pub year: i32,
    #[validate(custom(function = "positive"))]
    pub limit: Decimal,
    #[serde(default = "default_true", rename = "alertAt70")]
    pub alert_at_70: bool,
    #[serde(default = "default_true", rename = "alertAt90")]
    pub alert_at_90: bool,
    #[serde(default = "default_true", rename = "alertAt100")]
    pub alert_at_100: bool,
}

/// Request body for updating a budget.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBudgetRequest {
    #[validate(custom(function = "positive"))]
    pub limit: Option<Decimal>,
    #[serde(rename = "alertAt70")]
    pub alert_at_70: Option<bool>,
    #[serde(rename = "alertAt90")]
    pub alert_at_90: Option<bool>,
    #[serde(rename = "alertAt100")]
    pub alert_at_100: Option<bool>,
}

/// Response for a budget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: i32,
    pub year: i32,
    pub limit: Decimal,
    #[serde(rename = "alertAt70")]
    pub alert_at_70: bool,
    #[serde(rename = "alertAt90")]
    pub alert_at_90: bool,
    #[serde(rename = "alertAt100")]
    pub alert_at_100: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<budgets::Model> for BudgetResponse {
    fn from(budget: budgets::Model) -> Self {
        Self {
            id: budget.id,
            category_id: budget.category_id,
            month: budget.month,
            year: budget.year,
            limit: budget.limit_amount,
            alert_at_70: budget.alert_at_70,
            alert_at_90: budget.alert_at_90,
            alert_at_100: budget.alert_at_100,
            category: None,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

impl From<BudgetWithCategory> for BudgetResponse {
    fn from(row: BudgetWithCategory) -> Self {
        let mut response = Self::from(row.budget);
        response.category = row.category.map(Into::into);
        response
    }
}

/// Live usage of one budget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatusResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub month: i32,
    pub year: i32,
    #[serde(flatten)]
    pub usage: BudgetUsage,
}

impl From<BudgetStatus> for BudgetStatusResponse {
    fn from(status: BudgetStatus) -> Self {
        Self {
            id: status.budget.id,
            category_id: status.budget.category_id,
            category_name: status.category_name,
            month: status.budget.month,
            year: status.budget.year,
            usage: status.usage,
        }
    }
}

/// GET /budgets - Budgets of a month.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let budgets = BudgetRepository::new((*state.db).clone())
        .list(auth.user_id(), query.period()?)
        .await?;

    let data: Vec<BudgetResponse> = budgets.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

/// GET /budgets/status - Spent, remaining and alert level per budget.
async fn budget_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let statuses = BudgetRepository::new((*state.db).clone())
        .status(auth.user_id(), query.period()?)
        .await?;

    let data: Vec<BudgetStatusResponse> = statuses.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

/// POST /budgets - Create a budget for a category and month.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let budget = BudgetRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateBudgetInput {
                category_id: CategoryId::from(payload.category_id),
                period: BudgetPeriod::new(payload.month, payload.year)?,
                limit: payload.limit,
                alert_at_70: payload.alert_at_70,
                alert_at_90: payload.alert_at_90,
                alert_at_100: payload.alert_at_100,
            },
        )
        .await?;

    info!(budget_id = %budget.id, user_id = %auth.user_id(), "Budget created");
    Ok(response::created("Budget created", BudgetResponse::from(budget)))
}

/// PUT /budgets/{id} - Change limit or alerts.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let budget = BudgetRepository::new((*state.db).clone())
        .update(
            auth.user_id(),
            BudgetId::from(id),
            UpdateBudgetInput {
                limit: payload.limit,
                alert_at_70: payload.alert_at_70,
                alert_at_90: payload.alert_at_90,
                alert_at_100: payload.alert_at_100,
            },
        )
        .await?;

    info!(budget_id = %budget.id, "Budget updated");
    Ok(response::ok(BudgetResponse::from(budget)))
}

/// DELETE /budgets/{id} - Delete a budget.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    BudgetRepository::new((*state.db).clone())
        .delete(auth.user_id(), BudgetId::from(id))
        .await?;

    info!(budget_id = %id, "Budget deleted");
    Ok(response::message("Budget deleted"))
}

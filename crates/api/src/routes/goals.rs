//! Savings goal routes.

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
use lyvinx_core::goal::{GoalService, GoalStatus};
use lyvinx_db::{
    GoalRepository,
    entities::{goal_contributions, goals},
    repositories::{ContributionInput, CreateGoalInput, GoalWithContributions, UpdateGoalInput},
};
use lyvinx_shared::types::GoalId;

/// Creates the goal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/contribute", post(contribute))
}

/// Request body for creating a goal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must have at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "positive"))]
    pub target_amount: Decimal,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
    #[validate(length(max = 50, message = "must have at most 50 characters"))]
    pub icon: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
}

/// Request body for updating a goal.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 100, message = "must have between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must have at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "positive"))]
    pub target_amount: Option<Decimal>,
    #[validate(custom(function = "non_negative"))]
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    /// IN_PROGRESS or CANCELLED.
    pub status: Option<GoalStatus>,
    #[validate(length(max = 50, message = "must have at most 50 characters"))]
    pub icon: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
}

/// Request body for a contribution.
#[derive(Debug, Deserialize, Validate)]
pub struct ContributeRequest {
    #[validate(custom(function = "positive"))]
    pub amount: Decimal,
    /// Business date (default: today).
    pub date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "must have at most 500 characters"))]
    pub notes: Option<String>,
}

/// Response for a contribution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<goal_contributions::Model> for ContributionResponse {
    fn from(contribution: goal_contributions::Model) -> Self {
        Self {
            id: contribution.id,
            amount: contribution.amount,
            date: contribution.date,
            notes: contribution.notes,
            created_at: contribution.created_at,
        }
    }
}

/// Response for a goal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    /// Percent of the target reached, at most 100.
    pub progress: Decimal,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub status: GoalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributions: Option<Vec<ContributionResponse>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<goals::Model> for GoalResponse {
    fn from(goal: goals::Model) -> Self {
        Self {
            id: goal.id,
            progress: GoalService::progress(goal.current_amount, goal.target_amount),
            name: goal.name,
            description: goal.description,
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            deadline: goal.deadline,
            icon: goal.icon,
            color: goal.color,
            status: goal.status.into(),
            contributions: None,
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

impl From<GoalWithContributions> for GoalResponse {
    fn from(row: GoalWithContributions) -> Self {
        let mut response = Self::from(row.goal);
        response.contributions = Some(row.contributions.into_iter().map(Into::into).collect());
        response
    }
}

/// Goal and the contribution just recorded.
#[derive(Debug, Serialize)]
pub struct ContributeResponse {
    pub goal: GoalResponse,
    pub contribution: ContributionResponse,
}

/// GET /goals - Goals with their latest contributions.
async fn list_goals(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let goals = GoalRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;

    let data: Vec<GoalResponse> = goals.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

/// GET /goals/{id} - A goal with every contribution.
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let goal = GoalRepository::new((*state.db).clone())
        .find(auth.user_id(), GoalId::from(id))
        .await?;

    Ok(response::ok(GoalResponse::from(goal)))
}

/// POST /goals - Create a goal.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateGoalRequest>,
) -> ApiResult<impl IntoResponse> {
    let goal = GoalRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateGoalInput {
                name: payload.name.trim().to_string(),
                description: payload.description,
                target_amount: payload.target_amount,
                current_amount: payload.current_amount,
                deadline: payload.deadline,
                icon: payload.icon,
                color: payload.color,
            },
        )
        .await?;

    info!(goal_id = %goal.id, user_id = %auth.user_id(), "Goal created");
    Ok(response::created("Goal created", GoalResponse::from(goal)))
}

/// PUT /goals/{id} - Update a goal. COMPLETED cannot be set by hand.
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateGoalRequest>,
) -> ApiResult<impl IntoResponse> {
    let goal = GoalRepository::new((*state.db).clone())
        .update(
            auth.user_id(),
            GoalId::from(id),
            UpdateGoalInput {
                name: payload.name.map(|n| n.trim().to_string()),
                description: payload.description,
                target_amount: payload.target_amount,
                current_amount: payload.current_amount,
                deadline: payload.deadline,
                status: payload.status.map(Into::into),
                icon: payload.icon,
                color: payload.color,
            },
        )
        .await?;

    info!(goal_id = %goal.id, "Goal updated");
    Ok(response::ok(GoalResponse::from(goal)))
}

/// DELETE /goals/{id} - Delete a goal and its contributions.
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    GoalRepository::new((*state.db).clone())
        .delete(auth.user_id(), GoalId::from(id))
        .await?;

    info!(goal_id = %id, "Goal deleted");
    Ok(response::message("Goal deleted"))
}

/// POST /goals/{id}/contribute - Add money to a goal.
async fn contribute(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ContributeRequest>,
) -> ApiResult<impl IntoResponse> {
    let (goal, contribution) = GoalRepository::new((*state.db).clone())
        .contribute(
            auth.user_id(),
            GoalId::from(id),
            ContributionInput {
                amount: payload.amount,
                date: payload
                    .date
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
                notes: payload.notes,
            },
        )
        .await?;

    info!(
        goal_id = %goal.id,
        amount = %contribution.amount,
        status = ?goal.status,
        "Contribution recorded"
    );
    Ok(response::created(
        "Contribution recorded",
        ContributeResponse {
            goal: goal.into(),
            contribution: contribution.into(),
        },
    ))
}

//! Profile routes for the signed-in user.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch, put},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState, error::ApiResult, extractors::ValidatedJson, middleware::AuthUser, response,
};
use lyvinx_core::auth::{
    AuthError, UserStatus, hash_password, validate_optional_cpf, verify_password,
};
use lyvinx_db::{UserRepository, entities::users, repositories::UpdateProfileInput};
use lyvinx_shared::{AppError, types::UserId};

/// Creates the users router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me).put(update_me).delete(delete_me))
        .route("/users/me/password", put(change_password))
        .route("/users/{id}/status", patch(update_status))
}

/// Full profile of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            cpf: user.cpf,
            avatar: user.avatar,
            status: user.status.into(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request body for a profile update.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "must have at least 2 characters"))]
    pub name: Option<String>,
    pub cpf: Option<String>,
    #[validate(length(max = 500, message = "must have at most 500 characters"))]
    pub avatar: Option<String>,
}

/// Request body for a password change.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[validate(length(min = 6, max = 100, message = "must have between 6 and 100 characters"))]
    pub new_password: String,
}

/// Request body for a status change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// GET /users/me - Current profile.
async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(response::ok(UserResponse::from(user)))
}

/// PUT /users/me - Update name, CPF or avatar.
async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let cpf = validate_optional_cpf(payload.cpf.as_deref())?;

    let user = UserRepository::new((*state.db).clone())
        .update_profile(
            auth.user_id(),
            UpdateProfileInput {
                name: payload.name.map(|n| n.trim().to_string()),
                cpf,
                avatar: payload.avatar,
            },
        )
        .await?;

    info!(user_id = %user.id, "Profile updated");
    Ok(response::ok(UserResponse::from(user)))
}

/// PUT /users/me/password - Change password after checking the current one.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(&payload.current_password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    repo.update_password(auth.user_id(), hash_password(&payload.new_password)?)
        .await?;

    info!(user_id = %user.id, "Password changed");
    Ok(response::message("Password updated"))
}

/// DELETE /users/me - Remove the account and everything it owns.
async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    UserRepository::new((*state.db).clone())
        .delete(auth.user_id())
        .await?;

    info!(user_id = %auth.user_id(), "User deleted");
    Ok(response::message("User deleted"))
}

/// PATCH /users/{id}/status - Change the caller's own status.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    if UserId::from(id) != auth.user_id() {
        return Err(AppError::Forbidden("Cannot change another user's status".into()).into());
    }

    let user = UserRepository::new((*state.db).clone())
        .update_status(auth.user_id(), payload.status.into())
        .await?;

    info!(user_id = %user.id, status = ?payload.status, "User status changed");
    Ok(response::ok(UserResponse::from(user)))
}

//! Authentication routes for register, login, token refresh and logout.

use axum::{Router, extract::State, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidatedJson,
    response,
};
use lyvinx_core::auth::{
    AuthError, UserStatus, hash_password, validate_optional_cpf, validate_password_policy,
    verify_password,
};
use lyvinx_db::{
    RefreshTokenRepository, UserRepository, entities::users, repositories::CreateUserInput,
};
use lyvinx_shared::{AppError, auth::TokenPair, types::UserId};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/logout", post(logout))
}

/// Request body for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 2, message = "must have at least 2 characters"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// Plain password.
    #[validate(length(min = 6, max = 100, message = "must have between 6 and 100 characters"))]
    pub password: String,
    /// CPF, with or without punctuation.
    pub cpf: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// Plain password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Request body carrying a refresh token.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Refresh token issued at login.
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

/// Public view of the signed-in user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserInfo {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Account status.
    pub status: UserStatus,
}

impl From<users::Model> for AuthUserInfo {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            status: user.status.into(),
        }
    }
}

/// Response of register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// The user.
    pub user: AuthUserInfo,
    /// Tokens, absent while the account awaits activation.
    #[serde(flatten)]
    pub tokens: Option<TokenPair>,
}

/// Issues a token pair and stores the hashed refresh token.
async fn issue_tokens(state: &AppState, user: &users::Model) -> ApiResult<TokenPair> {
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let (refresh_token, expires_at) = state
        .jwt_service
        .generate_refresh_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    RefreshTokenRepository::new((*state.db).clone())
        .create(UserId::from(user.id), &refresh_token, expires_at)
        .await?;

    Ok(TokenPair::new(
        access_token,
        refresh_token,
        state.jwt_service.access_token_expires_in(),
    ))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_password_policy(&payload.password)?;
    let cpf = validate_optional_cpf(payload.cpf.as_deref())?;
    let status: UserStatus = state.config.auth.initial_user_status.parse()?;
    let password_hash = hash_password(&payload.password)?;

    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            password_hash,
            cpf,
            status: status.into(),
        })
        .await?;

    info!(user_id = %user.id, status = ?status, "New user registered");

    let tokens = match status {
        UserStatus::Active => Some(issue_tokens(&state, &user).await?),
        UserStatus::Pending | UserStatus::Inactive => None,
    };

    Ok(response::created(
        "User registered",
        AuthResponse {
            user: user.into(),
            tokens,
        },
    ))
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let email = payload.email.trim().to_lowercase();
    let user = UserRepository::new((*state.db).clone())
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(AuthError::InvalidCredentials.into());
    }

    UserStatus::from(user.status).ensure_can_authenticate()?;

    let tokens = issue_tokens(&state, &user).await?;
    info!(user_id = %user.id, "User logged in");

    Ok(response::ok(AuthResponse {
        user: user.into(),
        tokens: Some(tokens),
    }))
}

/// POST /auth/refresh-token - Rotate the refresh token.
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let claims = state
        .jwt_service
        .validate_refresh_token(&payload.refresh_token)?;

    let tokens = RefreshTokenRepository::new((*state.db).clone());
    let stored = tokens
        .find_by_token(&payload.refresh_token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;

    if stored.expires_at < chrono::Utc::now() {
        tokens.delete(stored.id).await?;
        return Err(AppError::Unauthorized("Refresh token has expired".into()).into());
    }

    let user = UserRepository::new((*state.db).clone())
        .find_by_id(UserId::from(claims.user_id()))
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;
    UserStatus::from(user.status).ensure_can_authenticate()?;

    let access_token = state
        .jwt_service
        .generate_access_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let (refresh_token, expires_at) = state
        .jwt_service
        .generate_refresh_token(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tokens
        .rotate(stored.id, UserId::from(user.id), &refresh_token, expires_at)
        .await?;

    Ok(response::ok(TokenPair::new(
        access_token,
        refresh_token,
        state.jwt_service.access_token_expires_in(),
    )))
}

/// POST /auth/logout - Invalidate a refresh token.
async fn logout(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let removed = RefreshTokenRepository::new((*state.db).clone())
        .delete_by_token(&payload.refresh_token)
        .await?;
    info!(removed, "Logout");

    Ok(response::message("Logged out"))
}

//! End-to-end tests of the HTTP API over an in-memory SQLite database.

use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

use lyvinx_api::{AppState, create_router};
use lyvinx_db::Migrator;
use lyvinx_shared::AppConfig;
use lyvinx_shared::config::{
    AuthSettings, CorsConfig, DatabaseConfig, JwtSettings, ServerConfig,
};

fn test_config(initial_status: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        jwt: JwtSettings {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 3600,
        },
        auth: AuthSettings {
            initial_user_status: initial_status.to_string(),
        },
        cors: CorsConfig::default(),
    }
}

async fn app_with_status(initial_status: &str) -> Router {
    let config = test_config(initial_status);
    let db = lyvinx_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    create_router(AppState::new(db, config))
}

async fn app() -> Router {
    app_with_status("ACTIVE").await
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
        other => panic!("not a decimal: {other}"),
    }
}

/// Registers a user and returns its access token.
async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Ana Souza", "email": email, "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["accessToken"].as_str().unwrap().to_string()
}

async fn create_account(app: &Router, token: &str, name: &str, balance: Decimal) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/accounts",
        Some(token),
        Some(json!({
            "name": name,
            "bank": "Banco Teste",
            "type": "CHECKING",
            "balance": balance.to_string(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn balance_of(app: &Router, token: &str, id: &str) -> Decimal {
    let (status, body) = send(
        app,
        Method::GET,
        &format!("/api/v1/accounts/{id}"),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    decimal(&body["data"]["balance"])
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = app().await;
    let token = register(&app, "ana@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/v1/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["status"], "ACTIVE");
    assert!(body["data"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ANA@example.com", "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["accessToken"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert_eq!(body["data"]["expiresIn"], 900);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "ana@example.com", "password": "errada123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = app().await;
    register(&app, "dup@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Outra", "email": "dup@example.com", "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let app = app().await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Bruno", "email": "bruno@example.com", "password": "senha123" })),
    )
    .await;
    let refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let rotated = body["data"]["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // the old token was consumed by the rotation
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/logout",
        None,
        Some(json!({ "refreshToken": rotated })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/refresh-token",
        None,
        Some(json!({ "refreshToken": rotated })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/accounts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/v1/accounts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_pending_user_cannot_log_in() {
    let app = app_with_status("PENDING").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "Carla", "email": "carla@example.com", "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["status"], "PENDING");
    assert!(body["data"].get("accessToken").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "carla@example.com", "password": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_validation_errors_are_listed_per_field() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "name": "A", "email": "not-an-email", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "name", "password"]);
}

#[tokio::test]
async fn test_invalid_cpf_is_rejected() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "name": "Davi",
            "email": "davi@example.com",
            "password": "senha123",
            "cpf": "111.111.111-11",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "cpf");
}

#[tokio::test]
async fn test_transfer_flow() {
    let app = app().await;
    let token = register(&app, "transfer@example.com").await;
    let from = create_account(&app, &token, "Corrente", dec!(100)).await;
    let to = create_account(&app, &token, "Poupança", dec!(0)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/accounts/transfer",
        Some(&token),
        Some(json!({ "fromAccountId": from, "toAccountId": to, "amount": "40" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(decimal(&body["data"]["amount"]), dec!(40));
    assert_eq!(balance_of(&app, &token, &from).await, dec!(60));
    assert_eq!(balance_of(&app, &token, &to).await, dec!(40));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/accounts/transfer",
        Some(&token),
        Some(json!({ "fromAccountId": from, "toAccountId": to, "amount": "1000" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INSUFFICIENT_FUNDS");
    assert_eq!(balance_of(&app, &token, &from).await, dec!(60));
    assert_eq!(balance_of(&app, &token, &to).await, dec!(40));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/accounts/transfer",
        Some(&token),
        Some(json!({ "fromAccountId": from, "toAccountId": from, "amount": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_REFERENCE");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/accounts/transfer",
        Some(&token),
        Some(json!({
            "fromAccountId": from,
            "toAccountId": "7f1c2a9e-3b4d-4e5f-8a6b-0c1d2e3f4a5b",
            "amount": "1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_REFERENCE");
    assert_eq!(balance_of(&app, &token, &from).await, dec!(60));

    let (_, body) = send(&app, Method::GET, "/api/v1/accounts/transfers", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_accounts_are_owner_scoped() {
    let app = app().await;
    let owner = register(&app, "owner@example.com").await;
    let other = register(&app, "other@example.com").await;
    let account = create_account(&app, &owner, "Corrente", dec!(10)).await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/v1/accounts/{account}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_user_cannot_change_another_users_status() {
    let app = app().await;
    let victim = register(&app, "victim@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;
    let (_, me) = send(&app, Method::GET, "/api/v1/users/me", Some(&victim), None).await;
    let victim_id = me["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/users/{victim_id}/status"),
        Some(&intruder),
        Some(json!({ "status": "INACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = send(&app, Method::GET, "/api/v1/users/me", Some(&victim), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ACTIVE");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/v1/users/{victim_id}/status"),
        Some(&victim),
        Some(json!({ "status": "INACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "INACTIVE");
}

#[tokio::test]
async fn test_transaction_status_moves_balance() {
    let app = app().await;
    let token = register(&app, "status@example.com").await;
    let account = create_account(&app, &token, "Corrente", dec!(200)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/categories",
        Some(&token),
        Some(json!({ "name": "Mercado", "color": "#22C55E" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let category = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/transactions",
        Some(&token),
        Some(json!({
            "description": "Compras",
            "amount": "50",
            "date": "2024-03-10",
            "type": "EXPENSE",
            "paymentMethod": "DEBIT_CARD",
            "categoryId": category,
            "bankAccountId": account,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "PENDING");
    let tx = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(balance_of(&app, &token, &account).await, dec!(200));

    let uri = format!("/api/v1/transactions/{tx}/status");
    let (status, body) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({ "status": "PAID" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(balance_of(&app, &token, &account).await, dec!(150));

    send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "status": "PAID" }))).await;
    assert_eq!(balance_of(&app, &token, &account).await, dec!(150));

    send(&app, Method::PATCH, &uri, Some(&token), Some(json!({ "status": "PENDING" }))).await;
    assert_eq!(balance_of(&app, &token, &account).await, dec!(200));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/transactions?type=EXPENSE&limit=5",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["category"]["name"], "Mercado");
}

#[tokio::test]
async fn test_goal_contribution_completes_goal() {
    let app = app().await;
    let token = register(&app, "goal@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/goals",
        Some(&token),
        Some(json!({ "name": "Viagem", "targetAmount": "1000", "currentAmount": "900" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal(&body["data"]["progress"]), dec!(90));
    let goal = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/v1/goals/{goal}/contribute"),
        Some(&token),
        Some(json!({ "amount": "150", "date": "2024-05-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["goal"]["status"], "COMPLETED");
    assert_eq!(decimal(&body["data"]["goal"]["progress"]), dec!(100));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/goals/{goal}"),
        Some(&token),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "status");
}

#[tokio::test]
async fn test_report_evolution_rejects_empty_window() {
    let app = app().await;
    let token = register(&app, "reports@example.com").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/reports/evolution?months=3",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/reports/evolution?months=0",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "months");
}

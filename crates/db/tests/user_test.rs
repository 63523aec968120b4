//! Integration tests for users and refresh tokens.

mod common;

use chrono::{Duration, Utc};
use futures::future::join_all;
use rust_decimal_macros::dec;

use common::{create_account, create_category, create_user, setup_db};
use lyvinx_db::entities::sea_orm_active_enums::UserStatus;
use lyvinx_db::repositories::{CreateUserInput, UpdateProfileInput, UserError};
use lyvinx_db::{AccountRepository, RefreshTokenRepository, UserRepository};

fn user_input(email: &str, cpf: Option<&str>) -> CreateUserInput {
    CreateUserInput {
        name: "Maria Silva".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$test_hash".to_string(),
        cpf: cpf.map(str::to_string),
        status: UserStatus::Pending,
    }
}

#[tokio::test]
async fn test_email_and_cpf_conflicts() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());

    let created = repo
        .create(user_input("maria@example.com", Some("52998224725")))
        .await
        .unwrap();
    assert_eq!(created.status, UserStatus::Pending);
    assert!(repo.email_exists("maria@example.com").await.unwrap());

    assert!(matches!(
        repo.create(user_input("maria@example.com", None)).await,
        Err(UserError::EmailInUse)
    ));
    assert!(matches!(
        repo.create(user_input("outra@example.com", Some("52998224725")))
            .await,
        Err(UserError::CpfInUse)
    ));
}

#[tokio::test]
async fn test_profile_update_checks_cpf_of_others_only() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let first = repo
        .create(user_input("a@example.com", Some("52998224725")))
        .await
        .unwrap();
    let second = repo.create(user_input("b@example.com", None)).await.unwrap();

    let same = repo
        .update_profile(
            first.id.into(),
            UpdateProfileInput {
                cpf: Some("52998224725".to_string()),
                avatar: Some("https://cdn.example.com/a.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(same.avatar.as_deref(), Some("https://cdn.example.com/a.png"));

    assert!(matches!(
        repo.update_profile(
            second.id.into(),
            UpdateProfileInput {
                cpf: Some("52998224725".to_string()),
                ..Default::default()
            },
        )
        .await,
        Err(UserError::CpfInUse)
    ));
}

#[tokio::test]
async fn test_status_and_password_updates() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let user = create_user(&db).await;

    let updated = repo.update_status(user, UserStatus::Inactive).await.unwrap();
    assert_eq!(updated.status, UserStatus::Inactive);

    repo.update_password(user, "$argon2id$new".to_string())
        .await
        .unwrap();
    let reloaded = repo.find_by_id(user).await.unwrap().unwrap();
    assert_eq!(reloaded.password_hash, "$argon2id$new");
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let db = setup_db().await;
    let user = create_user(&db).await;
    let tokens = RefreshTokenRepository::new(db.clone());
    let expires = Utc::now() + Duration::days(7);

    let stored = tokens.create(user, "first-token", expires).await.unwrap();
    assert_ne!(stored.token_hash, "first-token");
    let found = tokens.find_by_token("first-token").await.unwrap().unwrap();
    assert_eq!(found.id, stored.id);

    tokens
        .rotate(stored.id, user, "second-token", expires)
        .await
        .unwrap();
    assert!(tokens.find_by_token("first-token").await.unwrap().is_none());
    assert!(tokens.find_by_token("second-token").await.unwrap().is_some());

    assert!(tokens.delete_by_token("second-token").await.unwrap());
    assert!(!tokens.delete_by_token("second-token").await.unwrap());
}

#[tokio::test]
async fn test_cleanup_removes_only_expired_tokens() {
    let db = setup_db().await;
    let user = create_user(&db).await;
    let tokens = RefreshTokenRepository::new(db.clone());

    tokens
        .create(user, "stale", Utc::now() - Duration::days(30))
        .await
        .unwrap();
    tokens
        .create(user, "fresh", Utc::now() + Duration::days(30))
        .await
        .unwrap();

    assert_eq!(tokens.cleanup_expired().await.unwrap(), 1);
    assert!(tokens.find_by_token("fresh").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_cascades_owned_records() {
    let db = setup_db().await;
    let repo = UserRepository::new(db.clone());
    let user = create_user(&db).await;
    create_account(&db, user, dec!(10)).await;
    create_category(&db, user, "Pets").await;
    RefreshTokenRepository::new(db.clone())
        .create(user, "token", Utc::now() + Duration::days(1))
        .await
        .unwrap();

    repo.delete(user).await.unwrap();

    assert!(repo.find_by_id(user).await.unwrap().is_none());
    assert!(AccountRepository::new(db.clone())
        .list(user)
        .await
        .unwrap()
        .is_empty());
    assert!(RefreshTokenRepository::new(db.clone())
        .find_by_token("token")
        .await
        .unwrap()
        .is_none());
    assert!(matches!(repo.delete(user).await, Err(UserError::NotFound(_))));
}

#[tokio::test]
async fn test_concurrent_registrations_with_same_email_conflict() {
    let db = setup_db().await;

    let attempts = (0..4).map(|_| {
        let repo = UserRepository::new(db.clone());
        async move { repo.create(user_input("corrida@example.com", None)).await }
    });
    let results = join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, UserError::EmailInUse)));
}

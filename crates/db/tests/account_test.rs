//! Integration tests for accounts and atomic transfers.

mod common;

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use common::{balance_of, create_account, create_user, d, setup_db};
use lyvinx_core::ledger::LedgerError;
use lyvinx_db::repositories::{AccountError, TransferInput, UpdateAccountInput};
use lyvinx_db::AccountRepository;
use lyvinx_shared::types::AccountId;

fn transfer(from: AccountId, to: AccountId, amount: Decimal) -> TransferInput {
    TransferInput {
        from_account_id: from,
        to_account_id: to,
        amount,
        date: d(2024, 3, 10),
        description: Some("Reserva".to_string()),
    }
}

#[tokio::test]
async fn test_transfer_moves_exact_amount() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let a = create_account(&db, owner, dec!(100)).await;
    let b = create_account(&db, owner, dec!(0)).await;
    let repo = AccountRepository::new(db.clone());

    let record = repo
        .transfer(owner, transfer(a, b, dec!(40)))
        .await
        .expect("Transfer should succeed");

    assert_eq!(record.amount, dec!(40));
    assert_eq!(balance_of(&db, owner, a).await, dec!(60));
    assert_eq!(balance_of(&db, owner, b).await, dec!(40));
    assert_eq!(repo.list_transfers(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insufficient_funds_changes_nothing() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let a = create_account(&db, owner, dec!(60)).await;
    let b = create_account(&db, owner, dec!(40)).await;
    let repo = AccountRepository::new(db.clone());

    let result = repo.transfer(owner, transfer(a, b, dec!(1000))).await;

    assert!(matches!(
        result,
        Err(AccountError::Ledger(LedgerError::InsufficientFunds { .. }))
    ));
    assert_eq!(balance_of(&db, owner, a).await, dec!(60));
    assert_eq!(balance_of(&db, owner, b).await, dec!(40));
    assert!(repo.list_transfers(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transfer_rejects_same_account_and_zero_amount() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let a = create_account(&db, owner, dec!(100)).await;
    let b = create_account(&db, owner, dec!(0)).await;
    let repo = AccountRepository::new(db.clone());

    assert!(matches!(
        repo.transfer(owner, transfer(a, a, dec!(10))).await,
        Err(AccountError::Ledger(LedgerError::SameAccount))
    ));
    assert!(matches!(
        repo.transfer(owner, transfer(a, b, dec!(0))).await,
        Err(AccountError::Ledger(LedgerError::NonPositiveAmount))
    ));
    assert_eq!(balance_of(&db, owner, a).await, dec!(100));
}

#[tokio::test]
async fn test_transfer_to_foreign_account_is_invalid_reference() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let mine = create_account(&db, owner, dec!(100)).await;
    let theirs = create_account(&db, stranger, dec!(0)).await;
    let repo = AccountRepository::new(db.clone());

    let result = repo.transfer(owner, transfer(mine, theirs, dec!(10))).await;

    assert!(matches!(
        result,
        Err(AccountError::Ledger(LedgerError::AccountNotFound(id))) if id == theirs.into_inner()
    ));
    assert_eq!(balance_of(&db, owner, mine).await, dec!(100));
    assert_eq!(balance_of(&db, stranger, theirs).await, dec!(0));
}

#[tokio::test]
async fn test_transfer_from_missing_account_is_invalid_reference() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let mine = create_account(&db, owner, dec!(50)).await;
    let ghost = AccountId::new();
    let repo = AccountRepository::new(db.clone());

    let result = repo.transfer(owner, transfer(ghost, mine, dec!(10))).await;

    assert!(matches!(
        result,
        Err(AccountError::Ledger(LedgerError::AccountNotFound(id))) if id == ghost.into_inner()
    ));
    assert_eq!(balance_of(&db, owner, mine).await, dec!(50));
    assert!(repo.list_transfers(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_transfers_never_overdraw() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let a = create_account(&db, owner, dec!(100)).await;
    let b = create_account(&db, owner, dec!(0)).await;
    let repo = Arc::new(AccountRepository::new(db.clone()));

    let handles = (0..10).map(|_| {
        let repo = Arc::clone(&repo);
        tokio::spawn(async move { repo.transfer(owner, transfer(a, b, dec!(20))).await })
    });
    let results = join_all(handles).await;

    let succeeded = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(succeeded, 5);
    assert_eq!(balance_of(&db, owner, a).await, dec!(0));
    assert_eq!(balance_of(&db, owner, b).await, dec!(100));
    assert_eq!(repo.list_transfers(owner).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_only_active_accounts_by_name() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let repo = AccountRepository::new(db.clone());
    let hidden = create_account(&db, owner, dec!(1)).await;
    create_account(&db, owner, dec!(2)).await;
    create_account(&db, owner, dec!(3)).await;

    repo.update(
        owner,
        hidden,
        UpdateAccountInput {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let accounts = repo.list(owner).await.unwrap();
    assert_eq!(accounts.len(), 2);
    assert!(accounts[0].name <= accounts[1].name);
    assert!(accounts.iter().all(|a| a.id != hidden.into_inner()));
}

#[tokio::test]
async fn test_delete_is_owner_scoped() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let account = create_account(&db, owner, dec!(10)).await;
    let repo = AccountRepository::new(db.clone());

    assert!(matches!(
        repo.delete(stranger, account).await,
        Err(AccountError::NotFound(_))
    ));
    repo.delete(owner, account).await.unwrap();
    assert!(matches!(
        repo.find(owner, account).await,
        Err(AccountError::NotFound(_))
    ));
}

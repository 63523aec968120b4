//! Integration tests for credit cards and invoices.

mod common;

use rust_decimal_macros::dec;

use common::{create_category, create_transaction, create_user, d, setup_db, transaction_input};
use lyvinx_core::card::CardError as CardRuleError;
use lyvinx_db::entities::sea_orm_active_enums::{TransactionStatus, TransactionType};
use lyvinx_db::repositories::{CardError, CreateCardInput, UpdateCardInput};
use lyvinx_db::CardRepository;
use lyvinx_shared::types::CardId;

fn card_input(closing_day: u32, due_day: u32) -> CreateCardInput {
    CreateCardInput {
        name: "Nubank".to_string(),
        last_digits: "1234".to_string(),
        limit: dec!(5000),
        closing_day,
        due_day,
        brand: Some("Mastercard".to_string()),
        color: None,
    }
}

#[tokio::test]
async fn test_invoice_collects_window_transactions() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let category = create_category(&db, owner, "Compras").await;
    let repo = CardRepository::new(db.clone());
    let card = repo.create(owner, card_input(10, 20)).await.unwrap();
    let card_id = CardId::from(card.id);

    for (amount, date) in [
        (dec!(100), d(2024, 2, 9)),
        (dec!(50), d(2024, 3, 10)),
        (dec!(999), d(2024, 2, 8)),
        (dec!(999), d(2024, 3, 11)),
    ] {
        let mut input = transaction_input(
            category,
            TransactionType::Expense,
            TransactionStatus::Pending,
            amount,
            date,
        );
        input.credit_card_id = Some(card_id);
        create_transaction(&db, owner, input).await;
    }

    let invoice = repo.invoice(owner, card_id, 3, 2024).await.unwrap();
    assert_eq!(invoice.period.start, d(2024, 2, 9));
    assert_eq!(invoice.period.closing, d(2024, 3, 10));
    assert_eq!(invoice.period.due, d(2024, 3, 20));
    assert_eq!(invoice.transactions.len(), 2);
    assert_eq!(invoice.total, dec!(150));
}

#[tokio::test]
async fn test_create_validates_days_and_digits() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let repo = CardRepository::new(db.clone());

    assert!(matches!(
        repo.create(owner, card_input(0, 20)).await,
        Err(CardError::Rule(CardRuleError::InvalidDay(0)))
    ));

    let mut bad_digits = card_input(10, 20);
    bad_digits.last_digits = "12a4".to_string();
    assert!(matches!(
        repo.create(owner, bad_digits).await,
        Err(CardError::Rule(CardRuleError::InvalidLastDigits))
    ));
}

#[tokio::test]
async fn test_cards_are_owner_scoped() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let repo = CardRepository::new(db.clone());
    let card = repo.create(owner, card_input(5, 15)).await.unwrap();
    let id = CardId::from(card.id);

    assert!(matches!(
        repo.find(stranger, id).await,
        Err(CardError::NotFound(_))
    ));
    assert!(matches!(
        repo.invoice(stranger, id, 3, 2024).await,
        Err(CardError::NotFound(_))
    ));

    let updated = repo
        .update(
            owner,
            id,
            UpdateCardInput {
                limit: Some(dec!(8000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.credit_limit, dec!(8000));
    assert_eq!(repo.list(owner).await.unwrap().len(), 1);

    repo.delete(owner, id).await.unwrap();
    assert!(repo.list(owner).await.unwrap().is_empty());
}

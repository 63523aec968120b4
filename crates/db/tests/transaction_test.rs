//! Integration tests for transactions and status-driven balance changes.

mod common;

use rust_decimal_macros::dec;

use common::{
    balance_of, create_account, create_category, create_transaction, create_user, d, setup_db,
    transaction_input,
};
use lyvinx_core::category::DEFAULT_CATEGORIES;
use lyvinx_core::ledger::LedgerError;
use lyvinx_db::entities::sea_orm_active_enums::{
    PaymentMethod, RecurrenceFrequency, TransactionStatus, TransactionType,
};
use lyvinx_db::repositories::{TransactionError, TransactionFilter, UpdateTransactionInput};
use lyvinx_db::{CategoryRepository, TransactionRepository};
use lyvinx_shared::types::{CategoryId, PageRequest, TransactionId};

#[tokio::test]
async fn test_paid_round_trip_restores_balance() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let account = create_account(&db, owner, dec!(200)).await;
    let category = create_category(&db, owner, "Mercado").await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = transaction_input(
        category,
        TransactionType::Expense,
        TransactionStatus::Pending,
        dec!(50),
        d(2024, 3, 5),
    );
    input.bank_account_id = Some(account);
    let tx = create_transaction(&db, owner, input).await;
    let id = TransactionId::from(tx.id);
    assert_eq!(balance_of(&db, owner, account).await, dec!(200));

    let paid = repo
        .set_status(owner, id, TransactionStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.status, TransactionStatus::Paid);
    assert_eq!(balance_of(&db, owner, account).await, dec!(150));

    repo.set_status(owner, id, TransactionStatus::Paid)
        .await
        .unwrap();
    assert_eq!(balance_of(&db, owner, account).await, dec!(150));

    repo.set_status(owner, id, TransactionStatus::Pending)
        .await
        .unwrap();
    assert_eq!(balance_of(&db, owner, account).await, dec!(200));
}

#[tokio::test]
async fn test_income_paid_credits_account() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let account = create_account(&db, owner, dec!(10)).await;
    let category = create_category(&db, owner, "Salário").await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = transaction_input(
        category,
        TransactionType::Income,
        TransactionStatus::Pending,
        dec!(90),
        d(2024, 3, 5),
    );
    input.bank_account_id = Some(account);
    let tx = create_transaction(&db, owner, input).await;

    repo.set_status(owner, TransactionId::from(tx.id), TransactionStatus::Paid)
        .await
        .unwrap();
    assert_eq!(balance_of(&db, owner, account).await, dec!(100));

    repo.set_status(owner, TransactionId::from(tx.id), TransactionStatus::Scheduled)
        .await
        .unwrap();
    assert_eq!(balance_of(&db, owner, account).await, dec!(10));
}

#[tokio::test]
async fn test_create_paid_does_not_touch_balance() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let account = create_account(&db, owner, dec!(200)).await;
    let category = create_category(&db, owner, "Lazer").await;

    let mut input = transaction_input(
        category,
        TransactionType::Expense,
        TransactionStatus::Paid,
        dec!(75),
        d(2024, 3, 5),
    );
    input.bank_account_id = Some(account);
    create_transaction(&db, owner, input).await;

    assert_eq!(balance_of(&db, owner, account).await, dec!(200));
}

#[tokio::test]
async fn test_status_change_on_foreign_transaction_is_not_found() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let account = create_account(&db, owner, dec!(200)).await;
    let category = create_category(&db, owner, "Mercado").await;

    let mut input = transaction_input(
        category,
        TransactionType::Expense,
        TransactionStatus::Pending,
        dec!(50),
        d(2024, 3, 5),
    );
    input.bank_account_id = Some(account);
    let tx = create_transaction(&db, owner, input).await;

    let result = TransactionRepository::new(db.clone())
        .set_status(stranger, TransactionId::from(tx.id), TransactionStatus::Paid)
        .await;
    assert!(matches!(result, Err(TransactionError::NotFound(_))));
    assert_eq!(balance_of(&db, owner, account).await, dec!(200));
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let category = create_category(&db, owner, "Mercado").await;
    let foreign_account = create_account(&db, stranger, dec!(0)).await;
    let repo = TransactionRepository::new(db.clone());
    let base = || {
        transaction_input(
            category,
            TransactionType::Expense,
            TransactionStatus::Pending,
            dec!(10),
            d(2024, 3, 5),
        )
    };

    let mut zero = base();
    zero.amount = dec!(0);
    assert!(matches!(
        repo.create(owner, zero).await,
        Err(TransactionError::Ledger(LedgerError::NonPositiveAmount))
    ));

    let mut recurring = base();
    recurring.is_recurring = true;
    assert!(matches!(
        repo.create(owner, recurring).await,
        Err(TransactionError::Ledger(LedgerError::MissingRecurrenceFrequency))
    ));

    let mut foreign = base();
    foreign.bank_account_id = Some(foreign_account);
    assert!(matches!(
        repo.create(owner, foreign).await,
        Err(TransactionError::AccountNotFound(_))
    ));

    let mut unknown_category = base();
    unknown_category.category_id = CategoryId::new();
    assert!(matches!(
        repo.create(owner, unknown_category).await,
        Err(TransactionError::CategoryNotFound(_))
    ));

    let mut monthly = base();
    monthly.is_recurring = true;
    monthly.recurrence_frequency = Some(RecurrenceFrequency::Monthly);
    monthly.recurrence_end = Some(d(2024, 12, 31));
    assert!(repo.create(owner, monthly).await.is_ok());
}

#[tokio::test]
async fn test_default_category_is_a_valid_reference() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let categories = CategoryRepository::new(db.clone());
    categories.seed_defaults(DEFAULT_CATEGORIES).await.unwrap();
    let default = categories
        .list(owner)
        .await
        .unwrap()
        .into_iter()
        .find(|tree| tree.category.user_id.is_none())
        .expect("Defaults should be visible");

    let tx = create_transaction(
        &db,
        owner,
        transaction_input(
            CategoryId::from(default.category.id),
            TransactionType::Expense,
            TransactionStatus::Paid,
            dec!(12),
            d(2024, 3, 5),
        ),
    )
    .await;
    assert_eq!(tx.category_id, default.category.id);
}

#[tokio::test]
async fn test_list_filters_search_and_pagination() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let food = create_category(&db, owner, "Mercado").await;
    let salary = create_category(&db, owner, "Salário").await;
    let repo = TransactionRepository::new(db.clone());

    for day in 1..=5 {
        let mut input = transaction_input(
            food,
            TransactionType::Expense,
            TransactionStatus::Paid,
            dec!(10),
            d(2024, 3, day),
        );
        input.description = format!("Feira {day}");
        input.payment_method = Some(PaymentMethod::Pix);
        create_transaction(&db, owner, input).await;
    }
    let mut income = transaction_input(
        salary,
        TransactionType::Income,
        TransactionStatus::Pending,
        dec!(1000),
        d(2024, 3, 6),
    );
    income.notes = Some("Pagamento EMPRESA".to_string());
    create_transaction(&db, owner, income).await;

    let page = repo
        .list(owner, TransactionFilter::default(), PageRequest::new(1, 4))
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 6);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.data.len(), 4);
    assert_eq!(page.data[0].transaction.date, d(2024, 3, 6));
    assert!(page.data[0].category.is_some());

    let second = repo
        .list(owner, TransactionFilter::default(), PageRequest::new(2, 4))
        .await
        .unwrap();
    assert_eq!(second.data.len(), 2);
    assert_eq!(second.data[1].transaction.date, d(2024, 3, 1));

    let expenses = repo
        .list(
            owner,
            TransactionFilter {
                transaction_type: Some(TransactionType::Expense),
                start_date: Some(d(2024, 3, 2)),
                end_date: Some(d(2024, 3, 4)),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(expenses.pagination.total, 3);

    let searched = repo
        .list(
            owner,
            TransactionFilter {
                search: Some("empresa".to_string()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(searched.pagination.total, 1);
    assert_eq!(
        searched.data[0].transaction.transaction_type,
        TransactionType::Income
    );

    let by_method = repo
        .list(
            owner,
            TransactionFilter {
                payment_method: Some(PaymentMethod::Pix),
                status: Some(TransactionStatus::Paid),
                category_id: Some(food),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_method.pagination.total, 5);
}

#[tokio::test]
async fn test_update_and_delete_leave_balances_alone() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let account = create_account(&db, owner, dec!(200)).await;
    let category = create_category(&db, owner, "Mercado").await;
    let repo = TransactionRepository::new(db.clone());

    let mut input = transaction_input(
        category,
        TransactionType::Expense,
        TransactionStatus::Pending,
        dec!(50),
        d(2024, 3, 5),
    );
    input.bank_account_id = Some(account);
    let tx = create_transaction(&db, owner, input).await;
    let id = TransactionId::from(tx.id);
    repo.set_status(owner, id, TransactionStatus::Paid)
        .await
        .unwrap();

    let updated = repo
        .update(
            owner,
            id,
            UpdateTransactionInput {
                amount: Some(dec!(80)),
                tags: Some(vec!["casa".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, dec!(80));
    assert_eq!(updated.tags, serde_json::json!(["casa"]));
    assert_eq!(balance_of(&db, owner, account).await, dec!(150));

    repo.delete(owner, id).await.unwrap();
    assert_eq!(balance_of(&db, owner, account).await, dec!(150));
    assert!(matches!(
        repo.find(owner, id).await,
        Err(TransactionError::NotFound(_))
    ));
}

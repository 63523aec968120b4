//! Integration tests for budgets and live spending status.

mod common;

use futures::future::join_all;
use rust_decimal_macros::dec;

use common::{create_category, create_transaction, create_user, d, setup_db, transaction_input};
use lyvinx_core::budget::{BudgetAlert, BudgetError as BudgetRuleError, BudgetPeriod};
use lyvinx_db::entities::sea_orm_active_enums::{TransactionStatus, TransactionType};
use lyvinx_db::repositories::{BudgetError, CreateBudgetInput, UpdateBudgetInput};
use lyvinx_db::BudgetRepository;
use lyvinx_shared::types::{BudgetId, CategoryId};

fn budget(category_id: CategoryId, limit: rust_decimal::Decimal) -> CreateBudgetInput {
    CreateBudgetInput {
        category_id,
        period: BudgetPeriod::new(3, 2024).unwrap(),
        limit,
        alert_at_70: true,
        alert_at_90: true,
        alert_at_100: true,
    }
}

#[tokio::test]
async fn test_status_counts_only_paid_expenses_in_month() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let food = create_category(&db, owner, "Mercado").await;
    let repo = BudgetRepository::new(db.clone());
    repo.create(owner, budget(food, dec!(400))).await.unwrap();

    let rows = [
        (TransactionType::Expense, TransactionStatus::Paid, dec!(200), d(2024, 3, 2)),
        (TransactionType::Expense, TransactionStatus::Paid, dec!(100), d(2024, 3, 31)),
        (TransactionType::Expense, TransactionStatus::Pending, dec!(500), d(2024, 3, 10)),
        (TransactionType::Income, TransactionStatus::Paid, dec!(500), d(2024, 3, 10)),
        (TransactionType::Expense, TransactionStatus::Paid, dec!(500), d(2024, 4, 1)),
    ];
    for (ty, status, amount, date) in rows {
        create_transaction(&db, owner, transaction_input(food, ty, status, amount, date)).await;
    }

    let period = BudgetPeriod::new(3, 2024).unwrap();
    let status = repo.status(owner, period).await.unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].category_name, "Mercado");
    assert_eq!(status[0].usage.spent, dec!(300));
    assert_eq!(status[0].usage.remaining, dec!(100));
    assert_eq!(status[0].usage.percentage, dec!(75));
    assert_eq!(status[0].usage.alert, BudgetAlert::Warning);
}

#[tokio::test]
async fn test_duplicate_budget_rejected() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let food = create_category(&db, owner, "Mercado").await;
    let repo = BudgetRepository::new(db.clone());

    repo.create(owner, budget(food, dec!(400))).await.unwrap();
    assert!(matches!(
        repo.create(owner, budget(food, dec!(100))).await,
        Err(BudgetError::Duplicate)
    ));

    let mut other_month = budget(food, dec!(100));
    other_month.period = BudgetPeriod::new(4, 2024).unwrap();
    assert!(repo.create(owner, other_month).await.is_ok());
}

#[tokio::test]
async fn test_create_validates_limit_and_category() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let theirs = create_category(&db, stranger, "Deles").await;
    let mine = create_category(&db, owner, "Meu").await;
    let repo = BudgetRepository::new(db.clone());

    assert!(matches!(
        repo.create(owner, budget(mine, dec!(0))).await,
        Err(BudgetError::Rule(BudgetRuleError::NonPositiveLimit))
    ));
    assert!(matches!(
        repo.create(owner, budget(theirs, dec!(10))).await,
        Err(BudgetError::CategoryNotFound(_))
    ));
}

#[tokio::test]
async fn test_update_and_delete() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    let food = create_category(&db, owner, "Mercado").await;
    let repo = BudgetRepository::new(db.clone());
    let created = repo.create(owner, budget(food, dec!(400))).await.unwrap();
    let id = BudgetId::from(created.id);

    let updated = repo
        .update(
            owner,
            id,
            UpdateBudgetInput {
                limit: Some(dec!(600)),
                alert_at_70: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.limit_amount, dec!(600));
    assert!(!updated.alert_at_70);

    assert!(matches!(
        repo.delete(stranger, id).await,
        Err(BudgetError::NotFound(_))
    ));
    repo.delete(owner, id).await.unwrap();
    let period = BudgetPeriod::new(3, 2024).unwrap();
    assert!(repo.list(owner, period).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_duplicate_budgets_conflict() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let food = create_category(&db, owner, "Mercado").await;

    let attempts = (0..4).map(|_| {
        let repo = BudgetRepository::new(db.clone());
        async move { repo.create(owner, budget(food, dec!(300))).await }
    });
    let results = join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, BudgetError::Duplicate)));
}

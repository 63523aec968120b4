//! Integration tests for reports over stored transactions.

mod common;

use rust_decimal_macros::dec;

use common::{create_category, create_transaction, create_user, d, setup_db, transaction_input};
use lyvinx_core::reports::{DateRange, ReportError as ReportRuleError, YearMonth};
use lyvinx_db::entities::sea_orm_active_enums::{PaymentMethod, TransactionStatus, TransactionType};
use lyvinx_db::repositories::ReportError;
use lyvinx_db::ReportRepository;
use lyvinx_shared::types::UserId;

async fn seed_march(db: &sea_orm::DatabaseConnection, owner: UserId) {
    let salary = create_category(db, owner, "Salário").await;
    let food = create_category(db, owner, "Mercado").await;
    let fun = create_category(db, owner, "Lazer").await;

    create_transaction(
        db,
        owner,
        transaction_input(salary, TransactionType::Income, TransactionStatus::Paid, dec!(500), d(2024, 3, 1)),
    )
    .await;
    let mut groceries = transaction_input(
        food,
        TransactionType::Expense,
        TransactionStatus::Paid,
        dec!(200),
        d(2024, 3, 10),
    );
    groceries.payment_method = Some(PaymentMethod::DebitCard);
    create_transaction(db, owner, groceries).await;
    create_transaction(
        db,
        owner,
        transaction_input(fun, TransactionType::Expense, TransactionStatus::Paid, dec!(100), d(2024, 3, 20)),
    )
    .await;
    create_transaction(
        db,
        owner,
        transaction_input(fun, TransactionType::Expense, TransactionStatus::Pending, dec!(999), d(2024, 3, 21)),
    )
    .await;
    create_transaction(
        db,
        owner,
        transaction_input(food, TransactionType::Expense, TransactionStatus::Paid, dec!(50), d(2024, 2, 15)),
    )
    .await;
}

#[tokio::test]
async fn test_monthly_summary_uses_paid_rows_only() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    seed_march(&db, owner).await;
    let repo = ReportRepository::new(db.clone());

    let range = YearMonth::new(2024, 3).unwrap().range();
    let summary = repo.summary(owner, range).await.unwrap();

    assert_eq!(summary.total_income, dec!(500));
    assert_eq!(summary.total_expense, dec!(300));
    assert_eq!(summary.balance, dec!(200));
    assert_eq!(summary.top_categories[0].category_name, "Mercado");
    assert_eq!(summary.top_expenses.len(), 2);
}

#[tokio::test]
async fn test_breakdowns() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    seed_march(&db, owner).await;
    let repo = ReportRepository::new(db.clone());
    let range = DateRange::new(d(2024, 3, 1), d(2024, 3, 31)).unwrap();

    let by_category = repo.by_category(owner, range).await.unwrap();
    assert_eq!(by_category.len(), 2);
    assert_eq!(by_category[0].category_name, "Mercado");
    assert_eq!(by_category[0].total, dec!(200));
    assert_eq!(by_category[0].transaction_count, 1);

    let by_method = repo.by_payment_method(owner, range).await.unwrap();
    let total: rust_decimal::Decimal = by_method.iter().map(|m| m.total).sum();
    assert_eq!(total, dec!(300));
    assert!(by_method
        .iter()
        .any(|m| m.payment_method == lyvinx_core::ledger::PaymentMethod::Other
            && m.total == dec!(100)));
}

#[tokio::test]
async fn test_evolution_series() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    seed_march(&db, owner).await;
    let repo = ReportRepository::new(db.clone());

    let points = repo
        .evolution(owner, YearMonth::new(2024, 3).unwrap(), 3)
        .await
        .unwrap();
    let labels: Vec<&str> = points.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(labels, ["jan/24", "fev/24", "mar/24"]);
    assert_eq!(points[0].expense, dec!(0));
    assert_eq!(points[1].expense, dec!(50));
    assert_eq!(points[2].balance, dec!(200));

    assert!(matches!(
        repo.evolution(owner, YearMonth::new(2024, 3).unwrap(), 0).await,
        Err(ReportError::Rule(ReportRuleError::InvalidWindow { .. }))
    ));
}

#[tokio::test]
async fn test_reports_are_owner_scoped() {
    let db = setup_db().await;
    let owner = create_user(&db).await;
    let stranger = create_user(&db).await;
    seed_march(&db, owner).await;

    let summary = ReportRepository::new(db.clone())
        .summary(stranger, YearMonth::new(2024, 3).unwrap().range())
        .await
        .unwrap();
    assert_eq!(summary.total_income, dec!(0));
    assert!(summary.top_categories.is_empty());
}

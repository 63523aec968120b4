//! Shared fixtures for repository integration tests.
//!
//! Each test gets its own in-memory SQLite database with the full schema.

#![allow(dead_code)]

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::Name;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use lyvinx_db::entities::sea_orm_active_enums::{
    AccountType, TransactionStatus, TransactionType, UserStatus,
};
use lyvinx_db::repositories::{
    CreateAccountInput, CreateCategoryInput, CreateTransactionInput, CreateUserInput,
};
use lyvinx_db::{
    AccountRepository, CategoryRepository, Migrator, TransactionRepository, UserRepository,
};
use lyvinx_shared::config::DatabaseConfig;
use lyvinx_shared::types::{AccountId, CategoryId, UserId};

/// Fresh migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = lyvinx_db::connect(&config)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub async fn create_user(db: &DatabaseConnection) -> UserId {
    let name: String = Name().fake();
    let user = UserRepository::new(db.clone())
        .create(CreateUserInput {
            name,
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$test_hash".to_string(),
            cpf: None,
            status: UserStatus::Active,
        })
        .await
        .expect("Failed to create user");
    UserId::from(user.id)
}

pub async fn create_account(db: &DatabaseConnection, owner: UserId, balance: Decimal) -> AccountId {
    let account = AccountRepository::new(db.clone())
        .create(
            owner,
            CreateAccountInput {
                name: format!("Conta {}", Uuid::new_v4().simple()),
                bank: "Banco Teste".to_string(),
                account_type: AccountType::Checking,
                balance,
                color: None,
            },
        )
        .await
        .expect("Failed to create account");
    AccountId::from(account.id)
}

pub async fn create_category(db: &DatabaseConnection, owner: UserId, name: &str) -> CategoryId {
    let category = CategoryRepository::new(db.clone())
        .create(
            owner,
            CreateCategoryInput {
                name: name.to_string(),
                icon: None,
                color: Some("#10B981".to_string()),
                parent_id: None,
                description: None,
            },
        )
        .await
        .expect("Failed to create category");
    CategoryId::from(category.id)
}

pub fn transaction_input(
    category_id: CategoryId,
    transaction_type: TransactionType,
    status: TransactionStatus,
    amount: Decimal,
    date: NaiveDate,
) -> CreateTransactionInput {
    CreateTransactionInput {
        description: format!("{transaction_type:?} {amount}"),
        amount,
        date,
        transaction_type,
        status,
        payment_method: None,
        category_id,
        credit_card_id: None,
        bank_account_id: None,
        is_recurring: false,
        recurrence_frequency: None,
        recurrence_end: None,
        installments: None,
        installment_number: None,
        notes: None,
        tags: Vec::new(),
    }
}

pub async fn create_transaction(
    db: &DatabaseConnection,
    owner: UserId,
    input: CreateTransactionInput,
) -> lyvinx_db::entities::transactions::Model {
    TransactionRepository::new(db.clone())
        .create(owner, input)
        .await
        .expect("Failed to create transaction")
}

pub async fn balance_of(db: &DatabaseConnection, owner: UserId, id: AccountId) -> Decimal {
    AccountRepository::new(db.clone())
        .find(owner, id)
        .await
        .expect("Account should exist")
        .balance
}

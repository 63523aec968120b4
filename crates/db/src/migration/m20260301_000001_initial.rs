//! Initial database migration.
//!
//! Built with the backend-agnostic schema builder so the same migration runs
//! on PostgreSQL and on the in-memory SQLite used by the repository tests.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: USERS & TOKENS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string_len(Users::Name, 100))
                    .col(string_len_uniq(Users::Email, 255))
                    .col(string(Users::PasswordHash))
                    .col(string_len_null(Users::Cpf, 11).unique_key())
                    .col(string_null(Users::Avatar))
                    .col(string_len(Users::Status, 16))
                    .col(timestamp_now(Users::CreatedAt))
                    .col(timestamp_now(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RefreshTokens::Table)
                    .if_not_exists()
                    .col(pk_uuid(RefreshTokens::Id))
                    .col(uuid(RefreshTokens::UserId))
                    .col(string_len_uniq(RefreshTokens::TokenHash, 64))
                    .col(timestamp_with_time_zone(RefreshTokens::ExpiresAt))
                    .col(timestamp_now(RefreshTokens::CreatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_refresh_tokens_owner",
                        RefreshTokens::Table,
                        RefreshTokens::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: ACCOUNTS & CARDS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(pk_uuid(BankAccounts::Id))
                    .col(uuid(BankAccounts::UserId))
                    .col(string(BankAccounts::Name))
                    .col(string(BankAccounts::Bank))
                    .col(string_len(BankAccounts::AccountType, 16))
                    .col(money(BankAccounts::Balance))
                    .col(string_len_null(BankAccounts::Color, 7))
                    .col(boolean(BankAccounts::IsActive).default(true))
                    .col(timestamp_now(BankAccounts::CreatedAt))
                    .col(timestamp_now(BankAccounts::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_bank_accounts_owner",
                        BankAccounts::Table,
                        BankAccounts::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditCards::Table)
                    .if_not_exists()
                    .col(pk_uuid(CreditCards::Id))
                    .col(uuid(CreditCards::UserId))
                    .col(string(CreditCards::Name))
                    .col(string_len(CreditCards::LastDigits, 4))
                    .col(money(CreditCards::CreditLimit))
                    .col(integer(CreditCards::ClosingDay))
                    .col(integer(CreditCards::DueDay))
                    .col(string_null(CreditCards::Brand))
                    .col(string_len_null(CreditCards::Color, 7))
                    .col(boolean(CreditCards::IsActive).default(true))
                    .col(timestamp_now(CreditCards::CreatedAt))
                    .col(timestamp_now(CreditCards::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_credit_cards_owner",
                        CreditCards::Table,
                        CreditCards::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: CATEGORIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_uuid(Categories::Id))
                    .col(uuid_null(Categories::UserId))
                    .col(uuid_null(Categories::ParentId))
                    .col(string_len(Categories::Name, 100))
                    .col(string_null(Categories::Icon))
                    .col(string_len_null(Categories::Color, 7))
                    .col(text_null(Categories::Description))
                    .col(timestamp_now(Categories::CreatedAt))
                    .col(timestamp_now(Categories::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_categories_owner",
                        Categories::Table,
                        Categories::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent")
                            .from(Categories::Table, Categories::ParentId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_owner_parent")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::ParentId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: TRANSACTIONS & TRANSFERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Transactions::Id))
                    .col(uuid(Transactions::UserId))
                    .col(uuid(Transactions::CategoryId))
                    .col(uuid_null(Transactions::CreditCardId))
                    .col(uuid_null(Transactions::BankAccountId))
                    .col(string(Transactions::Description))
                    .col(money(Transactions::Amount))
                    .col(date(Transactions::Date))
                    .col(string_len(Transactions::TransactionType, 16))
                    .col(string_len(Transactions::Status, 16))
                    .col(string_len_null(Transactions::PaymentMethod, 16))
                    .col(boolean(Transactions::IsRecurring).default(false))
                    .col(string_len_null(Transactions::RecurrenceFrequency, 16))
                    .col(date_null(Transactions::RecurrenceEnd))
                    .col(integer_null(Transactions::Installments))
                    .col(integer_null(Transactions::InstallmentNumber))
                    .col(text_null(Transactions::Notes))
                    .col(json(Transactions::Tags))
                    .col(timestamp_now(Transactions::CreatedAt))
                    .col(timestamp_now(Transactions::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_transactions_owner",
                        Transactions::Table,
                        Transactions::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_category")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_card")
                            .from(Transactions::Table, Transactions::CreditCardId)
                            .to(CreditCards::Table, CreditCards::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_account")
                            .from(Transactions::Table, Transactions::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_owner_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Transfers::Id))
                    .col(uuid(Transfers::UserId))
                    .col(uuid(Transfers::FromAccountId))
                    .col(uuid(Transfers::ToAccountId))
                    .col(money(Transfers::Amount))
                    .col(date(Transfers::Date))
                    .col(string_null(Transfers::Description))
                    .col(timestamp_now(Transfers::CreatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_transfers_owner",
                        Transfers::Table,
                        Transfers::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_from_account")
                            .from(Transfers::Table, Transfers::FromAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_to_account")
                            .from(Transfers::Table, Transfers::ToAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: BUDGETS & GOALS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(pk_uuid(Budgets::Id))
                    .col(uuid(Budgets::UserId))
                    .col(uuid(Budgets::CategoryId))
                    .col(integer(Budgets::Month))
                    .col(integer(Budgets::Year))
                    .col(money(Budgets::LimitAmount))
                    .col(money(Budgets::Spent).default(0))
                    .col(boolean(Budgets::AlertAt70).default(true))
                    .col(boolean(Budgets::AlertAt90).default(true))
                    .col(boolean(Budgets::AlertAt100).default(true))
                    .col(timestamp_now(Budgets::CreatedAt))
                    .col(timestamp_now(Budgets::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_budgets_owner",
                        Budgets::Table,
                        Budgets::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_budgets_category")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_budgets_owner_category_period")
                    .table(Budgets::Table)
                    .col(Budgets::UserId)
                    .col(Budgets::CategoryId)
                    .col(Budgets::Month)
                    .col(Budgets::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Goals::Table)
                    .if_not_exists()
                    .col(pk_uuid(Goals::Id))
                    .col(uuid(Goals::UserId))
                    .col(string(Goals::Name))
                    .col(text_null(Goals::Description))
                    .col(money(Goals::TargetAmount))
                    .col(money(Goals::CurrentAmount).default(0))
                    .col(date_null(Goals::Deadline))
                    .col(string_null(Goals::Icon))
                    .col(string_len_null(Goals::Color, 7))
                    .col(string_len(Goals::Status, 16))
                    .col(timestamp_now(Goals::CreatedAt))
                    .col(timestamp_now(Goals::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_goals_owner",
                        Goals::Table,
                        Goals::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoalContributions::Table)
                    .if_not_exists()
                    .col(pk_uuid(GoalContributions::Id))
                    .col(uuid(GoalContributions::GoalId))
                    .col(money(GoalContributions::Amount))
                    .col(date(GoalContributions::Date))
                    .col(text_null(GoalContributions::Notes))
                    .col(timestamp_now(GoalContributions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goal_contributions_goal")
                            .from(GoalContributions::Table, GoalContributions::GoalId)
                            .to(Goals::Table, Goals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GoalContributions::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Goals::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Budgets::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Transfers::Table).to_owned()).await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RefreshTokens::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

/// Decimal(15, 2) money column.
fn money<T: IntoIden>(col: T) -> ColumnDef {
    decimal_len(col, 15, 2)
}

/// Timestamp column defaulting to now.
fn timestamp_now<T: IntoIden>(col: T) -> ColumnDef {
    timestamp_with_time_zone(col)
        .default(Expr::current_timestamp())
        .to_owned()
}

/// `user_id -> users.id ON DELETE CASCADE`.
fn owner_fk<T: IntoIden + 'static, C: IntoIden>(name: &str, table: T, col: C) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, col)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Cpf,
    Avatar,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RefreshTokens {
    Table,
    Id,
    UserId,
    TokenHash,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BankAccounts {
    Table,
    Id,
    UserId,
    Name,
    Bank,
    AccountType,
    Balance,
    Color,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CreditCards {
    Table,
    Id,
    UserId,
    Name,
    LastDigits,
    CreditLimit,
    ClosingDay,
    DueDay,
    Brand,
    Color,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    UserId,
    ParentId,
    Name,
    Icon,
    Color,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    CategoryId,
    CreditCardId,
    BankAccountId,
    Description,
    Amount,
    Date,
    TransactionType,
    Status,
    PaymentMethod,
    IsRecurring,
    RecurrenceFrequency,
    RecurrenceEnd,
    Installments,
    InstallmentNumber,
    Notes,
    Tags,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    Id,
    UserId,
    FromAccountId,
    ToAccountId,
    Amount,
    Date,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Budgets {
    Table,
    Id,
    UserId,
    CategoryId,
    Month,
    Year,
    LimitAmount,
    Spent,
    #[sea_orm(iden = "alert_at_70")]
    AlertAt70,
    #[sea_orm(iden = "alert_at_90")]
    AlertAt90,
    #[sea_orm(iden = "alert_at_100")]
    AlertAt100,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Goals {
    Table,
    Id,
    UserId,
    Name,
    Description,
    TargetAmount,
    CurrentAmount,
    Deadline,
    Icon,
    Color,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GoalContributions {
    Table,
    Id,
    GoalId,
    Amount,
    Date,
    Notes,
    CreatedAt,
}

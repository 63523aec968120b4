//! Budget repository.
//!
//! The stored `spent` column is informational only: status figures are always
//! re-aggregated from PAID expense transactions.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use lyvinx_core::budget::{BudgetError as BudgetRuleError, BudgetPeriod, BudgetService, BudgetUsage};
use lyvinx_core::reports::YearMonth;
use lyvinx_shared::types::{BudgetId, CategoryId, UserId};

use super::{category, unique_violation};
use crate::entities::{
    budgets, categories,
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found or owned by someone else.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Category missing or not visible to the owner.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// A budget already exists for this category and month.
    #[error("Budget already exists for this category and period")]
    Duplicate,

    /// Budget rule violation.
    #[error(transparent)]
    Rule(#[from] BudgetRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Category tracked.
    pub category_id: CategoryId,
    /// Month and year.
    pub period: BudgetPeriod,
    /// Spending limit, strictly positive.
    pub limit: Decimal,
    /// Alert at 70%.
    pub alert_at_70: bool,
    /// Alert at 90%.
    pub alert_at_90: bool,
    /// Alert at 100%.
    pub alert_at_100: bool,
}

/// Input for updating a budget. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// Spending limit.
    pub limit: Option<Decimal>,
    /// Alert at 70%.
    pub alert_at_70: Option<bool>,
    /// Alert at 90%.
    pub alert_at_90: Option<bool>,
    /// Alert at 100%.
    pub alert_at_100: Option<bool>,
}

/// A budget with its category.
#[derive(Debug, Clone)]
pub struct BudgetWithCategory {
    /// The budget.
    pub budget: budgets::Model,
    /// Its category.
    pub category: Option<categories::Model>,
}

/// Live status of one budget.
#[derive(Debug, Clone)]
pub struct BudgetStatus {
    /// The budget.
    pub budget: budgets::Model,
    /// Category name.
    pub category_name: String,
    /// Re-aggregated usage.
    pub usage: BudgetUsage,
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's budgets for a month with their categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner: UserId,
        period: BudgetPeriod,
    ) -> Result<Vec<BudgetWithCategory>, DbErr> {
        let rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .filter(budgets::Column::Month.eq(month_column(period)))
            .filter(budgets::Column::Year.eq(period.year()))
            .order_by_asc(budgets::Column::CreatedAt)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(budget, category)| BudgetWithCategory { budget, category })
            .collect())
    }

    /// Computes live status for each of the owner's budgets in a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn status(&self, owner: UserId, period: BudgetPeriod) -> Result<Vec<BudgetStatus>, DbErr> {
        let budgets = self.list(owner, period).await?;
        let spent = self.spent_by_category(owner, period).await?;

        Ok(budgets
            .into_iter()
            .map(|BudgetWithCategory { budget, category }| {
                let spent = spent.get(&budget.category_id).copied().unwrap_or_default();
                BudgetStatus {
                    usage: BudgetService::usage(budget.limit_amount, spent),
                    category_name: category.map(|c| c.name).unwrap_or_default(),
                    budget,
                }
            })
            .collect())
    }

    /// Sum of the owner's PAID expenses per category in a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn spent_by_category(
        &self,
        owner: UserId,
        period: BudgetPeriod,
    ) -> Result<HashMap<Uuid, Decimal>, DbErr> {
        let range = YearMonth {
            year: period.year(),
            month: period.month(),
        }
        .range();

        let rows: Vec<(Uuid, Decimal)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::CategoryId)
            .column(transactions::Column::Amount)
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .filter(transactions::Column::TransactionType.eq(TransactionType::Expense))
            .filter(transactions::Column::Status.eq(TransactionStatus::Paid))
            .filter(transactions::Column::Date.between(range.start, range.end))
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut totals: HashMap<Uuid, Decimal> = HashMap::new();
        for (category_id, amount) in rows {
            *totals.entry(category_id).or_default() += amount;
        }
        Ok(totals)
    }

    /// Creates a budget with `spent = 0`.
    ///
    /// # Errors
    ///
    /// `Rule(NonPositiveLimit)`, `CategoryNotFound`, `Duplicate`, or `Database`.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        BudgetService::validate_limit(input.limit)?;

        category::find_visible(&self.db, owner, input.category_id)
            .await?
            .ok_or(BudgetError::CategoryNotFound(input.category_id.into_inner()))?;

        let existing = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .filter(budgets::Column::CategoryId.eq(input.category_id.into_inner()))
            .filter(budgets::Column::Month.eq(month_column(input.period)))
            .filter(budgets::Column::Year.eq(input.period.year()))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(BudgetError::Duplicate);
        }

        let now = chrono::Utc::now().into();
        let model = budgets::ActiveModel {
            id: Set(BudgetId::new().into_inner()),
            user_id: Set(owner.into_inner()),
            category_id: Set(input.category_id.into_inner()),
            month: Set(month_column(input.period)),
            year: Set(input.period.year()),
            limit_amount: Set(input.limit),
            spent: Set(Decimal::ZERO),
            alert_at_70: Set(input.alert_at_70),
            alert_at_90: Set(input.alert_at_90),
            alert_at_100: Set(input.alert_at_100),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await.map_err(|err| {
            if unique_violation(&err).is_some() {
                BudgetError::Duplicate
            } else {
                BudgetError::Database(err)
            }
        })
    }

    /// Updates the limit and alert flags.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Rule(NonPositiveLimit)`, or `Database`.
    pub async fn update(
        &self,
        owner: UserId,
        id: BudgetId,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let existing = self.find(owner, id).await?;

        let mut active: budgets::ActiveModel = existing.into();
        if let Some(limit) = input.limit {
            BudgetService::validate_limit(limit)?;
            active.limit_amount = Set(limit);
        }
        if let Some(flag) = input.alert_at_70 {
            active.alert_at_70 = Set(flag);
        }
        if let Some(flag) = input.alert_at_90 {
            active.alert_at_90 = Set(flag);
        }
        if let Some(flag) = input.alert_at_100 {
            active.alert_at_100 = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn delete(&self, owner: UserId, id: BudgetId) -> Result<(), BudgetError> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id.into_inner()))
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    async fn find(&self, owner: UserId, id: BudgetId) -> Result<budgets::Model, BudgetError> {
        budgets::Entity::find_by_id(id.into_inner())
            .filter(budgets::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id.into_inner()))
    }
}

/// Months are validated to 1..=12 by `BudgetPeriod`.
fn month_column(period: BudgetPeriod) -> i32 {
    i32::try_from(period.month()).unwrap_or(0)
}

//! Savings goal repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use lyvinx_core::goal::{GoalError as GoalRuleError, GoalService};
use lyvinx_shared::types::{GoalId, UserId};

use crate::entities::{goal_contributions, goals, sea_orm_active_enums::GoalStatus};

/// Contributions shown per goal in listings.
pub const RECENT_CONTRIBUTIONS: u64 = 5;

/// Error types for goal operations.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    /// Goal not found or owned by someone else.
    #[error("Goal not found: {0}")]
    NotFound(Uuid),

    /// Goal rule violation.
    #[error(transparent)]
    Rule(#[from] GoalRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    /// Name.
    pub name: String,
    /// Free text.
    pub description: Option<String>,
    /// Target, strictly positive.
    pub target_amount: Decimal,
    /// Amount already saved.
    pub current_amount: Decimal,
    /// Target date.
    pub deadline: Option<NaiveDate>,
    /// Icon identifier.
    pub icon: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
}

/// Input for updating a goal. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateGoalInput {
    /// Name.
    pub name: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Target.
    pub target_amount: Option<Decimal>,
    /// Amount saved.
    pub current_amount: Option<Decimal>,
    /// Target date.
    pub deadline: Option<NaiveDate>,
    /// Status; COMPLETED is rejected.
    pub status: Option<GoalStatus>,
    /// Icon identifier.
    pub icon: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
}

/// Input for a contribution.
#[derive(Debug, Clone)]
pub struct ContributionInput {
    /// Amount, strictly positive.
    pub amount: Decimal,
    /// Business date.
    pub date: NaiveDate,
    /// Notes.
    pub notes: Option<String>,
}

/// A goal with contributions, newest first.
#[derive(Debug, Clone)]
pub struct GoalWithContributions {
    /// The goal.
    pub goal: goals::Model,
    /// Contributions.
    pub contributions: Vec<goal_contributions::Model>,
}

impl GoalWithContributions {
    /// Progress towards the target in percent.
    #[must_use]
    pub fn progress(&self) -> Decimal {
        GoalService::progress(self.goal.current_amount, self.goal.target_amount)
    }
}

/// Goal repository.
#[derive(Debug, Clone)]
pub struct GoalRepository {
    db: DatabaseConnection,
}

impl GoalRepository {
    /// Creates a new goal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's goals, newest first, each with its latest contributions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<GoalWithContributions>, DbErr> {
        let goals = goals::Entity::find()
            .filter(goals::Column::UserId.eq(owner.into_inner()))
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(goals.len());
        for goal in goals {
            let contributions = self.contributions(goal.id, Some(RECENT_CONTRIBUTIONS)).await?;
            result.push(GoalWithContributions {
                goal,
                contributions,
            });
        }
        Ok(result)
    }

    /// Finds a goal with all of its contributions.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn find(&self, owner: UserId, id: GoalId) -> Result<GoalWithContributions, GoalError> {
        let goal = self.find_model(owner, id).await?;
        let contributions = self.contributions(goal.id, None).await?;
        Ok(GoalWithContributions {
            goal,
            contributions,
        })
    }

    /// Creates a goal. It starts COMPLETED if the current amount already
    /// reaches the target.
    ///
    /// # Errors
    ///
    /// `Rule` for invalid amounts, `Database` otherwise.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateGoalInput,
    ) -> Result<goals::Model, GoalError> {
        GoalService::validate_amounts(input.target_amount, input.current_amount)?;

        let status = if input.current_amount >= input.target_amount {
            GoalStatus::Completed
        } else {
            GoalStatus::InProgress
        };

        let now = chrono::Utc::now().into();
        let model = goals::ActiveModel {
            id: Set(GoalId::new().into_inner()),
            user_id: Set(owner.into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            target_amount: Set(input.target_amount),
            current_amount: Set(input.current_amount),
            deadline: Set(input.deadline),
            icon: Set(input.icon),
            color: Set(input.color),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Updates a goal.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Rule(CompletionIsDerived)` for a COMPLETED status edit,
    /// `Rule` for invalid amounts, or `Database`.
    pub async fn update(
        &self,
        owner: UserId,
        id: GoalId,
        input: UpdateGoalInput,
    ) -> Result<goals::Model, GoalError> {
        if let Some(status) = input.status {
            GoalService::validate_status_edit(status.into())?;
        }
        let existing = self.find_model(owner, id).await?;
        GoalService::validate_amounts(
            input.target_amount.unwrap_or(existing.target_amount),
            input.current_amount.unwrap_or(existing.current_amount),
        )?;

        let mut active: goals::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(target) = input.target_amount {
            active.target_amount = Set(target);
        }
        if let Some(current) = input.current_amount {
            active.current_amount = Set(current);
        }
        if let Some(deadline) = input.deadline {
            active.deadline = Set(Some(deadline));
        }
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(Some(icon));
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a goal and its contributions.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn delete(&self, owner: UserId, id: GoalId) -> Result<(), GoalError> {
        let result = goals::Entity::delete_many()
            .filter(goals::Column::Id.eq(id.into_inner()))
            .filter(goals::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(GoalError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    /// Records a contribution and raises the goal's current amount in one
    /// transaction. The goal completes once the target is reached.
    ///
    /// # Errors
    ///
    /// `Rule(NonPositiveContribution)`, `NotFound`, or `Database`; on error
    /// nothing is written.
    pub async fn contribute(
        &self,
        owner: UserId,
        id: GoalId,
        input: ContributionInput,
    ) -> Result<(goals::Model, goal_contributions::Model), GoalError> {
        let txn = self.db.begin().await?;

        let goal = goals::Entity::find_by_id(id.into_inner())
            .filter(goals::Column::UserId.eq(owner.into_inner()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(GoalError::NotFound(id.into_inner()))?;

        let outcome = GoalService::contribute(
            goal.current_amount,
            goal.target_amount,
            goal.status.into(),
            input.amount,
        )?;

        let contribution = goal_contributions::ActiveModel {
            id: Set(Uuid::new_v4()),
            goal_id: Set(goal.id),
            amount: Set(input.amount),
            date: Set(input.date),
            notes: Set(input.notes),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        goals::Entity::update_many()
            .col_expr(
                goals::Column::CurrentAmount,
                Expr::col(goals::Column::CurrentAmount).add(input.amount),
            )
            .col_expr(
                goals::Column::Status,
                Expr::value(GoalStatus::from(outcome.status)),
            )
            .col_expr(goals::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(goals::Column::Id.eq(goal.id))
            .exec(&txn)
            .await?;

        let updated = goals::Entity::find_by_id(goal.id)
            .one(&txn)
            .await?
            .ok_or(GoalError::NotFound(goal.id))?;

        txn.commit().await?;
        Ok((updated, contribution))
    }

    async fn find_model(&self, owner: UserId, id: GoalId) -> Result<goals::Model, GoalError> {
        goals::Entity::find_by_id(id.into_inner())
            .filter(goals::Column::UserId.eq(owner.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(GoalError::NotFound(id.into_inner()))
    }

    async fn contributions(
        &self,
        goal_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<goal_contributions::Model>, DbErr> {
        goal_contributions::Entity::find()
            .filter(goal_contributions::Column::GoalId.eq(goal_id))
            .order_by_desc(goal_contributions::Column::Date)
            .order_by_desc(goal_contributions::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }
}

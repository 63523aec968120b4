//! Report repository: loads an owner's transactions and hands them to the
//! pure aggregations in `lyvinx_core::reports`.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use lyvinx_core::reports::{
    CategoryRef, CategoryReport, DateRange, EvolutionPoint, MonthlySummary, PaymentMethodReport,
    ReportError as ReportRuleError, ReportService, ReportTransaction, YearMonth,
};
use lyvinx_shared::types::{CategoryId, TransactionId, UserId};

use crate::entities::{categories, transactions};

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Invalid period or window.
    #[error(transparent)]
    Rule(#[from] ReportRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Income, expense, balance and rankings for a date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn summary(&self, owner: UserId, range: DateRange) -> Result<MonthlySummary, DbErr> {
        let rows = self.load(owner, range).await?;
        Ok(ReportService::monthly_summary(range, &rows))
    }

    /// Expense breakdown by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn by_category(
        &self,
        owner: UserId,
        range: DateRange,
    ) -> Result<Vec<CategoryReport>, DbErr> {
        let rows = self.load(owner, range).await?;
        Ok(ReportService::expenses_by_category(range, &rows))
    }

    /// Expense breakdown by payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn by_payment_method(
        &self,
        owner: UserId,
        range: DateRange,
    ) -> Result<Vec<PaymentMethodReport>, DbErr> {
        let rows = self.load(owner, range).await?;
        Ok(ReportService::expenses_by_payment_method(range, &rows))
    }

    /// Monthly series of `months` months ending at `current`, oldest first.
    ///
    /// # Errors
    ///
    /// `Rule(InvalidWindow)` or `Database`.
    pub async fn evolution(
        &self,
        owner: UserId,
        current: YearMonth,
        months: u32,
    ) -> Result<Vec<EvolutionPoint>, ReportError> {
        ReportService::validate_window(months)?;
        let range = ReportService::evolution_range(current, months);
        let rows = self.load(owner, range).await?;
        Ok(ReportService::evolution(current, months, &rows))
    }

    /// Loads the owner's transactions dated inside `range`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn load(
        &self,
        owner: UserId,
        range: DateRange,
    ) -> Result<Vec<ReportTransaction>, DbErr> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .filter(transactions::Column::Date.between(range.start, range.end))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(to_report_row).collect())
    }
}

fn to_report_row(
    (tx, category): (transactions::Model, Option<categories::Model>),
) -> ReportTransaction {
    let category = category.map_or_else(
        || CategoryRef {
            id: CategoryId::from(tx.category_id),
            name: String::new(),
            icon: None,
            color: None,
        },
        |c| CategoryRef {
            id: CategoryId::from(c.id),
            name: c.name,
            icon: c.icon,
            color: c.color,
        },
    );

    ReportTransaction {
        id: TransactionId::from(tx.id),
        description: tx.description,
        amount: tx.amount,
        date: tx.date,
        transaction_type: tx.transaction_type.into(),
        status: tx.status.into(),
        payment_method: tx.payment_method.map(Into::into),
        category,
    }
}

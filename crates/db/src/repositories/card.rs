//! Credit card repository.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use lyvinx_core::card::{self, CardError as CardRuleError, InvoicePeriod};
use lyvinx_shared::types::{CardId, UserId};

use crate::entities::{credit_cards, transactions};

/// Error types for card operations.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// Card not found or owned by someone else.
    #[error("Card not found: {0}")]
    NotFound(Uuid),

    /// Card rule violation.
    #[error(transparent)]
    Rule(#[from] CardRuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a card.
#[derive(Debug, Clone)]
pub struct CreateCardInput {
    /// Card name.
    pub name: String,
    /// Last four digits.
    pub last_digits: String,
    /// Credit limit, strictly positive.
    pub limit: Decimal,
    /// Invoice closing day, 1..=31.
    pub closing_day: u32,
    /// Payment due day, 1..=31.
    pub due_day: u32,
    /// Card brand.
    pub brand: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
}

/// Input for updating a card. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCardInput {
    /// Card name.
    pub name: Option<String>,
    /// Credit limit.
    pub limit: Option<Decimal>,
    /// Invoice closing day.
    pub closing_day: Option<u32>,
    /// Payment due day.
    pub due_day: Option<u32>,
    /// Card brand.
    pub brand: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Whether the card is listed.
    pub is_active: Option<bool>,
}

/// One month's invoice of a card.
#[derive(Debug, Clone)]
pub struct CardInvoice {
    /// The card.
    pub card: credit_cards::Model,
    /// Invoice month, 1-based.
    pub month: u32,
    /// Invoice year.
    pub year: i32,
    /// Window and due date.
    pub period: InvoicePeriod,
    /// Sum of the transactions in the window.
    pub total: Decimal,
    /// Transactions in the window, newest first.
    pub transactions: Vec<transactions::Model>,
}

/// Credit card repository.
#[derive(Debug, Clone)]
pub struct CardRepository {
    db: DatabaseConnection,
}

impl CardRepository {
    /// Creates a new card repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's active cards by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<credit_cards::Model>, DbErr> {
        credit_cards::Entity::find()
            .filter(credit_cards::Column::UserId.eq(owner.into_inner()))
            .filter(credit_cards::Column::IsActive.eq(true))
            .order_by_asc(credit_cards::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds one of the owner's cards.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn find(&self, owner: UserId, id: CardId) -> Result<credit_cards::Model, CardError> {
        find_owned(&self.db, owner, id)
            .await?
            .ok_or(CardError::NotFound(id.into_inner()))
    }

    /// Creates a card.
    ///
    /// # Errors
    ///
    /// `Rule` for invalid digits or days, `Database` otherwise.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateCardInput,
    ) -> Result<credit_cards::Model, CardError> {
        card::validate_last_digits(&input.last_digits)?;
        card::validate_day(input.closing_day)?;
        card::validate_day(input.due_day)?;

        let now = chrono::Utc::now().into();
        let model = credit_cards::ActiveModel {
            id: Set(CardId::new().into_inner()),
            user_id: Set(owner.into_inner()),
            name: Set(input.name),
            last_digits: Set(input.last_digits),
            credit_limit: Set(input.limit),
            closing_day: Set(day_column(input.closing_day)),
            due_day: Set(day_column(input.due_day)),
            brand: Set(input.brand),
            color: Set(input.color),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Updates a card.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Rule` for invalid days, or `Database`.
    pub async fn update(
        &self,
        owner: UserId,
        id: CardId,
        input: UpdateCardInput,
    ) -> Result<credit_cards::Model, CardError> {
        let existing = self.find(owner, id).await?;

        let mut active: credit_cards::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(limit) = input.limit {
            active.credit_limit = Set(limit);
        }
        if let Some(day) = input.closing_day {
            card::validate_day(day)?;
            active.closing_day = Set(day_column(day));
        }
        if let Some(day) = input.due_day {
            card::validate_day(day)?;
            active.due_day = Set(day_column(day));
        }
        if let Some(brand) = input.brand {
            active.brand = Set(Some(brand));
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a card. Linked transactions keep existing without a card.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn delete(&self, owner: UserId, id: CardId) -> Result<(), CardError> {
        let result = credit_cards::Entity::delete_many()
            .filter(credit_cards::Column::Id.eq(id.into_inner()))
            .filter(credit_cards::Column::UserId.eq(owner.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CardError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    /// Builds the invoice of (`month`, `year`).
    ///
    /// # Errors
    ///
    /// `NotFound`, `Rule(InvalidMonth)`, or `Database`.
    pub async fn invoice(
        &self,
        owner: UserId,
        id: CardId,
        month: u32,
        year: i32,
    ) -> Result<CardInvoice, CardError> {
        let card = self.find(owner, id).await?;
        let period = card::invoice_period(
            u32::try_from(card.closing_day).unwrap_or(0),
            u32::try_from(card.due_day).unwrap_or(0),
            month,
            year,
        )?;

        let transactions = transactions::Entity::find()
            .filter(transactions::Column::CreditCardId.eq(card.id))
            .filter(transactions::Column::UserId.eq(owner.into_inner()))
            .filter(transactions::Column::Date.between(period.start, period.closing))
            .order_by_desc(transactions::Column::Date)
            .all(&self.db)
            .await?;

        let total = transactions.iter().map(|t| t.amount).sum();

        Ok(CardInvoice {
            card,
            month,
            year,
            period,
            total,
            transactions,
        })
    }
}

/// Loads a card only if `owner` holds it.
pub(crate) async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    id: CardId,
) -> Result<Option<credit_cards::Model>, DbErr> {
    credit_cards::Entity::find_by_id(id.into_inner())
        .filter(credit_cards::Column::UserId.eq(owner.into_inner()))
        .one(conn)
        .await
}

/// Days are validated to 1..=31 before reaching the column.
fn day_column(day: u32) -> i32 {
    i32::try_from(day).unwrap_or(i32::MAX)
}

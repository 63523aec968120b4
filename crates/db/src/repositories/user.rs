//! User repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use lyvinx_shared::types::UserId;

use super::unique_violation;

use crate::entities::{sea_orm_active_enums::UserStatus, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email already registered.
    #[error("Email already in use")]
    EmailInUse,

    /// CPF already registered.
    #[error("CPF already in use")]
    CpfInUse,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Argon2 hash of the password.
    pub password_hash: String,
    /// Normalized CPF digits.
    pub cpf: Option<String>,
    /// Initial status.
    pub status: UserStatus,
}

/// Input for updating a profile. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// Display name.
    pub name: Option<String>,
    /// Normalized CPF digits.
    pub cpf: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// `EmailInUse` or `CpfInUse` on conflicts, `Database` otherwise.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        if self.email_exists(&input.email).await? {
            return Err(UserError::EmailInUse);
        }
        if let Some(cpf) = &input.cpf {
            if self.cpf_taken(cpf, None).await? {
                return Err(UserError::CpfInUse);
            }
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            cpf: Set(input.cpf),
            avatar: Set(None),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await.map_err(conflict_or_database)
    }

    /// Updates name, CPF and avatar.
    ///
    /// # Errors
    ///
    /// `NotFound`, `CpfInUse` when another user holds the CPF, or `Database`.
    pub async fn update_profile(
        &self,
        id: UserId,
        input: UpdateProfileInput,
    ) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.into_inner()))?;

        if let Some(cpf) = &input.cpf {
            if self.cpf_taken(cpf, Some(id)).await? {
                return Err(UserError::CpfInUse);
            }
        }

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(cpf) = input.cpf {
            active.cpf = Set(Some(cpf));
        }
        if let Some(avatar) = input.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(conflict_or_database)
    }

    /// Replaces the stored password hash.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn update_password(&self, id: UserId, password_hash: String) -> Result<(), UserError> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::PasswordHash,
                sea_orm::sea_query::Expr::value(password_hash),
            )
            .col_expr(
                users::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now()),
            )
            .filter(users::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    /// Sets the user status.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn update_status(
        &self,
        id: UserId,
        status: UserStatus,
    ) -> Result<users::Model, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.into_inner()))?;

        let mut active: users::ActiveModel = user.into();
        active.status = Set(status);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a user; owned records go with it through cascading keys.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let result = users::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id.into_inner()));
        }
        Ok(())
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if a CPF belongs to a user other than `except`.
    async fn cpf_taken(&self, cpf: &str, except: Option<UserId>) -> Result<bool, DbErr> {
        let mut query = users::Entity::find().filter(users::Column::Cpf.eq(cpf));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id.into_inner()));
        }

        Ok(query.count(&self.db).await? > 0)
    }
}

/// Maps a unique-index violation onto the column it guards.
fn conflict_or_database(err: DbErr) -> UserError {
    match unique_violation(&err) {
        Some(message) if message.contains("cpf") => UserError::CpfInUse,
        Some(_) => UserError::EmailInUse,
        None => UserError::Database(err),
    }
}

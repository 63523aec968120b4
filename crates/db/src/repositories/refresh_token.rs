//! Refresh token repository.
//!
//! Tokens are stored as SHA-256 hex digests; the raw token never reaches the
//! database.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use lyvinx_shared::types::UserId;

use crate::entities::refresh_tokens;

/// Refresh token repository.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    db: DatabaseConnection,
}

impl RefreshTokenRepository {
    /// Creates a new refresh token repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a refresh token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Stores a new refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<refresh_tokens::Model, DbErr> {
        refresh_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.into_inner()),
            token_hash: Set(Self::hash_token(token)),
            expires_at: Set(expires_at.into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
    }

    /// Finds a stored token by its raw value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<refresh_tokens::Model>, DbErr> {
        refresh_tokens::Entity::find()
            .filter(refresh_tokens::Column::TokenHash.eq(Self::hash_token(token)))
            .one(&self.db)
            .await
    }

    /// Replaces a stored token with a new one in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails; neither is applied then.
    pub async fn rotate(
        &self,
        old_id: Uuid,
        user_id: UserId,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<refresh_tokens::Model, DbErr> {
        let txn = self.db.begin().await?;

        refresh_tokens::Entity::delete_by_id(old_id).exec(&txn).await?;
        let created = refresh_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.into_inner()),
            token_hash: Set(Self::hash_token(new_token)),
            expires_at: Set(expires_at.into()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Deletes a token by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbErr> {
        refresh_tokens::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Deletes a token by its raw value. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_by_token(&self, token: &str) -> Result<bool, DbErr> {
        let result = refresh_tokens::Entity::delete_many()
            .filter(refresh_tokens::Column::TokenHash.eq(Self::hash_token(token)))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Removes expired tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn cleanup_expired(&self) -> Result<u64, DbErr> {
        let result = refresh_tokens::Entity::delete_many()
            .filter(refresh_tokens::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

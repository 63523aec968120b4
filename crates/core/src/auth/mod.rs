//! Authentication rules.
//!
//! This module provides:
//! - Password policy and Argon2id hashing
//! - CPF validation
//! - Account status gating for sign-in and protected routes

mod cpf;
mod password;

pub use cpf::{is_valid_cpf, normalize_cpf};
pub use password::{
    MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, PasswordError, hash_password, validate_password_policy,
    verify_password,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Awaiting activation.
    Pending,
    /// Allowed to sign in.
    Active,
    /// Disabled.
    Inactive,
}

impl std::str::FromStr for UserStatus {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(AuthError::UnknownStatus(s.to_string())),
        }
    }
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password did not match.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Account awaits activation.
    #[error("account is pending activation")]
    AccountPending,

    /// Account was deactivated.
    #[error("account has been deactivated")]
    AccountInactive,

    /// Malformed CPF.
    #[error("invalid CPF")]
    InvalidCpf,

    /// Status name not recognized.
    #[error("unknown user status: {0}")]
    UnknownStatus(String),

    /// Password hashing or policy failure.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl UserStatus {
    /// Checks that a user with this status may sign in or call protected routes.
    ///
    /// # Errors
    ///
    /// `AccountPending` or `AccountInactive`.
    pub fn ensure_can_authenticate(self) -> Result<(), AuthError> {
        match self {
            Self::Active => Ok(()),
            Self::Pending => Err(AuthError::AccountPending),
            Self::Inactive => Err(AuthError::AccountInactive),
        }
    }
}

/// Validates an optional CPF, returning its normalized digits.
///
/// # Errors
///
/// `InvalidCpf` when present but malformed.
pub fn validate_optional_cpf(cpf: Option<&str>) -> Result<Option<String>, AuthError> {
    match cpf.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(None),
        Some(c) if is_valid_cpf(c) => Ok(Some(normalize_cpf(c))),
        Some(_) => Err(AuthError::InvalidCpf),
    }
}

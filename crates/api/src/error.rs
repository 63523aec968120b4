//! Maps domain and repository errors onto the HTTP error envelope.
//!
//! Every failure leaves a handler as an [`ApiError`], which renders as
//! `{ "success": false, "error": CODE, "message": ..., "errors"?: [...] }`
//! with the status code of the wrapped [`AppError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use tracing::error;
use validator::ValidationErrors;

use lyvinx_core::auth::{AuthError, PasswordError};
use lyvinx_core::budget::BudgetError as BudgetRuleError;
use lyvinx_core::card::CardError as CardRuleError;
use lyvinx_core::goal::GoalError as GoalRuleError;
use lyvinx_core::ledger::LedgerError;
use lyvinx_core::reports::ReportError as ReportRuleError;
use lyvinx_db::repositories::{
    AccountError, BudgetError, CardError, CategoryError, GoalError, ReportError,
    TransactionError, UserError,
};
use lyvinx_shared::{AppError, FieldError, JwtError};

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by handlers and extractors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    errors: &'a [FieldError],
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // internal details stay in the logs
        let message = match &self.0 {
            AppError::Database(detail) | AppError::Internal(detail) => {
                error!(error = %detail, code = self.0.error_code(), "request failed");
                "An internal error occurred".to_string()
            }
            AppError::Unauthorized(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m)
            | AppError::InvalidReference(m)
            | AppError::InsufficientFunds(m)
            | AppError::Conflict(m) => m.clone(),
            AppError::Validation { message, .. } => message.clone(),
        };

        let body = ErrorBody {
            success: false,
            error: self.0.error_code(),
            message,
            errors: self.0.field_errors(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

fn invalid_field(field: &str, message: impl Into<String>) -> ApiError {
    let message = message.into();
    ApiError(AppError::Validation {
        message: message.clone(),
        fields: vec![FieldError::new(field, message)],
    })
}

fn not_found(what: &str) -> ApiError {
    ApiError(AppError::NotFound(format!("{what} not found")))
}

/// `snake_case` field name as clients see it.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = camel_case(&field);
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map_or_else(|| format!("invalid value ({})", e.code), ToString::to_string);
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        Self(AppError::Validation {
            message: "Validation failed".to_string(),
            fields,
        })
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        let message = match err {
            JwtError::Expired => "Token has expired",
            _ => "Invalid or malformed token",
        };
        Self(AppError::Unauthorized(message.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::PolicyViolation => invalid_field("password", err.to_string()),
            PasswordError::HashError(_) | PasswordError::InvalidHash => {
                Self(AppError::Internal(err.to_string()))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self(AppError::Unauthorized(err.to_string())),
            AuthError::AccountPending | AuthError::AccountInactive => {
                Self(AppError::Forbidden(err.to_string()))
            }
            AuthError::InvalidCpf => invalid_field("cpf", err.to_string()),
            AuthError::UnknownStatus(_) => invalid_field("status", err.to_string()),
            AuthError::Password(e) => e.into(),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NonPositiveAmount => invalid_field("amount", err.to_string()),
            LedgerError::MissingRecurrenceFrequency => {
                invalid_field("recurrenceFrequency", err.to_string())
            }
            LedgerError::RecurrenceEndBeforeStart => invalid_field("recurrenceEnd", err.to_string()),
            LedgerError::InstallmentOutOfRange { .. } => {
                invalid_field("installmentNumber", err.to_string())
            }
            LedgerError::SameAccount | LedgerError::AccountNotFound(_) => {
                Self(AppError::InvalidReference(err.to_string()))
            }
            LedgerError::InsufficientFunds { .. } => {
                Self(AppError::InsufficientFunds(err.to_string()))
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => not_found("User"),
            UserError::EmailInUse | UserError::CpfInUse => Self(AppError::Conflict(err.to_string())),
            UserError::Database(e) => e.into(),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::NotFound(_) => not_found("Account"),
            AccountError::Ledger(e) => e.into(),
            AccountError::Database(e) => e.into(),
        }
    }
}

impl From<CardRuleError> for ApiError {
    fn from(err: CardRuleError) -> Self {
        let field = match err {
            CardRuleError::InvalidDay(_) => "day",
            CardRuleError::InvalidMonth { .. } => "month",
            CardRuleError::InvalidLastDigits => "lastDigits",
        };
        invalid_field(field, err.to_string())
    }
}

impl From<CardError> for ApiError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::NotFound(_) => not_found("Card"),
            CardError::Rule(e) => e.into(),
            CardError::Database(e) => e.into(),
        }
    }
}

impl From<CategoryError> for ApiError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => not_found("Category"),
            CategoryError::ParentNotFound(_)
            | CategoryError::SelfParent
            | CategoryError::NestedParent(_) => Self(AppError::InvalidReference(err.to_string())),
            CategoryError::DuplicateName(_)
            | CategoryError::HasTransactions(_)
            | CategoryError::HasSubcategories(_)
            | CategoryError::ParentHasChildren(_) => Self(AppError::Conflict(err.to_string())),
            CategoryError::Database(e) => e.into(),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::NotFound(_) => not_found("Transaction"),
            TransactionError::CategoryNotFound(_)
            | TransactionError::CardNotFound(_)
            | TransactionError::AccountNotFound(_) => {
                Self(AppError::InvalidReference(err.to_string()))
            }
            TransactionError::Ledger(e) => e.into(),
            TransactionError::Database(e) => e.into(),
        }
    }
}

impl From<BudgetRuleError> for ApiError {
    fn from(err: BudgetRuleError) -> Self {
        let field = match err {
            BudgetRuleError::InvalidMonth(_) => "month",
            BudgetRuleError::InvalidYear(_) => "year",
            BudgetRuleError::NonPositiveLimit => "limit",
        };
        invalid_field(field, err.to_string())
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => not_found("Budget"),
            BudgetError::CategoryNotFound(_) => Self(AppError::InvalidReference(err.to_string())),
            BudgetError::Duplicate => Self(AppError::Conflict(err.to_string())),
            BudgetError::Rule(e) => e.into(),
            BudgetError::Database(e) => e.into(),
        }
    }
}

impl From<GoalRuleError> for ApiError {
    fn from(err: GoalRuleError) -> Self {
        let field = match err {
            GoalRuleError::NonPositiveTarget => "targetAmount",
            GoalRuleError::NegativeCurrentAmount => "currentAmount",
            GoalRuleError::NonPositiveContribution => "amount",
            GoalRuleError::CompletionIsDerived => "status",
        };
        invalid_field(field, err.to_string())
    }
}

impl From<GoalError> for ApiError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::NotFound(_) => not_found("Goal"),
            GoalError::Rule(e) => e.into(),
            GoalError::Database(e) => e.into(),
        }
    }
}

impl From<ReportRuleError> for ApiError {
    fn from(err: ReportRuleError) -> Self {
        let field = match err {
            ReportRuleError::InvalidDateRange { .. } => "startDate",
            ReportRuleError::InvalidMonth { .. } => "month",
            ReportRuleError::InvalidWindow { .. } => "months",
        };
        invalid_field(field, err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Rule(e) => e.into(),
            ReportError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("closing_day"), "closingDay");
        assert_eq!(camel_case("alert_at_70"), "alertAt70");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn test_ledger_mapping() {
        let insufficient: ApiError = LedgerError::InsufficientFunds {
            available: dec!(10),
            requested: dec!(20),
        }
        .into();
        assert_eq!(insufficient.0.status_code(), 400);
        assert_eq!(insufficient.0.error_code(), "INSUFFICIENT_FUNDS");

        let same: ApiError = LedgerError::SameAccount.into();
        assert_eq!(same.0.error_code(), "INVALID_REFERENCE");

        let missing: ApiError = LedgerError::AccountNotFound(uuid::Uuid::nil()).into();
        assert_eq!(missing.0.status_code(), 400);
        assert_eq!(missing.0.error_code(), "INVALID_REFERENCE");

        let amount: ApiError = LedgerError::NonPositiveAmount.into();
        assert_eq!(amount.0.field_errors()[0].field, "amount");
    }

    #[test]
    fn test_auth_mapping() {
        let pending: ApiError = AuthError::AccountPending.into();
        assert_eq!(pending.0.status_code(), 403);
        let bad: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(bad.0.status_code(), 401);
    }

    #[test]
    fn test_conflicts() {
        let dup: ApiError = CategoryError::DuplicateName("Casa".into()).into();
        assert_eq!(dup.0.status_code(), 409);
        let busy: ApiError = CategoryError::HasTransactions(3).into();
        assert_eq!(busy.0.status_code(), 409);
        let budget: ApiError = BudgetError::Duplicate.into();
        assert_eq!(budget.0.status_code(), 409);
    }
}

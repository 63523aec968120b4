//! Report routes.
//!
//! Summary and breakdowns take either `startDate`/`endDate` or `month`/`year`;
//! without either they cover the current month.

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use validator::Validate;

use crate::{
    AppState, error::ApiResult, extractors::ValidatedQuery, middleware::AuthUser, response,
};
use lyvinx_core::reports::{DateRange, YearMonth};
use lyvinx_db::ReportRepository;

/// Default length of the evolution series.
const DEFAULT_EVOLUTION_MONTHS: u32 = 6;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/summary", get(summary))
        .route("/reports/by-category", get(by_category))
        .route("/reports/by-payment-method", get(by_payment_method))
        .route("/reports/evolution", get(evolution))
}

/// Period selector for summary and breakdowns.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    /// Explicit dates win over month/year.
    fn range(&self) -> ApiResult<DateRange> {
        let today = chrono::Local::now().date_naive();
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Ok(DateRange::new(start, end)?),
            (Some(start), None) => Ok(DateRange::new(start, YearMonth::of(start).last_day())?),
            (None, Some(end)) => Ok(DateRange::new(YearMonth::of(end).first_day(), end)?),
            (None, None) => {
                let month = YearMonth::new(
                    self.year.unwrap_or_else(|| today.year()),
                    self.month.unwrap_or_else(|| today.month()),
                )?;
                Ok(month.range())
            }
        }
    }
}

/// Parameters of the evolution series.
#[derive(Debug, Deserialize, Validate)]
pub struct EvolutionQuery {
    /// Number of months, ending at the current one (default: 6).
    pub months: Option<u32>,
}

/// GET /reports/summary - Income, expense, balance and rankings.
async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new((*state.db).clone())
        .summary(auth.user_id(), query.range()?)
        .await?;

    Ok(response::ok(report))
}

/// GET /reports/by-category - Expenses grouped by category.
async fn by_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new((*state.db).clone())
        .by_category(auth.user_id(), query.range()?)
        .await?;

    Ok(response::ok(report))
}

/// GET /reports/by-payment-method - Expenses grouped by payment method.
async fn by_payment_method(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<PeriodQuery>,
) -> ApiResult<impl IntoResponse> {
    let report = ReportRepository::new((*state.db).clone())
        .by_payment_method(auth.user_id(), query.range()?)
        .await?;

    Ok(response::ok(report))
}

/// GET /reports/evolution - Month-by-month income and expense.
async fn evolution(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<EvolutionQuery>,
) -> ApiResult<impl IntoResponse> {
    let current = YearMonth::of(chrono::Local::now().date_naive());
    let series = ReportRepository::new((*state.db).clone())
        .evolution(
            auth.user_id(),
            current,
            query.months.unwrap_or(DEFAULT_EVOLUTION_MONTHS),
        )
        .await?;

    Ok(response::ok(series))
}

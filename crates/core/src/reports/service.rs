//! Report generation service.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::Datelike;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::period::{DateRange, YearMonth};
use super::types::{
    CategoryReport, CategoryShare, EvolutionPoint, ExpenseItem, MonthlySummary,
    PaymentMethodReport, ReportTransaction,
};
use crate::ledger::PaymentMethod;
use crate::percent::calculate_percentage;

/// Categories listed in a monthly summary.
pub const TOP_CATEGORIES: usize = 5;
/// Expenses listed in a monthly summary.
pub const TOP_EXPENSES: usize = 10;
/// Largest accepted evolution window.
pub const MAX_EVOLUTION_MONTHS: u32 = 60;

/// Running total for one group key.
struct Bucket<'a> {
    first: &'a ReportTransaction,
    total: Decimal,
    count: u64,
}

/// Groups transactions by `key`, keeping first-appearance order.
fn group_by<'a, K, F>(
    transactions: impl Iterator<Item = &'a ReportTransaction>,
    key: F,
) -> Vec<Bucket<'a>>
where
    K: Eq + Hash,
    F: Fn(&ReportTransaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<Bucket<'a>> = Vec::new();
    for tx in transactions {
        let slot = *index.entry(key(tx)).or_insert_with(|| {
            buckets.push(Bucket {
                first: tx,
                total: Decimal::ZERO,
                count: 0,
            });
            buckets.len() - 1
        });
        buckets[slot].total += tx.amount;
        buckets[slot].count += 1;
    }
    // stable: equal totals keep retrieval order
    buckets.sort_by(|a, b| b.total.cmp(&a.total));
    buckets
}

/// PAID expenses dated inside `range`, in retrieval order.
fn paid_expenses(range: DateRange, transactions: &[ReportTransaction]) -> Vec<&ReportTransaction> {
    transactions
        .iter()
        .filter(|t| range.contains(t.date) && t.is_paid_expense())
        .collect()
}

/// Service for generating reports.
pub struct ReportService;

impl ReportService {
    /// Summarizes PAID transactions inside `range`.
    #[must_use]
    pub fn monthly_summary(range: DateRange, transactions: &[ReportTransaction]) -> MonthlySummary {
        let expenses = paid_expenses(range, transactions);
        let total_income: Decimal = transactions
            .iter()
            .filter(|t| range.contains(t.date) && t.is_paid_income())
            .map(|t| t.amount)
            .sum();
        let total_expense: Decimal = expenses.iter().map(|t| t.amount).sum();

        let top_categories = group_by(expenses.iter().copied(), |t| t.category.id)
        .into_iter()
        .take(TOP_CATEGORIES)
        .map(|b| CategoryShare {
            category_id: b.first.category.id,
            category_name: b.first.category.name.clone(),
            total: b.total,
            percentage: calculate_percentage(b.total, total_expense).round_dp(2),
        })
        .collect();

        let mut largest = expenses;
        largest.sort_by(|a, b| b.amount.cmp(&a.amount));
        let top_expenses = largest
            .into_iter()
            .take(TOP_EXPENSES)
            .map(|t| ExpenseItem {
                id: t.id,
                description: t.description.clone(),
                amount: t.amount,
                date: t.date,
                category: t.category.name.clone(),
            })
            .collect();

        MonthlySummary {
            month: range.start.month(),
            year: range.start.year(),
            total_income,
            total_expense,
            balance: total_income - total_expense,
            top_categories,
            top_expenses,
        }
    }

    /// Breaks PAID expenses inside `range` down by category, largest first.
    #[must_use]
    pub fn expenses_by_category(
        range: DateRange,
        transactions: &[ReportTransaction],
    ) -> Vec<CategoryReport> {
        let expenses = paid_expenses(range, transactions);
        let total: Decimal = expenses.iter().map(|t| t.amount).sum();

        group_by(expenses.into_iter(), |t| t.category.id)
            .into_iter()
            .map(|b| CategoryReport {
                category_id: b.first.category.id,
                category_name: b.first.category.name.clone(),
                icon: b.first.category.icon.clone(),
                color: b.first.category.color.clone(),
                total: b.total,
                percentage: calculate_percentage(b.total, total).round_dp(2),
                transaction_count: b.count,
            })
            .collect()
    }

    /// Breaks PAID expenses inside `range` down by payment method, largest first.
    /// Transactions without a method count as OTHER.
    #[must_use]
    pub fn expenses_by_payment_method(
        range: DateRange,
        transactions: &[ReportTransaction],
    ) -> Vec<PaymentMethodReport> {
        let method = |t: &ReportTransaction| t.payment_method.unwrap_or(PaymentMethod::Other);
        let expenses = paid_expenses(range, transactions);
        let total: Decimal = expenses.iter().map(|t| t.amount).sum();

        group_by(expenses.into_iter(), method)
            .into_iter()
            .map(|b| PaymentMethodReport {
                payment_method: method(b.first),
                total: b.total,
                percentage: calculate_percentage(b.total, total).round_dp(2),
                transaction_count: b.count,
            })
            .collect()
    }

    /// Validates an evolution window length.
    ///
    /// # Errors
    ///
    /// `InvalidWindow` outside `1..=MAX_EVOLUTION_MONTHS`.
    pub fn validate_window(months: u32) -> Result<(), ReportError> {
        if (1..=MAX_EVOLUTION_MONTHS).contains(&months) {
            Ok(())
        } else {
            Err(ReportError::InvalidWindow {
                got: months,
                max: MAX_EVOLUTION_MONTHS,
            })
        }
    }

    /// The date range covering the `months`-long window ending at `current`.
    #[must_use]
    pub fn evolution_range(current: YearMonth, months: u32) -> DateRange {
        DateRange {
            start: current.minus_months(months.saturating_sub(1)).first_day(),
            end: current.last_day(),
        }
    }

    /// One summary per month for the `months` months ending at `current`,
    /// oldest first.
    #[must_use]
    pub fn evolution(
        current: YearMonth,
        months: u32,
        transactions: &[ReportTransaction],
    ) -> Vec<EvolutionPoint> {
        current
            .trailing(months)
            .into_iter()
            .map(|month| {
                let summary = Self::monthly_summary(month.range(), transactions);
                EvolutionPoint {
                    month: month.label(),
                    income: summary.total_income,
                    expense: summary.total_expense,
                    balance: summary.balance,
                }
            })
            .collect()
    }
}

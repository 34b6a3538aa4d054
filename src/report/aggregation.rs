//! Aggregates transactions into totals and monthly buckets.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Month;
use utoipa::ToSchema;

use crate::transaction::{Transaction, TransactionType};

/// Income, expense and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Income minus expenses.
    pub balance: f64,
}

impl Totals {
    /// Fold the totals from monthly buckets.
    ///
    /// Summing the buckets (instead of the transactions) keeps the totals
    /// exactly equal to the sum of the monthly figures.
    pub fn from_months(months: &[MonthlySummary]) -> Self {
        let (total_income, total_expense) =
            months.iter().fold((0.0, 0.0), |(income, expense), month| {
                (income + month.income, expense + month.expense)
            });

        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// The income and expense of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySummary {
    /// The short Spanish month name and the year, e.g. "ene 2025".
    pub month: String,
    /// The sum of income in the month.
    pub income: f64,
    /// The sum of expenses in the month.
    pub expense: f64,
}

/// Compute the totals for `transactions`.
pub fn summarize(transactions: &[Transaction]) -> Totals {
    Totals::from_months(&group_by_month(transactions))
}

/// Bucket `transactions` by the UTC calendar month of their date.
///
/// Buckets come out in chronological order, regardless of the order of
/// `transactions`.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut buckets: BTreeMap<(i32, u8), (Month, f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let (year, month) = (transaction.date.year(), transaction.date.month());
        let (_, income, expense) = buckets
            .entry((year, u8::from(month)))
            .or_insert((month, 0.0, 0.0));

        match transaction.transaction_type {
            TransactionType::Income => *income += transaction.amount,
            TransactionType::Expense => *expense += transaction.amount,
        }
    }

    buckets
        .into_iter()
        .map(|((year, _), (month, income, expense))| MonthlySummary {
            month: month_label(year, month),
            income,
            expense,
        })
        .collect()
}

/// Format a month as the short Spanish month name and year, e.g. "sept 2025".
fn month_label(year: i32, month: Month) -> String {
    let name = match month {
        Month::January => "ene",
        Month::February => "feb",
        Month::March => "mar",
        Month::April => "abr",
        Month::May => "may",
        Month::June => "jun",
        Month::July => "jul",
        Month::August => "ago",
        Month::September => "sept",
        Month::October => "oct",
        Month::November => "nov",
        Month::December => "dic",
    };

    format!("{name} {year}")
}

/// The aggregate report over the whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// Every transaction, newest first.
    pub transactions: Vec<Transaction>,
    /// Income and expenses per month, oldest month first.
    pub monthly_data: Vec<MonthlySummary>,
}

/// Build the report for `transactions`.
pub fn build_report(transactions: Vec<Transaction>) -> Report {
    let monthly_data = group_by_month(&transactions);
    let totals = Totals::from_months(&monthly_data);

    Report {
        total_income: totals.total_income,
        total_expense: totals.total_expense,
        balance: totals.balance,
        transactions,
        monthly_data,
    }
}

#[cfg(test)]
pub(crate) mod test_transactions {
    use time::OffsetDateTime;

    use crate::{
        transaction::{Owner, Transaction, TransactionId, TransactionType},
        user::UserID,
    };

    /// Build a transaction without touching the database.
    pub fn transaction(
        id: i64,
        amount: f64,
        date: OffsetDateTime,
        transaction_type: TransactionType,
    ) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            concept: format!("Transaction {id}"),
            amount,
            date,
            transaction_type,
            user_id: UserID::new(1),
            user: Owner {
                name: "Ana".to_owned(),
                email: "ana@example.com".to_owned(),
            },
        }
    }
}

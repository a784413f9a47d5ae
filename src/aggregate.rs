// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure derivations over a store snapshot: overall summary, per-category
//! breakdown and the six month income/expense trend.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    CategoryShare, FinancialSummary, MonthlyBucket, Transaction, TransactionType,
};

/// Number of months covered by [`compute_monthly_trend`], current month included.
pub const TREND_MONTHS: u32 = 6;

/// Totals saturate at the `Decimal` limits instead of overflowing.
pub fn compute_summary(records: &[Transaction]) -> FinancialSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    for t in records {
        match t.r#type {
            TransactionType::Income => {
                total_income = total_income.saturating_add(t.amount);
            }
            TransactionType::Expense => {
                total_expense = total_expense.saturating_add(t.amount);
            }
        }
    }
    FinancialSummary {
        total_income,
        total_expense,
        balance: total_income.saturating_sub(total_expense),
    }
}

/// Sum per category for one transaction type, largest first. Categories with
/// equal sums keep the order in which they were first seen.
pub fn compute_distribution(
    records: &[Transaction],
    selected: TransactionType,
) -> Vec<CategoryShare> {
    let mut order: Vec<(String, Decimal)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut total = Decimal::ZERO;

    for t in records.iter().filter(|t| t.r#type == selected) {
        let label = t.category.label();
        match index.get(label) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(t.amount),
            None => {
                index.insert(label, order.len());
                order.push((label.to_string(), t.amount));
            }
        }
        total = total.saturating_add(t.amount);
    }

    let mut shares: Vec<CategoryShare> = order
        .into_iter()
        .map(|(category, value)| CategoryShare {
            percentage: percentage_of(value, total),
            category,
            value,
        })
        .collect();
    // sort_by is stable, which keeps discovery order on ties
    shares.sort_by(|a, b| b.value.cmp(&a.value));
    shares
}

fn percentage_of(value: Decimal, total: Decimal) -> Decimal {
    let raw = if total > Decimal::ZERO {
        value
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let mut pct = raw.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(1);
    pct
}

/// Income and expense per month for the six months ending with the month of
/// `reference`, oldest first. Every month is present even when empty;
/// transactions outside the window are ignored.
pub fn compute_monthly_trend(records: &[Transaction], reference: NaiveDate) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = months_before(reference.year(), reference.month(), back);
            MonthlyBucket {
                year,
                month,
                label: month_label(year, month),
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            }
        })
        .collect();

    for t in records {
        let key = (t.date.year(), t.date.month());
        if let Some(b) = buckets.iter_mut().find(|b| (b.year, b.month) == key) {
            match t.r#type {
                TransactionType::Income => b.income = b.income.saturating_add(t.amount),
                TransactionType::Expense => b.expense = b.expense.saturating_add(t.amount),
            }
        }
    }
    buckets
}

fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let idx = year * 12 + month as i32 - 1 - back as i32;
    (idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1)
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

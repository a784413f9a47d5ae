// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{compute_distribution, compute_monthly_trend, compute_summary};
use crate::commands::open_store;
use crate::models::{CategoryShare, MonthlyBucket, Transaction, TransactionType};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("distribution", sub)) => distribution(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let store = open_store(conn)?;
    let s = compute_summary(&store.snapshot());
    if !maybe_print_json(sub.get_flag("json"), false, &s)? {
        println!(
            "{}",
            pretty_table(
                &["Income", "Expense", "Balance"],
                vec![vec![
                    fmt_money(&s.total_income),
                    fmt_money(&s.total_expense),
                    fmt_money(&s.balance),
                ]],
            )
        );
    }
    Ok(())
}

fn distribution(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let r#type = selected_type(sub)?;
    let store = open_store(conn)?;
    let data = distribution_rows(&store.snapshot(), sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No {} transactions yet.", r#type);
        return Ok(());
    }
    let total = data
        .iter()
        .fold(rust_decimal::Decimal::ZERO, |acc, s| acc.saturating_add(s.value));
    let mut rows: Vec<Vec<String>> = data
        .iter()
        .map(|s| {
            vec![
                s.category.clone(),
                fmt_money(&s.value),
                format!("%{}", s.percentage),
            ]
        })
        .collect();
    rows.push(vec!["Total".into(), fmt_money(&total), String::new()]);
    println!("{}", pretty_table(&["Category", "Amount", "Share"], rows));
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let store = open_store(conn)?;
    let data = trend_rows(&store.snapshot(), sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.label.clone(),
                    fmt_money(&b.income),
                    fmt_money(&b.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}

fn selected_type(sub: &clap::ArgMatches) -> Result<TransactionType> {
    sub.get_one::<String>("type").unwrap().parse()
}

/// Category shares for the `report distribution` options.
pub fn distribution_rows(
    records: &[Transaction],
    sub: &clap::ArgMatches,
) -> Result<Vec<CategoryShare>> {
    Ok(compute_distribution(records, selected_type(sub)?))
}

/// Six monthly buckets ending at `--as-of`, or today.
pub fn trend_rows(records: &[Transaction], sub: &clap::ArgMatches) -> Result<Vec<MonthlyBucket>> {
    let reference = match sub.get_one::<String>("as_of") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    Ok(compute_monthly_trend(records, reference))
}

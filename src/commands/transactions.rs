// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::open_store;
use crate::models::{Category, Transaction, TransactionDraft, TransactionType};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use anyhow::{Context, Result, anyhow};
use chrono::Datelike;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, sub)?;
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<Transaction> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let desc = sub.get_one::<String>("desc").unwrap();
    let category = Category::parse_user(sub.get_one::<String>("category").unwrap());
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let r#type: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;

    let draft = TransactionDraft::new(amount, desc, category, date, r#type)
        .context("Transaction rejected")?;
    let mut store = open_store(conn)?;
    let tx = store.add(draft);

    if sub.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&tx)?);
    } else {
        println!(
            "Recorded {} {} on {} for '{}' ({}) id={}",
            tx.r#type,
            fmt_money(&tx.amount),
            tx.date,
            tx.description,
            tx.category,
            tx.id
        );
    }
    Ok(tx)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let store = open_store(conn)?;
    let data = query_rows(&store.snapshot(), sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.description.clone(),
                    t.category.to_string(),
                    fmt_money(&t.amount),
                    t.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Type", "Description", "Category", "Amount", "ID"],
                rows
            )
        );
    }
    Ok(())
}

/// Filter a newest-first snapshot by the `tx list` options. Order is kept.
pub fn query_rows(records: &[Transaction], sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let r#type: Option<TransactionType> = sub
        .get_one::<String>("type")
        .map(|s| s.parse())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|c| Category::parse_user(c));
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    Ok(records
        .iter()
        .filter(|t| r#type.is_none_or(|ty| t.r#type == ty))
        .filter(|t| {
            category
                .as_ref()
                .is_none_or(|c| t.category.label() == c.label())
        })
        .filter(|t| month.is_none_or(|(y, m)| t.date.year() == y && t.date.month() == m))
        .take(limit)
        .cloned()
        .collect())
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = parse_date(&format!("{}-01", s.trim()))
        .map_err(|_| anyhow!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let mut store = open_store(conn)?;
    if store.delete(id) {
        println!("Removed transaction {}", id);
    } else {
        println!("No transaction with id {}; nothing removed", id);
    }
    Ok(())
}

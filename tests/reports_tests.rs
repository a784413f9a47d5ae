// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use smartbudget::{
    cli,
    commands::{self, reports, transactions},
    db,
};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn seed(conn: &Connection) {
    for (amount, desc, cat, date, ty) in [
        ("100", "Market", "Gıda", "2024-01-10", "expense"),
        ("50", "Pay", "Maaş", "2024-01-15", "income"),
        ("60", "Bus card", "Ulaşım", "2023-11-02", "expense"),
        ("40", "Groceries", "Food", "2023-06-20", "expense"),
    ] {
        let matches = cli::build_cli().get_matches_from([
            "smartbudget", "tx", "add", "--amount", amount, "--desc", desc, "--category", cat,
            "--date", date, "--type", ty,
        ]);
        let (_, tx_m) = matches.subcommand().unwrap();
        transactions::handle(conn, tx_m).unwrap();
    }
}

fn report(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["smartbudget", "report"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("report", sub)) => reports::handle(conn, sub),
        _ => panic!("no report subcommand"),
    }
}

fn report_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["smartbudget", "report"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, report_m) = matches.subcommand().unwrap();
    let (_, sub) = report_m.subcommand().unwrap();
    sub.clone()
}

#[test]
fn every_report_renders_as_table_and_json() {
    let conn = setup();
    seed(&conn);
    let cases: [&[&str]; 6] = [
        &["summary"],
        &["summary", "--json"],
        &["distribution"],
        &["distribution", "--type", "income", "--jsonl"],
        &["trend", "--as-of", "2024-01-31"],
        &["trend", "--json"],
    ];
    for args in cases {
        report(&conn, args).unwrap_or_else(|e| panic!("{args:?}: {e:#}"));
    }
}

#[test]
fn reports_on_an_empty_store_succeed() {
    let conn = setup();
    report(&conn, &["summary"]).unwrap();
    report(&conn, &["distribution", "--type", "income"]).unwrap();
    report(&conn, &["trend"]).unwrap();
}

#[test]
fn distribution_type_defaults_to_expense_and_parses_aliases() {
    let conn = setup();
    seed(&conn);
    let records = commands::open_store(&conn).unwrap().snapshot();

    let rows = reports::distribution_rows(&records, &report_matches(&["distribution"])).unwrap();
    let labels: Vec<&str> = rows.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(labels, ["Gıda", "Ulaşım"]);
    assert_eq!(rows[0].value, Decimal::from(140));
    assert_eq!(rows[0].percentage.to_string(), "70.0");
    assert_eq!(rows[1].percentage.to_string(), "30.0");

    let rows = reports::distribution_rows(
        &records,
        &report_matches(&["distribution", "--type", " IN "]),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Maaş");
    assert_eq!(rows[0].percentage.to_string(), "100.0");
}

#[test]
fn unknown_distribution_type_is_an_error() {
    let conn = setup();
    let err = report(&conn, &["distribution", "--type", "refund"]).unwrap_err();
    assert!(err.to_string().contains("Invalid transaction type 'refund'"));
}

#[test]
fn trend_window_follows_as_of() {
    let conn = setup();
    seed(&conn);
    let records = commands::open_store(&conn).unwrap().snapshot();

    let rows =
        reports::trend_rows(&records, &report_matches(&["trend", "--as-of", "2024-01-31"])).unwrap();
    let labels: Vec<&str> = rows.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        ["Aug 2023", "Sep 2023", "Oct 2023", "Nov 2023", "Dec 2023", "Jan 2024"]
    );
    assert_eq!(rows[3].expense, Decimal::from(60));
    assert_eq!(rows[5].expense, Decimal::from(100));
    assert_eq!(rows[5].income, Decimal::from(50));
    // the June 2023 groceries fall outside the window
    let expense: Decimal = rows.iter().map(|b| b.expense).sum();
    assert_eq!(expense, Decimal::from(160));
}

#[test]
fn bad_as_of_date_is_an_error() {
    let conn = setup();
    let err = report(&conn, &["trend", "--as-of", "31/01/2024"]).unwrap_err();
    assert!(format!("{err:#}").contains("expected YYYY-MM-DD"));
}

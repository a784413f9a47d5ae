// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;

use rusqlite::Connection;
use rust_decimal::Decimal;
use smartbudget::{
    assistant::{Assistant, NOT_ENOUGH_DATA},
    cli,
    commands::{self, advice, receipt},
    db,
    error::AssistantError,
    models::{Category, ReceiptAnalysis, Transaction, TransactionType},
};
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

struct Canned(Result<ReceiptAnalysis, String>);

impl Assistant for Canned {
    fn analyze_receipt(&self, image: &[u8], mime_type: &str) -> Result<ReceiptAnalysis, AssistantError> {
        assert_eq!(image, b"jpeg-bytes");
        assert_eq!(mime_type, "image/jpeg");
        self.0.clone().map_err(AssistantError::MalformedReceipt)
    }

    fn advise(&self, recent: &[Transaction]) -> Result<String, AssistantError> {
        Ok(format!("You logged {} transactions.", recent.len()))
    }
}

fn image_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    file.write_all(b"jpeg-bytes").unwrap();
    file.flush().unwrap();
    file
}

fn receipt_matches(path: &str, extra: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["smartbudget", "receipt", "--image", path];
    argv.extend_from_slice(extra);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("receipt", sub)) => sub.clone(),
        _ => panic!("receipt command not parsed"),
    }
}

#[test]
fn scanned_receipt_is_recorded_as_expense() {
    let conn = setup();
    let file = image_file();
    let m = receipt_matches(file.path().to_str().unwrap(), &[]);
    let assistant = Canned(Ok(ReceiptAnalysis {
        amount: Decimal::new(8990, 2),
        description: "Market Fişi".into(),
        category: "Alışveriş".into(),
        date: Some("2025-03-01".into()),
    }));

    let tx = receipt::scan(&conn, &assistant, &m).unwrap().unwrap();
    assert_eq!(tx.r#type, TransactionType::Expense);
    assert_eq!(tx.category, Category::Shopping);
    assert_eq!(tx.amount, Decimal::new(8990, 2));

    let snap = commands::open_store(&conn).unwrap().snapshot();
    assert_eq!(snap.to_vec(), vec![tx]);
}

#[test]
fn dry_run_records_nothing() {
    let conn = setup();
    let file = image_file();
    let m = receipt_matches(file.path().to_str().unwrap(), &["--dry-run"]);
    let assistant = Canned(Ok(ReceiptAnalysis {
        amount: Decimal::from(3),
        description: "Simit".into(),
        category: "Bakery".into(),
        date: None,
    }));
    assert!(receipt::scan(&conn, &assistant, &m).unwrap().is_none());
    assert!(commands::open_store(&conn).unwrap().is_empty());
}

#[test]
fn failed_analysis_commits_nothing() {
    let conn = setup();
    let file = image_file();
    let m = receipt_matches(file.path().to_str().unwrap(), &[]);
    let assistant = Canned(Err("not a receipt".into()));
    let err = receipt::scan(&conn, &assistant, &m).unwrap_err();
    assert!(format!("{err:#}").contains("not a receipt"));
    assert!(commands::open_store(&conn).unwrap().is_empty());
}

#[test]
fn receipt_with_zero_total_is_rejected() {
    let conn = setup();
    let file = image_file();
    let m = receipt_matches(file.path().to_str().unwrap(), &[]);
    let assistant = Canned(Ok(ReceiptAnalysis {
        amount: Decimal::ZERO,
        description: "Blank".into(),
        category: "Diğer".into(),
        date: None,
    }));
    assert!(receipt::scan(&conn, &assistant, &m).is_err());
    assert!(commands::open_store(&conn).unwrap().is_empty());
}

#[test]
fn advice_uses_the_store_snapshot() {
    let conn = setup();
    let assistant = Canned(Err(String::new()));
    let empty = commands::open_store(&conn).unwrap().snapshot();
    assert_eq!(advice::advise_with(&empty, &assistant).unwrap(), NOT_ENOUGH_DATA);

    let matches = cli::build_cli().get_matches_from([
        "smartbudget", "tx", "add", "--amount", "10", "--desc", "Tea",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    commands::transactions::handle(&conn, tx_m).unwrap();
    let records = commands::open_store(&conn).unwrap().snapshot();
    assert_eq!(
        advice::advise_with(&records, &assistant).unwrap(),
        "You logged 1 transactions."
    );
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DraftError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(TransactionType::Income),
            "expense" | "out" => Ok(TransactionType::Expense),
            other => Err(anyhow!(
                "Invalid transaction type '{}', expected income|expense",
                other
            )),
        }
    }
}

/// A transaction category: one of the built-in labels, or any other string
/// a user or an imported backup supplied.
///
/// Built-in categories persist as their localized labels so that existing
/// backups stay readable. Grouping always goes through [`Category::label`],
/// so a custom string and a built-in with the same text are the same bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Health,
    Salary,
    Investment,
    Other,
    Custom(String),
}

impl Category {
    pub const KNOWN: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Health,
        Category::Salary,
        Category::Investment,
        Category::Other,
    ];

    /// The persisted label.
    pub fn label(&self) -> &str {
        match self {
            Category::Food => "Gıda",
            Category::Transport => "Ulaşım",
            Category::Shopping => "Alışveriş",
            Category::Bills => "Faturalar",
            Category::Entertainment => "Eğlence",
            Category::Health => "Sağlık",
            Category::Salary => "Maaş",
            Category::Investment => "Yatırım",
            Category::Other => "Diğer",
            Category::Custom(s) => s,
        }
    }

    /// English name of a built-in category, `None` for custom strings.
    pub fn english_name(&self) -> Option<&'static str> {
        match self {
            Category::Food => Some("Food"),
            Category::Transport => Some("Transport"),
            Category::Shopping => Some("Shopping"),
            Category::Bills => Some("Bills"),
            Category::Entertainment => Some("Entertainment"),
            Category::Health => Some("Health"),
            Category::Salary => Some("Salary"),
            Category::Investment => Some("Investment"),
            Category::Other => Some("Other"),
            Category::Custom(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Custom(_))
    }

    /// Exact label match against the built-ins, anything else is kept verbatim.
    pub fn from_label(label: &str) -> Self {
        Category::KNOWN
            .iter()
            .find(|c| c.label() == label)
            .cloned()
            .unwrap_or_else(|| Category::Custom(label.to_string()))
    }

    /// Like [`Category::from_label`] but unknown labels collapse to `Other`.
    /// Used for categories suggested by the receipt reader.
    pub fn known_or_other(label: &str) -> Self {
        match Category::from_label(label.trim()) {
            Category::Custom(_) => Category::Other,
            known => known,
        }
    }

    /// Parse user input: accepts the persisted label or the English name
    /// (case-insensitive). Anything else becomes a custom category.
    pub fn parse_user(input: &str) -> Self {
        let input = input.trim();
        Category::KNOWN
            .iter()
            .find(|c| {
                c.english_name()
                    .is_some_and(|n| n.eq_ignore_ascii_case(input))
                    || c.label().to_lowercase() == input.to_lowercase()
            })
            .cloned()
            .unwrap_or_else(|| Category::Custom(input.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Category::from_label(&s))
    }
}

/// Largest amount a transaction may carry, 999 999 999 999.99.
///
/// Amounts are persisted as JSON numbers. Up to this size, with at most
/// [`AMOUNT_DP`] decimal places, they read back exactly.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Decimal places kept on new amounts; extra digits are rounded half away from zero.
pub const AMOUNT_DP: u32 = 2;

/// One recorded income or expense. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub r#type: TransactionType,
}

impl Transaction {
    pub fn from_draft(id: String, draft: TransactionDraft) -> Self {
        Transaction {
            id,
            amount: draft.amount,
            description: draft.description,
            category: draft.category,
            date: draft.date,
            r#type: draft.r#type,
        }
    }
}

// Older backups written by hand sometimes carry numeric ids.
fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// A transaction that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub r#type: TransactionType,
}

impl TransactionDraft {
    /// The creation boundary: an amount in `(0, MAX_AMOUNT]` after rounding to
    /// [`AMOUNT_DP`] places, and a non-blank description.
    pub fn new(
        amount: Decimal,
        description: &str,
        category: Category,
        date: NaiveDate,
        r#type: TransactionType,
    ) -> Result<Self, DraftError> {
        let rounded =
            amount.round_dp_with_strategy(AMOUNT_DP, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(DraftError::NonPositiveAmount(amount));
        }
        if rounded > MAX_AMOUNT {
            return Err(DraftError::AmountTooLarge(amount));
        }
        let amount = rounded;
        let description = description.trim();
        if description.is_empty() {
            return Err(DraftError::EmptyDescription);
        }
        Ok(TransactionDraft {
            amount,
            description: description.to_string(),
            category,
            date,
            r#type,
        })
    }

    /// Turn a parsed receipt into an expense draft. Unknown categories fall
    /// back to `Other`; a missing or unreadable date falls back to `default_date`.
    pub fn from_receipt(
        receipt: &ReceiptAnalysis,
        default_date: NaiveDate,
    ) -> Result<Self, DraftError> {
        let date = match receipt.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => d,
                Err(_) => {
                    tracing::warn!(date = raw, "receipt date unreadable, using default");
                    default_date
                }
            },
            _ => default_date,
        };
        TransactionDraft::new(
            receipt.amount,
            &receipt.description,
            Category::known_or_other(&receipt.category),
            date,
            TransactionType::Expense,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

/// One slice of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub value: Decimal,
    /// Share of the filtered total, one fractional digit.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// What the receipt reader extracts from a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptAnalysis {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub date: Option<String>,
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed errors raised by the library. The command layer wraps these in
//! `anyhow` with extra context.

use rust_decimal::Decimal;

/// A draft was refused at the creation boundary.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DraftError {
    /// Amounts carry magnitude only; the sign lives in the transaction type.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount must not exceed {max}, got {0}", max = crate::models::MAX_AMOUNT)]
    AmountTooLarge(Decimal),

    #[error("description cannot be empty")]
    EmptyDescription,
}

/// A backup payload could not be trusted, so nothing was replaced.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("backup is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("backup must be a JSON array of transactions, found {0}")]
    NotAnArray(&'static str),

    /// Only the first record is inspected for these fields.
    #[error("first record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("record {index} could not be decoded: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("record {index} has amount {amount}, above the maximum of {max}", max = crate::models::MAX_AMOUNT)]
    AmountOutOfRange { index: usize, amount: Decimal },

    #[error("record {index} repeats id '{id}'")]
    DuplicateId { index: usize, id: String },
}

/// Failures talking to the generative AI service.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("no API key configured; set GEMINI_API_KEY or run `smartbudget config set --key gemini_api_key`")]
    MissingApiKey,

    #[error("request to AI service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("AI service returned no text")]
    EmptyResponse,

    #[error("AI service returned malformed receipt data: {0}")]
    MalformedReceipt(String),
}

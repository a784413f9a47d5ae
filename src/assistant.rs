// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generative-AI helpers: spending advice and receipt reading.
//!
//! The store never talks to the service directly. Advice reads a snapshot,
//! receipt reading yields a draft that the caller may hand to `add`. Nothing
//! here retries; a failed call is reported and the store is left alone.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::AssistantError;
use crate::models::{ReceiptAnalysis, Transaction, TransactionDraft};

/// How many of the most recent transactions are sent along for advice.
pub const ADVICE_CONTEXT_LIMIT: usize = 50;

pub const NOT_ENOUGH_DATA: &str = "Not enough data yet. Start by adding some transactions!";
pub const NO_ADVICE: &str = "Could not come up with advice this time.";

const RECEIPT_PROMPT: &str = "Analyze this receipt. Extract the total amount, a short description \
(e.g. Grocery receipt), the best matching category and the date. \
The category must be one of: Gıda, Ulaşım, Alışveriş, Faturalar, Eğlence, Sağlık, Diğer. \
If the date cannot be read, use today's date (YYYY-MM-DD).";

const ADVICE_PROMPT: &str = "Based on the transaction history below, give the user short, \
motivating and actionable financial advice. Point out areas of heavy spending or places \
with saving potential. Keep a friendly tone and use at most 3 sentences.";

pub trait Assistant {
    /// Read a receipt photo.
    fn analyze_receipt(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ReceiptAnalysis, AssistantError>;

    /// Free-text advice about `recent`, newest first.
    fn advise(&self, recent: &[Transaction]) -> Result<String, AssistantError>;
}

/// Ask for advice on the newest [`ADVICE_CONTEXT_LIMIT`] records of a
/// newest-first snapshot. An empty snapshot never reaches the assistant.
pub fn request_advice(
    records: &[Transaction],
    assistant: &dyn Assistant,
) -> Result<String, AssistantError> {
    if records.is_empty() {
        return Ok(NOT_ENOUGH_DATA.to_string());
    }
    let recent = &records[..records.len().min(ADVICE_CONTEXT_LIMIT)];
    tracing::info!(count = recent.len(), "requesting advice");
    let text = assistant.advise(recent)?;
    let text = text.trim();
    if text.is_empty() {
        tracing::warn!("assistant returned blank advice");
        return Ok(NO_ADVICE.to_string());
    }
    Ok(text.to_string())
}

/// Read a receipt and turn it into an expense draft dated `default_date`
/// unless the receipt says otherwise.
pub fn draft_from_receipt(
    assistant: &dyn Assistant,
    image: &[u8],
    mime_type: &str,
    default_date: NaiveDate,
) -> anyhow::Result<TransactionDraft> {
    tracing::info!(bytes = image.len(), mime_type, "analyzing receipt");
    let analysis = assistant.analyze_receipt(image, mime_type)?;
    let draft = TransactionDraft::from_receipt(&analysis, default_date)?;
    Ok(draft)
}

/// Guess the MIME type of an image from its file extension.
pub fn mime_for_path(path: &std::path::Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "image/jpeg",
    }
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_config(config: &Config) -> Result<Self, AssistantError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AssistantError::MissingApiKey)?;
        GeminiClient::with_base_url(api_key, config.model.clone(), config.api_base.clone())
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
    ) -> Result<Self, AssistantError> {
        Ok(GeminiClient {
            http: crate::utils::http_client()?,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn generate(&self, body: Value) -> Result<String, AssistantError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        let parsed: GenerateResponse = resp.json()?;
        parsed.text().ok_or(AssistantError::EmptyResponse)
    }
}

impl Assistant for GeminiClient {
    fn analyze_receipt(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ReceiptAnalysis, AssistantError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } },
                    { "text": RECEIPT_PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "amount": { "type": "NUMBER" },
                        "description": { "type": "STRING" },
                        "category": { "type": "STRING" },
                        "date": { "type": "STRING" }
                    },
                    "required": ["amount", "description", "category", "date"]
                }
            }
        });
        let text = self.generate(body)?;
        parse_receipt(&text)
    }

    fn advise(&self, recent: &[Transaction]) -> Result<String, AssistantError> {
        let history = serde_json::to_string(recent)?;
        let body = json!({
            "contents": [{
                "parts": [{ "text": format!("{}\n\nTransactions: {}", ADVICE_PROMPT, history) }]
            }]
        });
        self.generate(body)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").expect("static regex")
});

fn parse_receipt(text: &str) -> Result<ReceiptAnalysis, AssistantError> {
    let body = CODE_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);
    serde_json::from_str(body.trim()).map_err(|e| AssistantError::MalformedReceipt(e.to_string()))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TransactionType};
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use std::cell::{Cell, RefCell};
    use std::str::FromStr;

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::with_base_url("test-key".into(), "gemini-test".into(), server.base_url())
            .unwrap()
    }

    fn text_response(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn tx(i: usize) -> Transaction {
        Transaction {
            id: format!("t{i}"),
            amount: Decimal::from(i as i64 + 1),
            description: "x".into(),
            category: Category::Other,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            r#type: TransactionType::Expense,
        }
    }

    #[derive(Default)]
    struct Recording {
        calls: Cell<usize>,
        seen: RefCell<Vec<String>>,
        reply: String,
    }

    impl Assistant for Recording {
        fn analyze_receipt(&self, _: &[u8], _: &str) -> Result<ReceiptAnalysis, AssistantError> {
            self.calls.set(self.calls.get() + 1);
            parse_receipt(&self.reply)
        }

        fn advise(&self, recent: &[Transaction]) -> Result<String, AssistantError> {
            self.calls.set(self.calls.get() + 1);
            *self.seen.borrow_mut() = recent.iter().map(|t| t.id.clone()).collect();
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn advice_short_circuits_on_empty_store() {
        let assistant = Recording::default();
        assert_eq!(request_advice(&[], &assistant).unwrap(), NOT_ENOUGH_DATA);
        assert_eq!(assistant.calls.get(), 0);
    }

    #[test]
    fn advice_sends_only_the_newest_fifty() {
        let records: Vec<Transaction> = (0..60).map(tx).collect();
        let assistant = Recording {
            reply: "  Spend less on snacks.  ".into(),
            ..Recording::default()
        };
        let advice = request_advice(&records, &assistant).unwrap();
        assert_eq!(advice, "Spend less on snacks.");
        let seen = assistant.seen.borrow();
        assert_eq!(seen.len(), ADVICE_CONTEXT_LIMIT);
        assert_eq!(seen[0], "t0");
        assert_eq!(seen[49], "t49");
    }

    #[test]
    fn blank_advice_gets_a_fallback_message() {
        let assistant = Recording {
            reply: "   ".into(),
            ..Recording::default()
        };
        assert_eq!(request_advice(&[tx(0)], &assistant).unwrap(), NO_ADVICE);
    }

    #[test]
    fn receipt_is_parsed_into_an_expense_draft() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-test:generateContent")
                .header("x-goog-api-key", "test-key")
                .body_includes("inline_data")
                .body_includes(STANDARD.encode(b"fake-jpeg"));
            then.status(200).json_body(text_response(
                r#"{"amount": 123.45, "description": "Market Fişi", "category": "Snacks", "date": "2025-01-05"}"#,
            ));
        });

        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let draft = draft_from_receipt(&client(&server), b"fake-jpeg", "image/jpeg", today).unwrap();
        mock.assert();
        assert_eq!(draft.amount, Decimal::from_str("123.45").unwrap());
        assert_eq!(draft.description, "Market Fişi");
        assert_eq!(draft.category, Category::Other);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(draft.r#type, TransactionType::Expense);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let r = parse_receipt("```json\n{\"amount\": 5, \"description\": \"Tea\", \"category\": \"Gıda\"}\n```")
            .unwrap();
        assert_eq!(r.amount, Decimal::from(5));
        assert_eq!(r.date, None);
    }

    #[test]
    fn malformed_receipt_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(text_response("I could not read this image."));
        });
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let err = draft_from_receipt(&client(&server), b"x", "image/png", today).unwrap_err();
        assert!(err.to_string().contains("malformed receipt"), "{err}");
    }

    #[test]
    fn http_errors_carry_the_service_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403)
                .json_body(json!({ "error": { "message": "API key not valid" } }));
        });
        match client(&server).advise(&[tx(0)]) {
            Err(AssistantError::Status { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_candidates_are_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!({ "candidates": [] }));
        });
        assert!(matches!(
            client(&server).advise(&[tx(0)]),
            Err(AssistantError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_key_is_reported_before_any_request() {
        assert!(matches!(
            GeminiClient::from_config(&Config::default()),
            Err(AssistantError::MissingApiKey)
        ));
    }

    #[test]
    fn mime_types_follow_extensions() {
        assert_eq!(mime_for_path(std::path::Path::new("a.PNG")), "image/png");
        assert_eq!(mime_for_path(std::path::Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_for_path(std::path::Path::new("scan")), "image/jpeg");
    }
}

// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Log setup for the binary. Logs go to stderr so `--json` output on stdout
//! stays clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "SMARTBUDGET_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

pub fn init(verbose: u8) {
    let directive = filter_directive(verbose, |name| std::env::var(name).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("ignoring invalid log filter '{}': {}", directive, err);
        EnvFilter::new(DEFAULT_DIRECTIVE)
    });
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

/// `-v` flags win, then `SMARTBUDGET_LOG`, then `RUST_LOG`.
fn filter_directive(verbose: u8, env: impl Fn(&str) -> Option<String>) -> String {
    match verbose {
        0 => env(LOG_ENV)
            .or_else(|| env("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

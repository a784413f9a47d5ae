// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;

use crate::db::{get_slot, remove_slot, set_slot};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Setting keys accepted by `config set`, with the environment variable that
/// overrides each one.
pub const SETTINGS: [(&str, &str); 3] = [
    ("gemini_api_key", "GEMINI_API_KEY"),
    ("gemini_model", "SMARTBUDGET_MODEL"),
    ("gemini_api_base", "SMARTBUDGET_API_BASE"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Stored settings, each overridden by its environment variable when set.
    pub fn load(conn: &Connection) -> Result<Config> {
        Config::load_with(conn, |name| std::env::var(name).ok())
    }

    pub fn load_with(conn: &Connection, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let lookup = |key: &str, var: &str| -> Result<Option<String>> {
            if let Some(v) = env(var).filter(|v| !v.trim().is_empty()) {
                return Ok(Some(v.trim().to_string()));
            }
            get_slot(conn, &setting_slot(key))
        };
        let defaults = Config::default();
        Ok(Config {
            api_key: lookup(SETTINGS[0].0, SETTINGS[0].1)?,
            model: lookup(SETTINGS[1].0, SETTINGS[1].1)?.unwrap_or(defaults.model),
            api_base: lookup(SETTINGS[2].0, SETTINGS[2].1)?.unwrap_or(defaults.api_base),
        })
    }

    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(k) if k.chars().count() > 8 => {
                let tail: String = k.chars().skip(k.chars().count() - 4).collect();
                format!("****{}", tail)
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }
}

fn setting_slot(key: &str) -> String {
    format!("setting:{}", key)
}

fn check_key(key: &str) -> Result<()> {
    if SETTINGS.iter().any(|(k, _)| *k == key) {
        Ok(())
    } else {
        let known: Vec<&str> = SETTINGS.iter().map(|(k, _)| *k).collect();
        Err(anyhow!(
            "Unknown setting '{}', expected one of: {}",
            key,
            known.join(", ")
        ))
    }
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    check_key(key)?;
    set_slot(conn, &setting_slot(key), value.trim())
}

pub fn unset_setting(conn: &Connection, key: &str) -> Result<()> {
    check_key(key)?;
    remove_slot(conn, &setting_slot(key))
}

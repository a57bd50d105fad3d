//! Option store: installation-wide settings

use super::Database;
use crate::error::{AutoKeywordsError, Result};
use rusqlite::params;
use serde::{Deserialize, Serialize};

pub const OPT_API_KEY: &str = "api_key";
pub const OPT_MODEL: &str = "model";
pub const OPT_KEYWORD_COUNT: &str = "keyword_count";
pub const OPT_ENABLED_TYPES: &str = "enabled_item_types";
pub const OPT_DEBUG_LOG: &str = "debug_log";

pub const DEFAULT_KEYWORD_COUNT: u32 = 10;
pub const MAX_KEYWORD_COUNT: u32 = 50;
const DEFAULT_ENABLED_TYPES: [&str; 2] = ["post", "page"];

/// Narrow read/write interface over persisted options
pub trait OptionStore {
    fn get_option(&self, key: &str) -> Result<Option<String>>;
    fn set_option(&self, key: &str, value: &str) -> Result<()>;
}

impl OptionStore for Database {
    fn get_option(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM options WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_option(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO options (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )?;
        Ok(())
    }
}

/// Typed view of the persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub keyword_count: u32,
    pub enabled_item_types: Vec<String>,
    pub debug_log: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            enabled_item_types: DEFAULT_ENABLED_TYPES.iter().map(|s| s.to_string()).collect(),
            debug_log: false,
        }
    }
}

impl Settings {
    pub fn is_type_enabled(&self, item_type: &str) -> bool {
        self.enabled_item_types.iter().any(|t| t == item_type)
    }
}

/// First 10 and last 10 characters of a key, for display
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 20 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{}...{}", head, tail)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_types(value: &str) -> Vec<String> {
    let types: Vec<String> = value
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if types.is_empty() {
        DEFAULT_ENABLED_TYPES.iter().map(|s| s.to_string()).collect()
    } else {
        types
    }
}

impl Database {
    /// Load settings, applying defaults for anything unset or unparsable
    pub fn load_settings(&self) -> Result<Settings> {
        let defaults = Settings::default();
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Ok(Settings {
            api_key: non_empty(self.get_option(OPT_API_KEY)?),
            model: non_empty(self.get_option(OPT_MODEL)?),
            keyword_count: self
                .get_option(OPT_KEYWORD_COUNT)?
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| (1..=MAX_KEYWORD_COUNT).contains(n))
                .unwrap_or(defaults.keyword_count),
            enabled_item_types: self
                .get_option(OPT_ENABLED_TYPES)?
                .map(|v| parse_types(&v))
                .unwrap_or(defaults.enabled_item_types),
            debug_log: self
                .get_option(OPT_DEBUG_LOG)?
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.debug_log),
        })
    }

    /// Validate and store a single setting by name
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            OPT_API_KEY | OPT_MODEL => self.set_option(key, value),
            OPT_KEYWORD_COUNT => {
                let count: u32 = value.parse().map_err(|_| {
                    AutoKeywordsError::InvalidInput(format!("keyword_count must be a number: {}", value))
                })?;
                if !(1..=MAX_KEYWORD_COUNT).contains(&count) {
                    return Err(AutoKeywordsError::InvalidInput(format!(
                        "keyword_count must be between 1 and {}",
                        MAX_KEYWORD_COUNT
                    )));
                }
                self.set_option(key, &count.to_string())
            }
            OPT_ENABLED_TYPES => self.set_option(key, &parse_types(value).join(",")),
            OPT_DEBUG_LOG => {
                let flag = parse_bool(value).ok_or_else(|| {
                    AutoKeywordsError::InvalidInput(format!("debug_log must be true or false: {}", value))
                })?;
                self.set_option(key, if flag { "1" } else { "0" })
            }
            _ => Err(AutoKeywordsError::InvalidInput(format!(
                "Unknown setting: {}",
                key
            ))),
        }
    }
}

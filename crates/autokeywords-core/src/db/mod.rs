//! Database layer for autokeywords
//!
//! Provides SQLite-based storage for:
//! - Installation options (API key, selected model, keyword count, ...)
//! - The model exclusion list and per-model error history
//! - Content items, their keyword strings and tags

mod exclusions;
mod items;
mod options;
mod schema;
mod stats;

pub use exclusions::{ErrorRecord, ExclusionStore};
pub use items::ContentItem;
pub use options::{
    mask_api_key, OptionStore, Settings, DEFAULT_KEYWORD_COUNT, MAX_KEYWORD_COUNT, OPT_API_KEY,
    OPT_DEBUG_LOG, OPT_ENABLED_TYPES, OPT_KEYWORD_COUNT, OPT_MODEL,
};
pub use schema::Database;
pub use stats::DatabaseStats;
use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::DATA_DIR_NAME)
            .join("autokeywords.sqlite")
    }
}

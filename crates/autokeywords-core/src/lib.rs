//! Autokeywords Core Library
//!
//! SEO keyword extraction for stored content items using an
//! OpenAI-compatible completion API.
//!
//! # Features
//! - Plain-text excerpts from post, page and attachment items
//! - Model fallback ordered by catalog priority, with a persisted exclusion list
//! - Error classification (auth, rate limit, token limit, transport, malformed)
//! - Keyword normalization for English and Japanese output
//! - Additive tag registration and sequential bulk runs

pub mod bulk;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod llm;
pub mod normalize;
pub mod service;
pub mod tags;

pub use bulk::{register_tags_bulk, select_items, BulkItemReport, BulkReport, BulkRunner};
pub use catalog::{load_catalog, resolve_model, Catalog, ModelCategory, ModelEntry, ModelStatus};
pub use config::{ApiConfig, Config};
pub use db::{
    ContentItem, Database, DatabaseStats, ErrorRecord, ExclusionStore, OptionStore, Settings,
};
pub use error::{AutoKeywordsError, Error, ErrorKind, Result};
pub use extract::extract_text;
pub use fallback::{
    apply_effects, plan_fallback, Effect, FallbackDecision, FallbackEngine, FallbackScope,
    Generation, GenerationOutcome,
};
pub use llm::{CompletionClient, CompletionError, HttpCompletionClient};
pub use normalize::normalize;
pub use service::{KeywordService, SettingsReport};
pub use tags::{register_tags, TagRegistration};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "autokeywords";

/// Default data directory name
pub const DATA_DIR_NAME: &str = "autokeywords";

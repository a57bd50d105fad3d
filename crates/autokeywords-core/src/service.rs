//! Keyword service: settings, extraction, fallback engine and store wired together

use crate::catalog::{resolve_model, Catalog, ModelStatus};
use crate::config::Config;
use crate::db::{mask_api_key, Database, ExclusionStore, Settings};
use crate::error::{AutoKeywordsError, Result};
use crate::extract::extract_text;
use crate::fallback::{apply_effects, FallbackEngine, Generation};
use crate::llm::{CompletionClient, HttpCompletionClient};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of the generation settings, with the key masked
#[derive(Debug, Clone, Serialize)]
pub struct SettingsReport {
    pub api_key_exists: bool,
    pub api_key_preview: String,
    pub model: String,
    pub model_name: String,
    pub keyword_count: u32,
    pub enabled_item_types: Vec<String>,
}

/// Keyword generation for stored items
pub struct KeywordService<'a> {
    db: &'a Database,
    client: Arc<dyn CompletionClient>,
    catalog: Catalog,
    api_key_override: Option<String>,
}

impl<'a> KeywordService<'a> {
    pub fn new(db: &'a Database, client: Arc<dyn CompletionClient>, catalog: Catalog) -> Self {
        Self {
            db,
            client,
            catalog,
            api_key_override: None,
        }
    }

    /// Build with the HTTP client and catalog named by `config`
    pub fn from_config(db: &'a Database, config: &Config) -> Result<Self> {
        let client = Arc::new(HttpCompletionClient::new(&config.api)?);
        let catalog = Catalog::load(&config.catalog_path)?;
        Ok(Self::new(db, client, catalog).with_api_key_override(config.api.api_key.clone()))
    }

    /// Key that takes precedence over the stored option
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        self.api_key_override = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    fn api_key(&self, settings: &Settings) -> Option<String> {
        self.api_key_override
            .clone()
            .or_else(|| settings.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    fn require_api_key(&self, settings: &Settings) -> Result<String> {
        self.api_key(settings).ok_or_else(|| {
            AutoKeywordsError::Config(
                "API key is not set. Run `autokeywords config set api_key <KEY>`".to_string(),
            )
        })
    }

    /// Generate keywords for an item without storing them
    ///
    /// Exclusions and a new default model chosen by the fallback engine
    /// are persisted either way.
    pub async fn generate_for_item(&self, item_id: i64) -> Result<Generation> {
        let settings = self.db.load_settings()?;
        let api_key = self.require_api_key(&settings)?;
        let item = self.db.require_item(item_id)?;
        if !settings.is_type_enabled(&item.item_type) {
            return Err(AutoKeywordsError::InvalidInput(format!(
                "Keyword generation is disabled for item type '{}'",
                item.item_type
            )));
        }

        let model = resolve_model(settings.model.as_deref(), &self.catalog);
        let excerpt = extract_text(&item);
        tracing::debug!(
            "Generating {} keywords for item {} with {} ({} chars)",
            settings.keyword_count,
            item_id,
            model,
            excerpt.chars().count()
        );

        let engine = FallbackEngine::new(
            self.client.as_ref(),
            &self.catalog,
            self.db.excluded_set()?,
        );
        let outcome = engine
            .generate(&excerpt, &api_key, &model, settings.keyword_count)
            .await;

        apply_effects(self.db, &outcome.effects)?;
        outcome.result
    }

    /// Generate keywords for an item and store them on it
    pub async fn generate_and_store(&self, item_id: i64) -> Result<Generation> {
        let generation = self.generate_for_item(item_id).await?;
        self.db
            .set_item_keywords(item_id, &generation.keywords, Some(&generation.model_id))?;
        Ok(generation)
    }

    /// Report the current generation settings
    pub fn check_settings(&self) -> Result<SettingsReport> {
        let settings = self.db.load_settings()?;
        let api_key = self.api_key(&settings);
        let model = resolve_model(settings.model.as_deref(), &self.catalog);

        Ok(SettingsReport {
            api_key_exists: api_key.is_some(),
            api_key_preview: api_key
                .as_deref()
                .map(mask_api_key)
                .unwrap_or_else(|| "not set".to_string()),
            model_name: self.catalog.display_name(&model),
            model,
            keyword_count: settings.keyword_count,
            enabled_item_types: settings.enabled_item_types,
        })
    }

    /// Validate `api_key`, or the configured key when `None`
    pub async fn test_api_key(&self, api_key: Option<&str>) -> Result<()> {
        let key = match api_key {
            Some(key) => key.trim().to_string(),
            None => self.require_api_key(&self.db.load_settings()?)?,
        };
        if key.is_empty() {
            return Err(AutoKeywordsError::InvalidInput(
                "API key is empty".to_string(),
            ));
        }
        self.client.validate_key(&key).await?;
        Ok(())
    }

    /// Catalog models that are not excluded
    pub fn available_models(&self) -> Result<Catalog> {
        Ok(self.catalog.without(&self.db.excluded_set()?))
    }

    /// Every catalog model with its exclusion flag and error history
    pub fn models_with_status(&self) -> Result<Vec<ModelStatus>> {
        Ok(self
            .catalog
            .models_with_status(&self.db.excluded_set()?, &self.db.error_records()?))
    }
}

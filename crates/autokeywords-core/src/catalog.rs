//! Model catalog
//!
//! The catalog is a line-oriented text file:
//!
//! ```text
//! # DEFAULT_MODEL=openai/gpt-4.1-mini
//! model_id|display_name|category|description
//! ```
//!
//! Lines starting with `#` are comments. The catalog itself is immutable;
//! exclusions are an overlay applied by the caller.

use crate::db::ErrorRecord;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Model used when neither the settings nor the catalog name one
pub const FALLBACK_DEFAULT_MODEL: &str = "gpt-4.1-nano";

const DEFAULT_MODEL_MARKER: &str = "DEFAULT_MODEL=";

/// Priority tier of a catalog model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Flagship,
    Premium,
    Specialized,
    Lightweight,
    Custom,
}

impl ModelCategory {
    /// Fallback priority; lower is tried first
    pub fn priority(&self) -> u8 {
        match self {
            Self::Flagship => 1,
            Self::Premium => 2,
            Self::Specialized => 3,
            Self::Lightweight => 4,
            Self::Custom => 5,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flagship" => Some(Self::Flagship),
            "premium" => Some(Self::Premium),
            "specialized" => Some(Self::Specialized),
            "lightweight" => Some(Self::Lightweight),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flagship => "flagship",
            Self::Premium => "premium",
            Self::Specialized => "specialized",
            Self::Lightweight => "lightweight",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub display_name: String,
    pub category: Option<ModelCategory>,
    pub description: String,
}

impl ModelEntry {
    pub fn is_lightweight(&self) -> bool {
        self.category == Some(ModelCategory::Lightweight)
    }

    /// Display name without emoji, leading symbols or annotations
    pub fn short_name(&self) -> String {
        short_name(&self.display_name)
    }
}

/// Catalog model annotated with its exclusion state
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    #[serde(flatten)]
    pub entry: ModelEntry,
    pub is_excluded: bool,
    pub error: Option<ErrorRecord>,
}

/// Ordered list of models plus the declared default
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    entries: Vec<ModelEntry>,
    default_model: Option<String>,
}

impl Catalog {
    /// Parse catalog text
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();
        let mut default_model = None;
        let mut seen = HashSet::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') {
                if let Some(pos) = line.find(DEFAULT_MODEL_MARKER) {
                    let id = line[pos + DEFAULT_MODEL_MARKER.len()..].trim();
                    if !id.is_empty() {
                        default_model = Some(id.to_string());
                    }
                }
                continue;
            }

            let parts: Vec<&str> = line.split('|').map(str::trim).collect();
            if parts.len() < 2 || parts[0].is_empty() {
                tracing::debug!("Skipping malformed catalog line: {}", line);
                continue;
            }

            // First occurrence wins for duplicate ids
            if !seen.insert(parts[0].to_string()) {
                continue;
            }

            entries.push(ModelEntry {
                id: parts[0].to_string(),
                display_name: parts[1].to_string(),
                category: parts.get(2).and_then(|c| ModelCategory::parse(c)),
                description: parts.get(3).map(|d| d.to_string()).unwrap_or_default(),
            });
        }

        Self {
            entries,
            default_model,
        }
    }

    /// Load catalog file; falls back to the built-in catalog when missing
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                "Model catalog not found at {}, using built-in models",
                path.display()
            );
            return Ok(Self::builtin());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Minimal catalog used when no catalog file is available
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_CATALOG)
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// `DEFAULT_MODEL` declared in the catalog comments
    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// Copy of this catalog without the excluded models
    pub fn without(&self, excluded: &HashSet<String>) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| !excluded.contains(&e.id))
                .cloned()
                .collect(),
            default_model: self.default_model.clone(),
        }
    }

    /// Non-excluded models of one category, in catalog order
    pub fn by_category(
        &self,
        category: ModelCategory,
        excluded: &HashSet<String>,
    ) -> Vec<&ModelEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == Some(category) && !excluded.contains(&e.id))
            .collect()
    }

    /// Non-excluded models ordered by category priority, catalog order within a tier
    ///
    /// Entries without a known category are never fallback candidates.
    pub fn by_priority(&self, excluded: &HashSet<String>) -> Vec<&ModelEntry> {
        let mut models: Vec<(u8, &ModelEntry)> = self
            .entries
            .iter()
            .filter(|e| !excluded.contains(&e.id))
            .filter_map(|e| e.category.map(|c| (c.priority(), e)))
            .collect();
        // stable: ties keep file order
        models.sort_by_key(|(priority, _)| *priority);
        models.into_iter().map(|(_, e)| e).collect()
    }

    /// Every catalog model with its exclusion flag and error history
    pub fn models_with_status(
        &self,
        excluded: &HashSet<String>,
        errors: &HashMap<String, ErrorRecord>,
    ) -> Vec<ModelStatus> {
        self.entries
            .iter()
            .map(|e| ModelStatus {
                entry: e.clone(),
                is_excluded: excluded.contains(&e.id),
                error: errors.get(&e.id).cloned(),
            })
            .collect()
    }

    /// Display name for an id, falling back to a name derived from the id
    pub fn display_name(&self, id: &str) -> String {
        match self.get(id) {
            Some(entry) => entry.short_name(),
            None => name_from_id(id),
        }
    }
}

/// Load the catalog and drop every model currently excluded
pub fn load_catalog(path: impl AsRef<Path>, excluded: &HashSet<String>) -> Result<Catalog> {
    Ok(Catalog::load(path)?.without(excluded))
}

/// Resolve the model to request: explicit setting, catalog default, then the hard default
pub fn resolve_model(selected: Option<&str>, catalog: &Catalog) -> String {
    selected
        .filter(|m| !m.trim().is_empty())
        .or_else(|| catalog.default_model())
        .unwrap_or(FALLBACK_DEFAULT_MODEL)
        .to_string()
}

const BUILTIN_CATALOG: &str = "\
# DEFAULT_MODEL=meta-llama/llama-4-maverick:free
meta-llama/llama-4-maverick:free|🏆 Llama 4 Maverick (free, 400B MoE)|flagship|Highest quality free model
qwen/qwen3-4b:free|⚡ Qwen3 4B (free, fast)|lightweight|Small and fast
";

lazy_static! {
    static ref EMOJI_RE: Regex = Regex::new(
        r"[\x{1F300}-\x{1F9FF}\x{1F600}-\x{1F64F}\x{1F680}-\x{1F6FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{FE0F}]"
    )
    .unwrap();
    static ref ANNOTATION_RE: Regex = Regex::new(r"\s*\([^)]*\).*$").unwrap();
    static ref LEADING_SYMBOLS_RE: Regex = Regex::new(r"^[^\w\s]+\s*").unwrap();
}

/// Strip emoji, parenthesised annotations and leading symbols from a display name
pub fn short_name(display_name: &str) -> String {
    let name = EMOJI_RE.replace_all(display_name, "");
    let name = ANNOTATION_RE.replace(&name, "");
    let name = LEADING_SYMBOLS_RE.replace(name.trim(), "");
    name.trim().to_string()
}

fn name_from_id(id: &str) -> String {
    let base = id.rsplit('/').next().unwrap_or(id);
    let base = base.split(':').next().unwrap_or(base);
    base.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Model catalog
# DEFAULT_MODEL=openai/gpt-4.1-mini

tiny/a|Tiny A|lightweight|small
big/a|🏆 Big A (best)|flagship|large
mid/a|Mid A|premium|
tiny/b|Tiny B|lightweight|small too
big/b|Big B|flagship|large too
odd/a|Odd A|experimental|unknown tier
mine/a|Mine A|custom|self-hosted
spec/a|Spec A|specialized|domain
broken-line
";

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn ids(models: &[&ModelEntry]) -> Vec<String> {
        models.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::parse(SAMPLE);
        assert_eq!(catalog.len(), 8);
        assert_eq!(catalog.default_model(), Some("openai/gpt-4.1-mini"));

        let big = catalog.get("big/a").unwrap();
        assert_eq!(big.category, Some(ModelCategory::Flagship));
        assert_eq!(big.description, "large");
        assert_eq!(catalog.get("odd/a").unwrap().category, None);
        assert!(!catalog.contains("broken-line"));
    }

    #[test]
    fn test_priority_order_is_stable() {
        let catalog = Catalog::parse(SAMPLE);
        let ordered = catalog.by_priority(&HashSet::new());
        assert_eq!(
            ids(&ordered),
            vec![
                "big/a", "big/b", "mid/a", "spec/a", "tiny/a", "tiny/b", "mine/a"
            ]
        );
    }

    #[test]
    fn test_by_category_skips_excluded() {
        let catalog = Catalog::parse(SAMPLE);
        let light = catalog.by_category(ModelCategory::Lightweight, &set(&["tiny/a"]));
        assert_eq!(ids(&light), vec!["tiny/b"]);
    }

    #[test]
    fn test_load_catalog_drops_excluded_models() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("models.txt");
        std::fs::write(&path, SAMPLE).unwrap();

        let excluded = set(&["big/a", "tiny/b", "not-in-catalog"]);
        let catalog = load_catalog(&path, &excluded).unwrap();
        assert_eq!(catalog.len(), 6);
        for id in &excluded {
            assert!(!catalog.contains(id));
        }
        assert!(catalog.contains("big/b"));
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let dir = tempfile::TempDir::new().unwrap();
        let catalog = Catalog::load(dir.path().join("nope.txt")).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.default_model(),
            Some("meta-llama/llama-4-maverick:free")
        );
        assert!(catalog.get("qwen/qwen3-4b:free").unwrap().is_lightweight());
    }

    #[test]
    fn test_resolve_model() {
        let catalog = Catalog::parse(SAMPLE);
        assert_eq!(resolve_model(Some("mid/a"), &catalog), "mid/a");
        assert_eq!(resolve_model(Some("  "), &catalog), "openai/gpt-4.1-mini");
        assert_eq!(
            resolve_model(None, &Catalog::default()),
            FALLBACK_DEFAULT_MODEL
        );
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("🏆 Llama 4 Maverick (free, 400B MoE)"), "Llama 4 Maverick");
        assert_eq!(short_name("⚡ Qwen3 4B (fast)"), "Qwen3 4B");
        assert_eq!(short_name("Plain Name"), "Plain Name");
    }

    #[test]
    fn test_display_name_for_unknown_id() {
        let catalog = Catalog::parse(SAMPLE);
        assert_eq!(catalog.display_name("big/a"), "Big A");
        assert_eq!(
            catalog.display_name("meta-llama/llama-4-scout:free"),
            "Llama 4 Scout"
        );
    }

    #[test]
    fn test_models_with_status() {
        let catalog = Catalog::parse(SAMPLE);
        let mut errors = HashMap::new();
        errors.insert(
            "mid/a".to_string(),
            ErrorRecord {
                error_time: "2024-01-01T00:00:00Z".to_string(),
                error_count: 2,
            },
        );
        let status = catalog.models_with_status(&set(&["mid/a"]), &errors);
        let mid = status.iter().find(|s| s.entry.id == "mid/a").unwrap();
        assert!(mid.is_excluded);
        assert_eq!(mid.error.as_ref().unwrap().error_count, 2);
        assert!(status.iter().filter(|s| s.is_excluded).count() == 1);
    }
}

//! Model fallback engine
//!
//! Tries the requested model first. On a failure other than rate limiting
//! the model is excluded and alternates from the catalog are tried in
//! priority order (lightweight models only when the failure was a token
//! limit). The first alternate that succeeds becomes the new default.
//!
//! The engine never touches storage. It returns the result together with
//! the [`Effect`]s the caller must apply, see [`apply_effects`].

use crate::catalog::{Catalog, ModelCategory};
use crate::db::{ExclusionStore, OptionStore, OPT_MODEL};
use crate::error::{AutoKeywordsError, ErrorKind, Result};
use crate::llm::{keyword_request, CompletionClient, CompletionError};
use crate::normalize::normalize;
use serde::Serialize;
use std::collections::HashSet;

/// Persistent side effect requested by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", content = "model", rename_all = "snake_case")]
pub enum Effect {
    /// Add the model to the exclusion list
    Exclude(String),
    /// Make the model the selected default
    SetDefault(String),
}

/// Which models are eligible after a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackScope {
    /// Token limit: smaller models only
    Lightweight,
    /// Every category, highest tier first
    AllCategories,
}

/// What to do after the requested model failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackDecision {
    /// Report the error as is; no exclusion, no retry
    Surface,
    /// Exclude the failed model and try `candidates` in order
    Retry {
        scope: FallbackScope,
        candidates: Vec<String>,
    },
}

/// Decide how to recover from a failure of `failed_model`
///
/// `excluded` is the exclusion list as it was before this failure.
pub fn plan_fallback(
    catalog: &Catalog,
    excluded: &HashSet<String>,
    failed_model: &str,
    kind: ErrorKind,
) -> FallbackDecision {
    if !kind.triggers_fallback() {
        return FallbackDecision::Surface;
    }

    let (scope, models) = if kind == ErrorKind::TokenLimitExceeded {
        (
            FallbackScope::Lightweight,
            catalog.by_category(ModelCategory::Lightweight, excluded),
        )
    } else {
        (FallbackScope::AllCategories, catalog.by_priority(excluded))
    };

    FallbackDecision::Retry {
        scope,
        candidates: models
            .into_iter()
            .filter(|m| m.id != failed_model)
            .map(|m| m.id.clone())
            .collect(),
    }
}

/// Successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    /// Normalized comma-separated keywords; may be empty
    pub keywords: String,
    /// Model that produced the keywords
    pub model_id: String,
    /// Short display name of that model
    pub model_name: String,
    /// Originally requested model when a fallback was used
    pub switched_from: Option<String>,
    /// Operator-facing notice about the switch
    pub notice: Option<String>,
}

/// One completion call made by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub model_id: String,
    pub error: Option<ErrorKind>,
}

/// Result of [`FallbackEngine::generate`] plus the effects to persist
#[derive(Debug)]
pub struct GenerationOutcome {
    pub result: Result<Generation>,
    pub effects: Vec<Effect>,
    pub attempts: Vec<Attempt>,
}

/// Keyword generation with model fallback over a fixed exclusion snapshot
pub struct FallbackEngine<'a> {
    client: &'a dyn CompletionClient,
    catalog: &'a Catalog,
    excluded: HashSet<String>,
}

impl<'a> FallbackEngine<'a> {
    pub fn new(
        client: &'a dyn CompletionClient,
        catalog: &'a Catalog,
        excluded: HashSet<String>,
    ) -> Self {
        Self {
            client,
            catalog,
            excluded,
        }
    }

    /// Generate keywords for `excerpt`, falling back to other models on failure
    pub async fn generate(
        &self,
        excerpt: &str,
        api_key: &str,
        requested_model: &str,
        keyword_count: u32,
    ) -> GenerationOutcome {
        let mut effects = Vec::new();
        let mut attempts = Vec::new();

        let original = match self
            .attempt(excerpt, api_key, requested_model, keyword_count, &mut attempts)
            .await
        {
            Ok(keywords) => {
                return GenerationOutcome {
                    result: Ok(Generation {
                        keywords,
                        model_id: requested_model.to_string(),
                        model_name: self.catalog.display_name(requested_model),
                        switched_from: None,
                        notice: None,
                    }),
                    effects,
                    attempts,
                };
            }
            Err(err) => err,
        };

        tracing::warn!(
            "Model '{}' failed ({}): {}",
            requested_model,
            original.kind,
            original.message
        );

        let (scope, candidates) =
            match plan_fallback(self.catalog, &self.excluded, requested_model, original.kind) {
                FallbackDecision::Surface => {
                    return GenerationOutcome {
                        result: Err(original.into()),
                        effects,
                        attempts,
                    };
                }
                FallbackDecision::Retry { scope, candidates } => (scope, candidates),
            };

        effects.push(Effect::Exclude(requested_model.to_string()));
        tracing::debug!("Fallback candidates ({:?}): {:?}", scope, candidates);

        for candidate in &candidates {
            match self
                .attempt(excerpt, api_key, candidate, keyword_count, &mut attempts)
                .await
            {
                Ok(keywords) => {
                    let model_name = self.catalog.display_name(candidate);
                    tracing::info!(
                        "Fallback model '{}' succeeded, making it the default",
                        candidate
                    );
                    effects.push(Effect::SetDefault(candidate.clone()));
                    return GenerationOutcome {
                        result: Ok(Generation {
                            keywords,
                            model_id: candidate.clone(),
                            notice: Some(format!(
                                "{} failed, so the request was switched automatically to {}.",
                                requested_model, model_name
                            )),
                            model_name,
                            switched_from: Some(requested_model.to_string()),
                        }),
                        effects,
                        attempts,
                    };
                }
                Err(err) if err.kind == ErrorKind::RateLimited => {
                    // Throttling is account-wide: later candidates would hit it too.
                    tracing::warn!("Fallback stopped at '{}': rate limited", candidate);
                    return GenerationOutcome {
                        result: Err(AutoKeywordsError::Generation {
                            kind: ErrorKind::RateLimited,
                            message: format!("{}\n\n{}", original.message, err.message),
                        }),
                        effects,
                        attempts,
                    };
                }
                Err(err) => {
                    tracing::warn!("Fallback model '{}' also failed: {}", candidate, err);
                    effects.push(Effect::Exclude(candidate.clone()));
                }
            }
        }

        let message = format!(
            "{}\n\n{}",
            original.message,
            exhaustion_notice(requested_model, scope, candidates.is_empty())
        );
        GenerationOutcome {
            result: Err(AutoKeywordsError::Generation {
                kind: original.kind,
                message,
            }),
            effects,
            attempts,
        }
    }

    async fn attempt(
        &self,
        excerpt: &str,
        api_key: &str,
        model: &str,
        keyword_count: u32,
        attempts: &mut Vec<Attempt>,
    ) -> std::result::Result<String, CompletionError> {
        let request = keyword_request(model, excerpt, keyword_count);
        let result = self
            .client
            .complete(api_key, &request)
            .await
            .map(|raw| normalize(&raw));

        attempts.push(Attempt {
            model_id: model.to_string(),
            error: result.as_ref().err().map(|e| e.kind),
        });
        result
    }
}

fn exhaustion_notice(model: &str, scope: FallbackScope, no_candidates: bool) -> String {
    let detail = match (scope, no_candidates) {
        (FallbackScope::Lightweight, true) => "No lightweight model is available.",
        (FallbackScope::Lightweight, false) => {
            "Every lightweight model also failed. Shorten the content or reduce the keyword count."
        }
        (FallbackScope::AllCategories, true) => "No fallback model is available.",
        (FallbackScope::AllCategories, false) => "Every fallback model also failed.",
    };
    format!(
        "{} failed and no other available model could process the request. {}\n\
         Restore excluded models in the settings or check the API key.",
        model, detail
    )
}

/// Persist the effects produced by the engine, in order
pub fn apply_effects<S>(store: &S, effects: &[Effect]) -> Result<()>
where
    S: ExclusionStore + OptionStore,
{
    for effect in effects {
        match effect {
            Effect::Exclude(model) => {
                store.exclude(model)?;
            }
            Effect::SetDefault(model) => {
                store.set_option(OPT_MODEL, model)?;
            }
        }
    }
    Ok(())
}

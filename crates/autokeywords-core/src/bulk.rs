//! Bulk keyword generation and tag registration
//!
//! Items are processed one at a time with a fixed pause between
//! generation requests. A failing item is reported and the run continues.

use crate::db::Database;
use crate::error::{ErrorKind, Result};
use crate::service::KeywordService;
use crate::tags::register_tags;
use serde::Serialize;
use std::time::Duration;

/// Outcome for a single item of a bulk run
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemReport {
    pub item_id: i64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl BulkItemReport {
    fn ok(item_id: i64) -> Self {
        Self {
            item_id,
            success: true,
            keywords: None,
            model_id: None,
            notice: None,
            tags: None,
            error: None,
            error_kind: None,
        }
    }

    fn failed(item_id: i64, err: &crate::error::AutoKeywordsError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: err.kind(),
            ..Self::ok(item_id)
        }
    }
}

/// Reports of a whole bulk run, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    pub items: Vec<BulkItemReport>,
}

impl BulkReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.success).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Resolve the items of a bulk run
///
/// Explicit ids win; otherwise all items of `types`, or of the enabled
/// item types when no types are given.
pub fn select_items(db: &Database, ids: &[i64], types: &[String]) -> Result<Vec<i64>> {
    if !ids.is_empty() {
        return Ok(ids.to_vec());
    }
    if !types.is_empty() {
        return db.item_ids_of_types(types);
    }
    let settings = db.load_settings()?;
    db.item_ids_of_types(&settings.enabled_item_types)
}

/// Sequential keyword generation over many items
pub struct BulkRunner<'s, 'a> {
    service: &'s KeywordService<'a>,
    delay: Duration,
}

impl<'s, 'a> BulkRunner<'s, 'a> {
    pub fn new(service: &'s KeywordService<'a>, delay: Duration) -> Self {
        Self { service, delay }
    }

    /// Generate and store keywords for each item
    ///
    /// `on_item` is called after every item with its position and report.
    pub async fn generate<F>(&self, item_ids: &[i64], mut on_item: F) -> BulkReport
    where
        F: FnMut(usize, &BulkItemReport),
    {
        let mut report = BulkReport::default();

        for (index, &item_id) in item_ids.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let item_report = match self.service.generate_and_store(item_id).await {
                Ok(generation) => BulkItemReport {
                    keywords: Some(generation.keywords),
                    model_id: Some(generation.model_id),
                    notice: generation.notice,
                    ..BulkItemReport::ok(item_id)
                },
                Err(err) => {
                    tracing::warn!("Bulk generation failed for item {}: {}", item_id, err);
                    BulkItemReport::failed(item_id, &err)
                }
            };

            on_item(index, &item_report);
            report.items.push(item_report);
        }

        tracing::info!(
            "Bulk generation finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }
}

/// Register stored keywords as tags for each item
pub fn register_tags_bulk<F>(db: &Database, item_ids: &[i64], mut on_item: F) -> BulkReport
where
    F: FnMut(usize, &BulkItemReport),
{
    let mut report = BulkReport::default();

    for (index, &item_id) in item_ids.iter().enumerate() {
        let item_report = match register_tags(db, item_id) {
            Ok(registration) => BulkItemReport {
                tags: Some(registration.tags),
                ..BulkItemReport::ok(item_id)
            },
            Err(err) => BulkItemReport::failed(item_id, &err),
        };
        on_item(index, &item_report);
        report.items.push(item_report);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::db::{ContentItem, OptionStore, OPT_API_KEY, OPT_ENABLED_TYPES};
    use crate::llm::{CompletionClient, CompletionError, CompletionRequest};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Rate-limits any prompt mentioning "throttle"
    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(
            &self,
            _api_key: &str,
            request: &CompletionRequest,
        ) -> std::result::Result<String, CompletionError> {
            if request.messages[0].content.contains("throttle") {
                Err(CompletionError::from_status(429, "slow down"))
            } else {
                Ok("alpha, beta".to_string())
            }
        }

        async fn validate_key(&self, _api_key: &str) -> std::result::Result<(), CompletionError> {
            Ok(())
        }
    }

    fn add(db: &Database, item_type: &str, title: &str) -> i64 {
        db.add_item(&ContentItem {
            item_type: item_type.into(),
            title: title.into(),
            ..Default::default()
        })
        .unwrap()
    }

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.set_option(OPT_API_KEY, "sk-test").unwrap();
        db
    }

    #[test]
    fn test_select_items() {
        let db = db();
        let post = add(&db, "post", "a");
        let page = add(&db, "page", "b");
        let media = add(&db, "attachment", "c");

        assert_eq!(select_items(&db, &[media], &[]).unwrap(), vec![media]);
        assert_eq!(
            select_items(&db, &[], &["attachment".to_string()]).unwrap(),
            vec![media]
        );
        assert_eq!(select_items(&db, &[], &[]).unwrap(), vec![post, page]);

        db.set_option(OPT_ENABLED_TYPES, "page").unwrap();
        assert_eq!(select_items(&db, &[], &[]).unwrap(), vec![page]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_does_not_abort_batch() {
        let db = db();
        let first = add(&db, "post", "first");
        let throttled = add(&db, "post", "throttle me");
        let last = add(&db, "post", "last");

        let service = KeywordService::new(&db, Arc::new(EchoClient), Catalog::builtin());
        let runner = BulkRunner::new(&service, Duration::from_secs(1));

        let mut seen = Vec::new();
        let started = tokio::time::Instant::now();
        let report = runner
            .generate(&[first, throttled, last], |index, item| {
                seen.push((index, item.success))
            })
            .await;

        assert_eq!(seen, vec![(0, true), (1, false), (2, true)]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.items[1].error_kind, Some(ErrorKind::RateLimited));
        // one pause between each pair of items
        assert!(started.elapsed() >= Duration::from_secs(2));

        assert_eq!(
            db.require_item(last).unwrap().keywords.as_deref(),
            Some("alpha,beta")
        );
        assert!(db.require_item(throttled).unwrap().keywords.is_none());
    }

    #[test]
    fn test_register_tags_bulk() {
        let db = db();
        let tagged = add(&db, "post", "a");
        let empty = add(&db, "post", "b");
        db.set_item_keywords(tagged, "alpha,beta", None).unwrap();

        let report = register_tags_bulk(&db, &[tagged, empty, 999], |_, _| {});
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(
            report.items[0].tags.as_deref(),
            Some(&["alpha".to_string(), "beta".to_string()][..])
        );
        assert_eq!(db.item_tags(tagged).unwrap(), vec!["alpha", "beta"]);
    }
}

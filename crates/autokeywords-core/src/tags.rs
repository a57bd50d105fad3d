//! Tag registration from stored keywords

use crate::db::Database;
use crate::error::{AutoKeywordsError, Result};
use crate::normalize::{dedup_case_insensitive, normalize_token, split_keywords};

/// Result of registering an item's keywords as tags
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagRegistration {
    pub item_id: i64,
    /// Tags requested, in keyword order
    pub tags: Vec<String>,
    /// How many of them were new for the item
    pub added: usize,
}

/// Register the stored keywords of an item as its tags
///
/// Tags are additive: existing tags are kept and duplicates are ignored.
pub fn register_tags(db: &Database, item_id: i64) -> Result<TagRegistration> {
    let stored = db.item_keywords(item_id)?.unwrap_or_default();
    if stored.trim().is_empty() {
        return Err(AutoKeywordsError::NoKeywords(format!(
            "item {} has no stored keywords",
            item_id
        )));
    }

    let tags = dedup_case_insensitive(
        split_keywords(&stored)
            .into_iter()
            .filter_map(normalize_token),
    );
    if tags.is_empty() {
        return Err(AutoKeywordsError::NoKeywords(format!(
            "no valid keywords remain for item {}",
            item_id
        )));
    }

    let added = db.add_tags(item_id, &tags)?;
    tracing::info!(
        "Registered {} tags for item {} ({} new)",
        tags.len(),
        item_id,
        added
    );

    Ok(TagRegistration {
        item_id,
        tags,
        added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ContentItem;

    fn db_with_item() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let id = db.add_item(&ContentItem::default()).unwrap();
        (db, id)
    }

    #[test]
    fn test_registers_normalized_tags() {
        let (db, id) = db_with_item();
        db.set_item_keywords(id, "Rust, web  dev,rust,x,検索エンジン名", None)
            .unwrap();

        let result = register_tags(&db, id).unwrap();
        assert_eq!(result.tags, vec!["Rust", "web-dev", "検索エンジン"]);
        assert_eq!(result.added, 3);
        assert_eq!(db.item_tags(id).unwrap(), result.tags);
    }

    #[test]
    fn test_existing_tags_are_kept() {
        let (db, id) = db_with_item();
        db.add_tags(id, &["manual".to_string(), "RUST".to_string()])
            .unwrap();
        db.set_item_keywords(id, "rust,tokio", None).unwrap();

        let result = register_tags(&db, id).unwrap();
        assert_eq!(result.added, 1);
        assert_eq!(db.item_tags(id).unwrap(), vec!["manual", "RUST", "tokio"]);
    }

    #[test]
    fn test_missing_keywords_fail() {
        let (db, id) = db_with_item();
        assert!(matches!(
            register_tags(&db, id),
            Err(AutoKeywordsError::NoKeywords(_))
        ));

        db.set_item_keywords(id, " , a, b ", None).unwrap();
        assert!(matches!(
            register_tags(&db, id),
            Err(AutoKeywordsError::NoKeywords(_))
        ));
        assert!(db.item_tags(id).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_item() {
        let (db, _) = db_with_item();
        assert!(matches!(
            register_tags(&db, 404),
            Err(AutoKeywordsError::ItemNotFound(404))
        ));
    }
}

//! Content items, their stored keywords, and tags

use super::Database;
use crate::error::{AutoKeywordsError, Result};
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Content item record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub item_type: String,
    pub title: String,
    pub body: String,
    pub filename: Option<String>,
    pub alt_text: Option<String>,
    pub excerpt: Option<String>,
    pub keywords: Option<String>,
    pub keywords_model: Option<String>,
    pub keywords_generated_at: Option<String>,
    pub created_at: String,
    pub modified_at: String,
}

const ITEM_COLUMNS: &str = "id, item_type, title, body, filename, alt_text, excerpt, keywords, \
     keywords_model, keywords_generated_at, created_at, modified_at";

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ContentItem> {
    Ok(ContentItem {
        id: row.get(0)?,
        item_type: row.get(1)?,
        title: row.get(2)?,
        body: row.get(3)?,
        filename: row.get(4)?,
        alt_text: row.get(5)?,
        excerpt: row.get(6)?,
        keywords: row.get(7)?,
        keywords_model: row.get(8)?,
        keywords_generated_at: row.get(9)?,
        created_at: row.get(10)?,
        modified_at: row.get(11)?,
    })
}

impl Database {
    /// Insert an item; `id` and timestamps of the argument are ignored
    pub fn add_item(&self, item: &ContentItem) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();
        let item_type = if item.item_type.is_empty() {
            "post"
        } else {
            item.item_type.as_str()
        };
        self.conn.execute(
            "INSERT INTO items (item_type, title, body, filename, alt_text, excerpt, keywords, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                item_type,
                item.title,
                item.body,
                item.filename,
                item.alt_text,
                item.excerpt,
                item.keywords,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_item(&self, id: i64) -> Result<Option<ContentItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                params![id],
                item_from_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Get an item or fail with `ItemNotFound`
    pub fn require_item(&self, id: i64) -> Result<ContentItem> {
        self.get_item(id)?
            .ok_or(AutoKeywordsError::ItemNotFound(id))
    }

    /// List items, optionally filtered by type, in id order
    pub fn list_items(&self, item_type: Option<&str>) -> Result<Vec<ContentItem>> {
        let sql = format!(
            "SELECT {} FROM items WHERE (?1 IS NULL OR item_type = ?1) ORDER BY id",
            ITEM_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let results = stmt
            .query_map(params![item_type], item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(results)
    }

    /// Ids of items whose type is in `types`
    pub fn item_ids_of_types(&self, types: &[String]) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        for item in self.list_items(None)? {
            if types.iter().any(|t| *t == item.item_type) {
                ids.push(item.id);
            }
        }
        Ok(ids)
    }

    /// Store the normalized keyword string for an item
    pub fn set_item_keywords(&self, id: i64, keywords: &str, model: Option<&str>) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let rows = self.conn.execute(
            "UPDATE items SET keywords = ?2, keywords_model = ?3, keywords_generated_at = ?4, modified_at = ?4
             WHERE id = ?1",
            params![id, keywords, model, now],
        )?;
        if rows == 0 {
            return Err(AutoKeywordsError::ItemNotFound(id));
        }
        Ok(())
    }

    /// Stored keyword string, `None` when never set
    pub fn item_keywords(&self, id: i64) -> Result<Option<String>> {
        Ok(self.require_item(id)?.keywords)
    }

    /// Add tags to an item; existing tags (case-insensitive) are kept as is
    pub fn add_tags(&self, id: i64, tags: &[String]) -> Result<usize> {
        self.require_item(id)?;
        let now = chrono::Utc::now().to_rfc3339();
        let mut added = 0;
        for tag in tags {
            added += self.conn.execute(
                "INSERT OR IGNORE INTO item_tags (item_id, tag, created_at) VALUES (?1, ?2, ?3)",
                params![id, tag, now],
            )?;
        }
        Ok(added)
    }

    /// Tags of an item in registration order
    pub fn item_tags(&self, id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag FROM item_tags WHERE item_id = ?1 ORDER BY rowid")?;
        let results = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }

    fn item(item_type: &str, title: &str) -> ContentItem {
        ContentItem {
            item_type: item_type.to_string(),
            title: title.to_string(),
            body: "Body".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_get_item() {
        let db = db();
        let id = db.add_item(&item("page", "About")).unwrap();
        let stored = db.get_item(id).unwrap().unwrap();
        assert_eq!(stored.item_type, "page");
        assert_eq!(stored.title, "About");
        assert!(stored.keywords.is_none());
        assert!(db.get_item(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_list_items_by_type() {
        let db = db();
        db.add_item(&item("post", "A")).unwrap();
        db.add_item(&item("page", "B")).unwrap();
        db.add_item(&item("post", "C")).unwrap();

        assert_eq!(db.list_items(None).unwrap().len(), 3);
        let posts = db.list_items(Some("post")).unwrap();
        assert_eq!(posts.iter().map(|i| i.title.as_str()).collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(
            db.item_ids_of_types(&["page".to_string()]).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_keywords_round_trip() {
        let db = db();
        let id = db.add_item(&item("post", "A")).unwrap();
        db.set_item_keywords(id, "rust,sqlite", Some("tiny/a")).unwrap();

        let stored = db.require_item(id).unwrap();
        assert_eq!(stored.keywords.as_deref(), Some("rust,sqlite"));
        assert_eq!(stored.keywords_model.as_deref(), Some("tiny/a"));
        assert!(matches!(
            db.set_item_keywords(999, "x", None),
            Err(AutoKeywordsError::ItemNotFound(999))
        ));
    }

    #[test]
    fn test_add_tags_is_additive() {
        let db = db();
        let id = db.add_item(&item("post", "A")).unwrap();
        let added = db
            .add_tags(id, &["Rust".to_string(), "SQLite".to_string()])
            .unwrap();
        assert_eq!(added, 2);

        let added = db
            .add_tags(id, &["rust".to_string(), "tokio".to_string()])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(db.item_tags(id).unwrap(), vec!["Rust", "SQLite", "tokio"]);
    }
}

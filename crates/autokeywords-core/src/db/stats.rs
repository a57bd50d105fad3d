//! Database statistics

use super::Database;
use crate::error::Result;

/// Database stats
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStats {
    pub item_count: usize,
    pub items_with_keywords: usize,
    pub pending_keywords: usize,
    pub tag_count: usize,
    pub excluded_model_count: usize,
}

impl Database {
    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let item_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;

        let items_with_keywords: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM items WHERE keywords IS NOT NULL AND keywords != ''",
            [],
            |row| row.get(0),
        )?;

        let tag_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM item_tags", [], |row| row.get(0))?;

        let excluded_model_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM excluded_models", [], |row| row.get(0))?;

        Ok(DatabaseStats {
            item_count: item_count as usize,
            items_with_keywords: items_with_keywords as usize,
            pending_keywords: (item_count - items_with_keywords) as usize,
            tag_count: tag_count as usize,
            excluded_model_count: excluded_model_count as usize,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ContentItem, ExclusionStore};

    #[test]
    fn test_stats_counts() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();

        let a = db.add_item(&ContentItem::default()).unwrap();
        db.add_item(&ContentItem::default()).unwrap();
        db.set_item_keywords(a, "rust,sqlite", None).unwrap();
        db.add_tags(a, &["rust".to_string()]).unwrap();
        db.exclude("big/a").unwrap();

        let stats = db.get_stats().unwrap();
        assert_eq!(stats.item_count, 2);
        assert_eq!(stats.items_with_keywords, 1);
        assert_eq!(stats.pending_keywords, 1);
        assert_eq!(stats.tag_count, 1);
        assert_eq!(stats.excluded_model_count, 1);
    }
}

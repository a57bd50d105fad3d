//! Content item commands

use crate::app::{ItemAction, ItemArgs, OutputFormat};
use crate::output::{print_json, terminal};
use anyhow::Result;
use autokeywords_core::db::ContentItem;
use autokeywords_core::Database;

pub async fn run(args: ItemArgs, db: &Database, format: OutputFormat) -> Result<()> {
    match args.action {
        ItemAction::Add {
            item_type,
            title,
            body,
            filename,
            alt_text,
            excerpt,
        } => {
            let id = db.add_item(&ContentItem {
                item_type,
                title,
                body,
                filename,
                alt_text,
                excerpt,
                ..Default::default()
            })?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "id": id }))?,
                OutputFormat::Cli => println!("Added item #{}", id),
            }
        }
        ItemAction::Show { id } => {
            let item = db.require_item(id)?;
            let tags = db.item_tags(id)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "item": item,
                    "tags": tags,
                }))?,
                OutputFormat::Cli => print!("{}", terminal::format_item(&item, &tags)),
            }
        }
        ItemAction::Keywords { id, value } => {
            let keywords = value.trim();
            db.set_item_keywords(id, keywords, None)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "id": id,
                    "keywords": keywords,
                }))?,
                OutputFormat::Cli => println!("Saved keywords for item #{}", id),
            }
        }
        ItemAction::List { item_type } => {
            let items = db.list_items(item_type.as_deref())?;
            match format {
                OutputFormat::Json => print_json(&items)?,
                OutputFormat::Cli if items.is_empty() => println!("No items"),
                OutputFormat::Cli => {
                    for item in &items {
                        println!("{}", terminal::format_item_line(item));
                    }
                }
            }
        }
    }
    Ok(())
}

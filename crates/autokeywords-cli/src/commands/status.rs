//! Status command

use crate::app::OutputFormat;
use crate::output::{print_json, terminal};
use anyhow::Result;
use autokeywords_core::{Config, Database, KeywordService};

pub async fn run(db: &Database, config: &Config, format: OutputFormat) -> Result<()> {
    let stats = db.get_stats()?;
    let settings = KeywordService::from_config(db, config)?.check_settings()?;

    match format {
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "stats": stats,
                "settings": settings,
            }))?;
        }
        OutputFormat::Cli => {
            println!("Items:           {}", stats.item_count);
            println!("  With keywords: {}", stats.items_with_keywords);
            println!("  Pending:       {}", stats.pending_keywords);
            println!("Tags:            {}", stats.tag_count);
            println!("Excluded models: {}", stats.excluded_model_count);
            println!();
            print!("{}", terminal::format_settings(&settings));
        }
    }
    Ok(())
}

//! Settings commands

use crate::app::{ConfigAction, ConfigArgs, OutputFormat};
use crate::output::{print_json, terminal};
use anyhow::Result;
use autokeywords_core::db::{mask_api_key, OPT_API_KEY};
use autokeywords_core::{Config, Database, KeywordService};

pub async fn run(
    args: ConfigArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            let service = KeywordService::from_config(db, config)?;
            let report = service.check_settings()?;

            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "settings": report,
                    "api_url": config.api.base_url,
                    "catalog_path": config.catalog_path,
                    "bulk_delay_ms": config.bulk_delay_ms,
                    "config_path": Config::default_path(),
                }))?,
                OutputFormat::Cli => {
                    print!("{}", terminal::format_settings(&report));
                    println!("API URL:         {}", config.api.base_url);
                    println!("Catalog:         {}", config.catalog_path.display());
                    println!("Bulk delay:      {}ms", config.bulk_delay_ms);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            db.set_setting(&key, &value)?;
            let shown = if key == OPT_API_KEY {
                mask_api_key(value.trim())
            } else {
                value.trim().to_string()
            };
            println!("Set {} = {}", key, shown);
        }
    }
    Ok(())
}

//! Model catalog and exclusion commands

use crate::app::{ModelsAction, ModelsArgs, OutputFormat};
use crate::output::{print_json, terminal};
use anyhow::Result;
use autokeywords_core::{load_catalog, Catalog, Config, Database, ExclusionStore};

pub async fn run(
    args: ModelsArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    match args.action {
        ModelsAction::List => {
            let catalog = Catalog::load(&config.catalog_path)?;
            let models = catalog.models_with_status(&db.excluded_set()?, &db.error_records()?);
            match format {
                OutputFormat::Json => print_json(&models)?,
                OutputFormat::Cli => print!("{}", terminal::format_models(&models)),
            }
        }
        ModelsAction::Available => {
            let catalog = load_catalog(&config.catalog_path, &db.excluded_set()?)?;
            match format {
                OutputFormat::Json => print_json(catalog.entries())?,
                OutputFormat::Cli if catalog.is_empty() => {
                    println!(
                        "No models available. Restore excluded models with \
                         `autokeywords models restore-all`"
                    );
                }
                OutputFormat::Cli => {
                    for entry in catalog.entries() {
                        println!("{:<40} {}", entry.id, entry.short_name());
                    }
                }
            }
        }
        ModelsAction::Restore { model_id } => {
            if db.restore(&model_id)? {
                println!("Restored model '{}'", model_id);
            } else {
                println!("Model '{}' was not excluded", model_id);
            }
        }
        ModelsAction::RestoreAll => {
            let restored = db.restore_all()?;
            println!("Restored {} models", restored);
        }
    }
    Ok(())
}

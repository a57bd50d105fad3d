//! Single-item keyword generation

use crate::app::{GenerateArgs, OutputFormat};
use crate::output::{print_json, terminal};
use anyhow::Result;
use autokeywords_core::{Config, Database, KeywordService};

pub async fn run(
    args: GenerateArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let service = KeywordService::from_config(db, config)?;

    let generation = if args.save {
        service.generate_and_store(args.id).await?
    } else {
        service.generate_for_item(args.id).await?
    };

    match format {
        OutputFormat::Json => print_json(&generation)?,
        OutputFormat::Cli => {
            print!("{}", terminal::format_generation(&generation));
            if args.save {
                println!("Saved to item #{}", args.id);
            }
        }
    }
    Ok(())
}
